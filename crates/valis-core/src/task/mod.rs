//! Task domain module.
//!
//! This module contains the simulated task model, the request classifier,
//! and the events that the simulator publishes to the message log.
//!
//! # Module Structure
//!
//! - `model`: Core task model (`Task`, `TaskType`, `TaskStatus`, `TaskSnapshot`)
//! - `classifier`: Keyword classification of free-text requests
//! - `event`: Lifecycle events (`TaskEvent`) and their transcript text
//! - `record`: Finished-task records (`TaskRecord`) kept for lookup
//!
//! # Usage
//!
//! ```
//! use valis_core::task::{classify, Task, TaskStatus, TaskType};
//!
//! assert_eq!(classify("Build me a website"), TaskType::WebsiteCreation);
//!
//! let task = Task::new("Build me a website");
//! assert_eq!(task.status(), TaskStatus::Planning);
//! ```

mod classifier;
mod event;
mod model;
mod record;

// Re-export public API
pub use classifier::classify;
pub use event::{CancelReason, TaskEvent};
pub use model::{
    MAX_PROGRESS, TASK_STEPS, Task, TaskSnapshot, TaskStatus, TaskType, step_index_for,
};
pub use record::{TaskOutcome, TaskRecord};
