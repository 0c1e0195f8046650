pub mod config;
pub mod error;
pub mod task;

// Re-export common types
pub use config::SimulatorConfig;
pub use error::{Result, ValisError};
