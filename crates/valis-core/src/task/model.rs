//! Task domain model.
//!
//! A `Task` is the in-memory record of one simulated unit of AI work. Its
//! status and current step are never stored: both are derived from progress,
//! which can only move forward.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::classifier::classify;

/// Upper bound of task progress, in percent.
pub const MAX_PROGRESS: f64 = 100.0;

/// Progress span covered by each step.
const STEP_SPAN: f64 = 25.0;

/// Step labels shown for every task, in execution order.
pub const TASK_STEPS: [&str; 4] = [
    "Analyzing requirements",
    "Planning execution",
    "Building solution",
    "Testing and deployment",
];

/// The category a request is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    WebsiteCreation,
    ApplicationDevelopment,
    PresentationCreation,
    ApiDevelopment,
    GeneralAssistance,
}

impl TaskType {
    /// Stable identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::WebsiteCreation => "website-creation",
            TaskType::ApplicationDevelopment => "application-development",
            TaskType::PresentationCreation => "presentation-creation",
            TaskType::ApiDevelopment => "api-development",
            TaskType::GeneralAssistance => "general-assistance",
        }
    }

    /// Human-readable name used in chat text, e.g. "website creation".
    pub fn display_name(&self) -> String {
        self.as_str().replace('-', " ")
    }

    /// One-line result reported when a task of this type finishes.
    pub fn result_summary(&self) -> &'static str {
        match self {
            TaskType::WebsiteCreation => "Website generated successfully",
            TaskType::ApplicationDevelopment => "Full-stack application created successfully",
            TaskType::PresentationCreation => "Presentation created successfully",
            TaskType::ApiDevelopment => "API created successfully",
            TaskType::GeneralAssistance => "Response generated successfully",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Execution phase of a task.
///
/// Variants are declared in lifecycle order, so `Ord` reflects forward
/// movement: a later status always compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Planning,
    Executing,
    Testing,
    Deploying,
    Completed,
}

impl TaskStatus {
    /// Maps a progress value onto its phase.
    pub fn from_progress(progress: f64) -> Self {
        if progress < 25.0 {
            TaskStatus::Planning
        } else if progress < 50.0 {
            TaskStatus::Executing
        } else if progress < 75.0 {
            TaskStatus::Testing
        } else if progress < MAX_PROGRESS {
            TaskStatus::Deploying
        } else {
            TaskStatus::Completed
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Planning => "planning",
            TaskStatus::Executing => "executing",
            TaskStatus::Testing => "testing",
            TaskStatus::Deploying => "deploying",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Index into `TASK_STEPS` for a progress value, never past the last step.
pub fn step_index_for(progress: f64) -> usize {
    let index = (progress.max(0.0) / STEP_SPAN).floor() as usize;
    index.min(TASK_STEPS.len() - 1)
}

/// A single simulated task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: String,
    task_type: TaskType,
    description: String,
    progress: f64,
    created_at: String,
    updated_at: String,
}

impl Task {
    /// Creates a task for the given request, classifying it once.
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            task_type: classify(&description),
            description,
            progress: 0.0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Category derived from the description at creation.
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// The user's original request.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Creation timestamp (RFC 3339).
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Timestamp of the last progress change (RFC 3339).
    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_progress(self.progress)
    }

    pub fn current_step_index(&self) -> usize {
        step_index_for(self.progress)
    }

    pub fn current_step(&self) -> &'static str {
        TASK_STEPS[self.current_step_index()]
    }

    pub fn steps(&self) -> &'static [&'static str] {
        &TASK_STEPS
    }

    pub fn is_complete(&self) -> bool {
        self.status().is_terminal()
    }

    /// Adds `increment` to progress, clamped to `MAX_PROGRESS`.
    ///
    /// Negative or non-finite increments leave the task untouched. Returns
    /// the progress after the update.
    pub fn advance(&mut self, increment: f64) -> f64 {
        if !increment.is_finite() || increment <= 0.0 || self.is_complete() {
            return self.progress;
        }
        self.progress = (self.progress + increment).min(MAX_PROGRESS);
        self.updated_at = chrono::Utc::now().to_rfc3339();
        self.progress
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id.clone(),
            task_type: self.task_type,
            description: self.description.clone(),
            status: self.status(),
            progress: self.progress,
            current_step_index: self.current_step_index(),
            current_step: self.current_step().to_string(),
            steps: TASK_STEPS.iter().map(|s| s.to_string()).collect(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Serializable view of a live task, published on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: String,
    pub task_type: TaskType,
    pub description: String,
    pub status: TaskStatus,
    pub progress: f64,
    pub current_step_index: usize,
    pub current_step: String,
    pub steps: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_starts_in_planning() {
        let task = Task::new("Build me a website");

        assert_eq!(task.task_type(), TaskType::WebsiteCreation);
        assert_eq!(task.description(), "Build me a website");
        assert_eq!(task.status(), TaskStatus::Planning);
        assert_eq!(task.progress(), 0.0);
        assert_eq!(task.current_step_index(), 0);
        assert_eq!(task.steps().len(), 4);
        assert!(!task.id().is_empty());
        assert_eq!(task.created_at(), task.updated_at());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let first = Task::new("First task");
        let second = Task::new("First task");
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_status_thresholds() {
        let cases = [
            (0.0, TaskStatus::Planning),
            (24.99, TaskStatus::Planning),
            (25.0, TaskStatus::Executing),
            (49.9, TaskStatus::Executing),
            (50.0, TaskStatus::Testing),
            (74.9, TaskStatus::Testing),
            (75.0, TaskStatus::Deploying),
            (99.99, TaskStatus::Deploying),
            (100.0, TaskStatus::Completed),
        ];
        for (progress, expected) in cases {
            assert_eq!(TaskStatus::from_progress(progress), expected, "progress {progress}");
        }
    }

    #[test]
    fn test_step_index_stays_within_steps() {
        assert_eq!(step_index_for(0.0), 0);
        assert_eq!(step_index_for(24.9), 0);
        assert_eq!(step_index_for(25.0), 1);
        assert_eq!(step_index_for(74.9), 2);
        assert_eq!(step_index_for(75.0), 3);
        assert_eq!(step_index_for(100.0), 3);
    }

    #[test]
    fn test_advance_is_monotonic_and_clamped() {
        let mut task = Task::new("Write a poem");
        let increments = [7.5, 0.0, -3.0, f64::NAN, 19.9, 12.0, 19.99, 19.0, 19.5, 15.0];

        let mut last_progress = task.progress();
        let mut last_status = task.status();
        for increment in increments {
            let progress = task.advance(increment);
            assert!(progress >= last_progress);
            assert!(progress <= MAX_PROGRESS);
            assert!(task.status() >= last_status);
            assert!(task.current_step_index() <= 3);
            last_progress = progress;
            last_status = task.status();
        }

        assert_eq!(task.progress(), MAX_PROGRESS);
        assert!(task.is_complete());
        assert_eq!(task.current_step(), "Testing and deployment");
    }

    #[test]
    fn test_completed_only_at_final_advance() {
        let mut task = Task::new("Create an API");
        for _ in 0..9 {
            task.advance(10.0);
            assert_ne!(task.status(), TaskStatus::Completed);
        }
        task.advance(10.0);
        assert_eq!(task.status(), TaskStatus::Completed);

        // Terminal tasks ignore further ticks
        task.advance(10.0);
        assert_eq!(task.progress(), MAX_PROGRESS);
    }

    #[test]
    fn test_snapshot_serializes_kebab_case_type() {
        let mut task = Task::new("Make some slides");
        task.advance(30.0);

        let json = serde_json::to_value(task.snapshot()).unwrap();
        assert_eq!(json["task_type"], "presentation-creation");
        assert_eq!(json["status"], "executing");
        assert_eq!(json["current_step_index"], 1);
        assert_eq!(json["current_step"], "Planning execution");
        assert_eq!(json["created_at"], task.created_at());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(TaskType::ApiDevelopment.display_name(), "api development");
        assert_eq!(TaskType::GeneralAssistance.to_string(), "general-assistance");
    }
}
