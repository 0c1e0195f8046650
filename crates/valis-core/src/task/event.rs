use serde::{Deserialize, Serialize};

use super::model::TaskType;

/// Why a live task was discarded before completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// A new task was started while this one was live.
    Superseded,
    /// The caller asked for cancellation.
    Requested,
}

/// Lifecycle events published by the simulator for the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task was installed as the live task.
    Started {
        task_id: String,
        task_type: TaskType,
    },
    /// A task reached 100% progress. Emitted exactly once per finished task.
    Completed {
        task_id: String,
        task_type: TaskType,
        /// Per-type result line, see `TaskType::result_summary`.
        summary: String,
    },
    /// A live task was discarded without completing.
    Cancelled {
        task_id: String,
        reason: CancelReason,
    },
}

impl TaskEvent {
    /// Completion event for a finished task of `task_type`.
    pub fn completed(task_id: impl Into<String>, task_type: TaskType) -> Self {
        TaskEvent::Completed {
            task_id: task_id.into(),
            task_type,
            summary: task_type.result_summary().to_string(),
        }
    }

    pub fn task_id(&self) -> &str {
        match self {
            TaskEvent::Started { task_id, .. }
            | TaskEvent::Completed { task_id, .. }
            | TaskEvent::Cancelled { task_id, .. } => task_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskEvent::Completed { .. })
    }

    /// Transcript line the message log appends for this event.
    pub fn message(&self) -> String {
        match self {
            TaskEvent::Started { task_type, .. } => format!(
                "I'll help you with that! I've detected this as a {} request. Let me work on this autonomously...",
                task_type.display_name()
            ),
            TaskEvent::Completed { task_type, .. } => {
                format!("Task completed successfully! Your {} is ready.", task_type)
            }
            TaskEvent::Cancelled { task_id, .. } => format!("Task {} was cancelled.", task_id),
        }
    }
}
