//! Records of finished tasks.
//!
//! Once a task leaves the live slot the simulator keeps a `TaskRecord` for
//! it, so callers can still look the task up by id.

use serde::{Deserialize, Serialize};

use super::event::CancelReason;
use super::model::{TaskSnapshot, TaskStatus, TaskType};

/// How a task left the live slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    Cancelled { reason: CancelReason },
}

/// A finished task as kept in the simulator history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub task_type: TaskType,
    pub description: String,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
    /// Progress when the task left the slot.
    pub progress: f64,
    pub status: TaskStatus,
    pub created_at: String,
    pub finished_at: String,
    /// Result line, present only for completed tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl TaskRecord {
    /// Record for a task that reached 100%.
    pub fn completed(snapshot: TaskSnapshot) -> Self {
        let summary = Some(snapshot.task_type.result_summary().to_string());
        Self::from_snapshot(snapshot, TaskOutcome::Completed, summary)
    }

    /// Record for a task discarded before completing.
    pub fn cancelled(snapshot: TaskSnapshot, reason: CancelReason) -> Self {
        Self::from_snapshot(snapshot, TaskOutcome::Cancelled { reason }, None)
    }

    fn from_snapshot(snapshot: TaskSnapshot, outcome: TaskOutcome, summary: Option<String>) -> Self {
        Self {
            id: snapshot.id,
            task_type: snapshot.task_type,
            description: snapshot.description,
            outcome,
            progress: snapshot.progress,
            status: snapshot.status,
            created_at: snapshot.created_at,
            finished_at: chrono::Utc::now().to_rfc3339(),
            summary,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Completed)
    }
}
