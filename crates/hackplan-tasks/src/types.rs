use hackplan_core::types::{TaskPhase, TaskPriority, TaskStatus};
use serde::{Deserialize, Serialize};

/// A unit of work inside a hackathon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// UUIDv7 string — primary key.
    pub id: String,
    pub hackathon_id: String,
    pub title: String,
    pub phase: TaskPhase,
    /// Estimated effort in hours; fractional values allowed (e.g. 1.5).
    pub estimated_hours: f64,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// When set, the scheduler prefers members holding this skill.
    pub required_skill: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A directed dependency edge: `task_id` cannot start before `depends_on` finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub task_id: String,
    pub depends_on: String,
}

/// An explicit task → member assignment. One member per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: String,
    pub member_id: String,
}
