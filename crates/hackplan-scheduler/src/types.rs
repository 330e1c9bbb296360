use chrono::{DateTime, Utc};
use hackplan_events::TeamMember;
use hackplan_tasks::{Assignment, DependencyEdge, Task};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to lay out one hackathon.
#[derive(Debug, Clone)]
pub struct ScheduleInput {
    /// Event start instant.
    pub starts_at: DateTime<Utc>,
    /// Event length in whole hours.
    pub duration_hours: u32,
    pub members: Vec<TeamMember>,
    pub tasks: Vec<Task>,
    pub edges: Vec<DependencyEdge>,
    /// Explicit task → member assignments; these override skill matching.
    pub assignments: Vec<Assignment>,
    /// Placement granularity in minutes (estimates round up to whole slots).
    pub slot_minutes: u32,
}

/// One contiguous stretch of work for one member.
///
/// A task split around a sleep window produces several blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub task_id: String,
    pub member_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Why a task could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// No member was eligible (required skill nobody holds, explicit
    /// assignment to an unknown member, or an empty team).
    NoEligibleMember,
    /// The remaining work cannot finish before the hackathon ends, or a
    /// prerequisite task was itself unplaced.
    OutOfTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unplaced {
    pub task_id: String,
    pub reason: UnplacedReason,
}

/// Engine output: placed blocks (sorted by start) plus the tasks that did
/// not fit and why.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub blocks: Vec<Block>,
    pub unplaced: Vec<Unplaced>,
}

impl Schedule {
    /// All blocks belonging to one task, in order.
    pub fn blocks_for_task(&self, task_id: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.task_id == task_id)
            .collect()
    }

    /// All blocks belonging to one member, in order.
    pub fn blocks_for_member(&self, member_id: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.member_id == member_id)
            .collect()
    }
}
