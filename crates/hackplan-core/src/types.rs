use serde::{Deserialize, Serialize};
use std::fmt;

/// Hackathon lifecycle phase a task belongs to.
///
/// Phases order the schedule coarsely: planning before build, build before
/// polish, polish before demo prep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    Planning,
    Build,
    Polish,
    Demo,
}

impl TaskPhase {
    /// Ordinal used for schedule ordering (planning first).
    pub fn rank(&self) -> u8 {
        match self {
            TaskPhase::Planning => 0,
            TaskPhase::Build => 1,
            TaskPhase::Polish => 2,
            TaskPhase::Demo => 3,
        }
    }
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskPhase::Planning => "planning",
            TaskPhase::Build => "build",
            TaskPhase::Polish => "polish",
            TaskPhase::Demo => "demo",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TaskPhase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "planning" => Ok(TaskPhase::Planning),
            "build" => Ok(TaskPhase::Build),
            "polish" => Ok(TaskPhase::Polish),
            "demo" => Ok(TaskPhase::Demo),
            other => Err(format!("unknown task phase: {other}")),
        }
    }
}

/// Task urgency. Within a phase, high-priority tasks are scheduled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Higher value schedules earlier.
    pub fn weight(&self) -> u8 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown task priority: {other}")),
        }
    }
}

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn phase_ordering_matches_rank() {
        assert!(TaskPhase::Planning.rank() < TaskPhase::Build.rank());
        assert!(TaskPhase::Build.rank() < TaskPhase::Polish.rank());
        assert!(TaskPhase::Polish.rank() < TaskPhase::Demo.rank());
    }

    #[test]
    fn enums_round_trip_through_strings() {
        for phase in [
            TaskPhase::Planning,
            TaskPhase::Build,
            TaskPhase::Polish,
            TaskPhase::Demo,
        ] {
            assert_eq!(TaskPhase::from_str(&phase.to_string()), Ok(phase));
        }
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from_str(&status.to_string()), Ok(status));
        }
        for prio in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::from_str(&prio.to_string()), Ok(prio));
        }
        assert!(TaskPhase::from_str("shipping").is_err());
    }
}
