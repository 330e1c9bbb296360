use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The dependency graph contains a cycle through these tasks.
    /// (The task store rejects cycle-closing edges, so hitting this means
    /// the input was assembled from inconsistent sources.)
    #[error("Dependency cycle involving tasks: {task_ids:?}")]
    DependencyCycle { task_ids: Vec<String> },

    #[error("Dependency edge references unknown task: {id}")]
    UnknownTask { id: String },

    #[error("Invalid slot granularity: {slot_minutes} (must be 1..=1440)")]
    InvalidSlot { slot_minutes: u32 },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
