use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Task cannot depend on itself: {0}")]
    SelfDependency(String),

    #[error("Dependency already exists: {task_id} -> {depends_on}")]
    DuplicateDependency { task_id: String, depends_on: String },

    /// The rejected edge would have closed a cycle through these tasks.
    #[error("Dependency would create a cycle: {path:?}")]
    DependencyCycle { path: Vec<String> },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
