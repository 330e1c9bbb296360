pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{Result, TaskError};
pub use manager::TaskManager;
pub use types::{Assignment, DependencyEdge, Task};
