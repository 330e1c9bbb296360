pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{EventError, Result};
pub use manager::EventManager;
pub use types::{Hackathon, TeamMember};
