pub mod auth;
pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{Result, UserError};
pub use manager::UserManager;
pub use types::User;
