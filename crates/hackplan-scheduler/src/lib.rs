//! Sleep-window-aware, dependency-aware task placement.
//!
//! Pure computation — no I/O, no clock reads. The gateway collects tasks,
//! members, edges, and assignments from the stores and hands them to
//! [`engine::build_schedule`]; [`calendar`] turns the result into the
//! day/week groupings the HTTP layer serves.

pub mod calendar;
pub mod engine;
pub mod error;
pub mod types;

pub use engine::build_schedule;
pub use error::{Result, ScheduleError};
pub use types::{Block, Schedule, ScheduleInput, Unplaced, UnplacedReason};
