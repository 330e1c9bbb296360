pub mod ai_proxy;
pub mod auth;
pub mod generate;
pub mod hackathons;
pub mod health;
pub mod members;
pub mod schedule;
pub mod tasks;
