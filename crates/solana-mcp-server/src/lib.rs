pub mod app_state;
pub mod config;
pub mod cors;
pub mod handlers;
pub mod router;
pub mod tools;
