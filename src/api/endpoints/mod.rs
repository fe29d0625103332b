//! API endpoint handlers.
//!
//! Handlers stay thin: they resolve the caller, open a connection on a
//! blocking thread and delegate to the library modules.

pub mod achievements;
pub mod analytics;
pub mod health;
pub mod records;
