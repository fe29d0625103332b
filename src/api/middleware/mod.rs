//! Request middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Caller identity, rejects anonymous requests
//! 2. Access log, runs after the caller is known

pub mod audit;
pub mod auth;
