//! Utility module - logging and input validation helpers

pub mod logger;
pub mod validation;
