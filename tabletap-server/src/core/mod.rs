//! Core module - server configuration and shared state
//!
//! # Contents
//!
//! - [`Config`] - server configuration loaded from the environment
//! - [`ServerState`] - shared application state handed to every handler

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
