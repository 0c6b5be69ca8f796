//! Shared types for the tabletap platform
//!
//! Common types used across the server and its integration tests: error
//! codes and error types, the JSON response envelope, role/capability
//! definitions, and the order status machine.

pub mod auth;
pub mod error;
pub mod order;
pub mod response;

// Re-exports
pub use auth::{Capability, Role};
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{OrderItem, OrderStatus};
pub use response::ApiResponse;
