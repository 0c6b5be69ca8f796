//! Database models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod staff;
pub mod tenant;

// Floor and menu
pub mod dining_table;
pub mod menu_item;

// Orders
pub mod order;

// Re-exports
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderCreate};
pub use staff::{Staff, StaffCreate};
pub use tenant::{Tenant, TenantCreate};
