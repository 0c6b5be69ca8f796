//! Roles and the static role -> capability map
//!
//! Authorization is a fixed lookup: each role owns a constant capability
//! slice and endpoints declare which capabilities they accept. There is
//! no per-tenant customization of the map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Principal role within a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Manager,
    KitchenStaff,
}

/// Fine-grained action a role may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateMenu,
    ManageMenu,
    ManageOrders,
    ManageStaff,
    ViewAnalytics,
    ViewOrders,
    UpdateOrderStatus,
}

const OWNER_CAPABILITIES: &[Capability] = &[
    Capability::CreateMenu,
    Capability::ManageMenu,
    Capability::ManageOrders,
    Capability::ManageStaff,
    Capability::ViewAnalytics,
    Capability::ViewOrders,
    Capability::UpdateOrderStatus,
];

const MANAGER_CAPABILITIES: &[Capability] = &[
    Capability::ManageMenu,
    Capability::ManageOrders,
    Capability::ViewOrders,
    Capability::ViewAnalytics,
];

const KITCHEN_STAFF_CAPABILITIES: &[Capability] =
    &[Capability::ViewOrders, Capability::UpdateOrderStatus];

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::KitchenStaff => "kitchen_staff",
        }
    }

    /// Capabilities granted to this role
    pub const fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Owner => OWNER_CAPABILITIES,
            Role::Manager => MANAGER_CAPABILITIES,
            Role::KitchenStaff => KITCHEN_STAFF_CAPABILITIES,
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// True when the role holds at least one of the given capabilities
    pub fn has_any(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.has_capability(*c))
    }

    /// Only non-owner roles can be assigned to staff accounts; the owner
    /// role belongs to the tenant itself.
    pub const fn assignable_to_staff(&self) -> bool {
        matches!(self, Role::Manager | Role::KitchenStaff)
    }
}

impl Capability {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::CreateMenu => "create_menu",
            Capability::ManageMenu => "manage_menu",
            Capability::ManageOrders => "manage_orders",
            Capability::ManageStaff => "manage_staff",
            Capability::ViewAnalytics => "view_analytics",
            Capability::ViewOrders => "view_orders",
            Capability::UpdateOrderStatus => "update_order_status",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRole(pub String);

impl fmt::Display for InvalidRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for InvalidRole {}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "kitchen_staff" => Ok(Role::KitchenStaff),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_every_capability() {
        for capability in [
            Capability::CreateMenu,
            Capability::ManageMenu,
            Capability::ManageOrders,
            Capability::ManageStaff,
            Capability::ViewAnalytics,
            Capability::ViewOrders,
            Capability::UpdateOrderStatus,
        ] {
            assert!(Role::Owner.has_capability(capability), "{capability}");
        }
    }

    #[test]
    fn test_kitchen_staff_is_limited() {
        assert!(Role::KitchenStaff.has_capability(Capability::ViewOrders));
        assert!(Role::KitchenStaff.has_capability(Capability::UpdateOrderStatus));
        assert!(!Role::KitchenStaff.has_capability(Capability::ManageMenu));
        assert!(!Role::KitchenStaff.has_capability(Capability::ManageStaff));
    }

    #[test]
    fn test_manager_cannot_create_menu_or_manage_staff() {
        assert!(Role::Manager.has_capability(Capability::ManageMenu));
        assert!(!Role::Manager.has_capability(Capability::CreateMenu));
        assert!(!Role::Manager.has_capability(Capability::ManageStaff));
    }

    #[test]
    fn test_has_any() {
        let wanted = [Capability::ManageOrders, Capability::UpdateOrderStatus];
        assert!(Role::KitchenStaff.has_any(&wanted));
        assert!(Role::Manager.has_any(&wanted));
        assert!(!Role::KitchenStaff.has_any(&[Capability::ViewAnalytics]));
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Owner, Role::Manager, Role::KitchenStaff] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("customer".parse::<Role>().is_err());
    }

    #[test]
    fn test_staff_assignable() {
        assert!(!Role::Owner.assignable_to_staff());
        assert!(Role::Manager.assignable_to_staff());
        assert!(Role::KitchenStaff.assignable_to_staff());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::KitchenStaff).unwrap(),
            "\"kitchen_staff\""
        );
        assert_eq!(
            serde_json::to_string(&Capability::UpdateOrderStatus).unwrap(),
            "\"update_order_status\""
        );
    }
}
