//! Authorization roles.

use serde::{Deserialize, Serialize};

/// Authorization role attached to a user account.
///
/// Stored as lowercase TEXT in the database. Admin unlocks catalog
/// mutation, description generation, and analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    /// Returns the database/wire representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its database representation.
    ///
    /// Unknown values fall back to `Customer` rather than failing the
    /// whole row.
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Customer,
        }
    }

    /// Whether this role grants administrative access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::from_str_or_default(Role::Admin.as_str()), Role::Admin);
        assert_eq!(
            Role::from_str_or_default(Role::Customer.as_str()),
            Role::Customer
        );
    }

    #[test]
    fn test_unknown_role_defaults_to_customer() {
        assert_eq!(Role::from_str_or_default("superuser"), Role::Customer);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize");
        assert_eq!(json, "\"admin\"");
    }
}
