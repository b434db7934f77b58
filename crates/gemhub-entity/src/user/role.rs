//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles supplied by the external identity provider.
///
/// Only the two operator tiers take part in catalog authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Top administrative role. Approves and rejects products and sees
    /// every operator's documents.
    SuperAdmin,
    /// Ordinary operator. Manages only the products they created.
    Admin,
    /// Storefront buyer. Outside catalog authorization.
    User,
}

impl UserRole {
    /// Check if this is the top role.
    pub fn is_top_role(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Check if this role may operate the catalog at all.
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = gemhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "superadmin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(gemhub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: superadmin, admin, user"
            ))),
        }
    }
}
