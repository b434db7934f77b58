//! Request context carrying the caller identity resolved upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::types::UserId;
use gemhub_entity::product::Product;
use gemhub_entity::user::UserRole;

/// Context for the current request.
///
/// Built by the transport layer from the identity provider's
/// `{caller_id, role}` and passed into every service method so each
/// operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's identity.
    pub user_id: UserId,
    /// The caller's role.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the caller holds the top role.
    pub fn is_top_role(&self) -> bool {
        self.role.is_top_role()
    }

    /// Returns whether the caller may edit or delete `product`.
    pub fn can_modify(&self, product: &Product) -> bool {
        self.is_top_role() || product.is_owned_by(self.user_id)
    }

    /// Fails unless the caller is a catalog operator.
    pub fn require_operator(&self) -> AppResult<()> {
        if self.role.is_operator() {
            Ok(())
        } else {
            Err(AppError::authorization("Operator access required"))
        }
    }

    /// Fails unless the caller holds the top role.
    pub fn require_top_role(&self, action: &str) -> AppResult<()> {
        if self.is_top_role() {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Only a super administrator can {action}"
            )))
        }
    }
}
