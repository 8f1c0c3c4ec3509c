use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::common::{ArtisanId, UserId};

/// Role carried in the JWT. An account holding an artisan profile acts as
/// `Artisan` while that profile is the active one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Artisan,
    Admin,
}

/// The authenticated caller of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    /// Active artisan profile, present when the account switched to it
    pub artisan_id: Option<ArtisanId>,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role, artisan_id: Option<ArtisanId>) -> Self {
        Self {
            user_id,
            role,
            artisan_id,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }

    /// Owner or admin
    pub fn can_manage(&self, owner: UserId) -> Result<(), AuthError> {
        if self.is_admin() || self.user_id == owner {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied(
                "job belongs to another customer".to_string(),
            ))
        }
    }

    /// Owner, the artisan assigned to the job, or admin
    pub fn can_view(&self, owner: UserId, assigned: Option<ArtisanId>) -> Result<(), AuthError> {
        let is_assigned = matches!((self.artisan_id, assigned), (Some(a), Some(b)) if a == b);
        if is_assigned {
            return Ok(());
        }
        self.can_manage(owner)
    }
}
