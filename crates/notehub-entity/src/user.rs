//! User account and collaborator identity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::id::UserId;

/// A user account, as stored by the identity side of the system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// The user's email address.
    pub email: String,
    /// Avatar image reference, if any.
    pub avatar_url: Option<String>,
}

/// The identity a client announces into a document presence room.
///
/// Ephemeral: exists only while the user's realtime connection to the
/// room is active. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorIdentity {
    /// The user's id. Doubles as the stable cursor key for this user.
    pub user_id: UserId,
    /// Human-readable name shown on the cursor label and avatar list.
    pub display_name: String,
    /// Avatar image reference, if any.
    pub avatar_url: Option<String>,
}

impl CollaboratorIdentity {
    /// Derive a presence identity from a user account. The display name
    /// is the local part of the email address.
    pub fn from_user(user: &User) -> Self {
        let display_name = user
            .email
            .split('@')
            .next()
            .unwrap_or(user.email.as_str())
            .to_string();
        Self {
            user_id: user.id,
            display_name,
            avatar_url: user.avatar_url.clone(),
        }
    }

    /// The stable per-user key used to label cursor markers.
    pub fn cursor_key(&self) -> String {
        self.user_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_email_local_part() {
        let user = User {
            id: UserId::new(),
            email: "ada.lovelace@example.com".to_string(),
            avatar_url: None,
        };
        let identity = CollaboratorIdentity::from_user(&user);
        assert_eq!(identity.display_name, "ada.lovelace");
    }
}
