//! Identity domain model

use serde::{Deserialize, Serialize};

/// Represents a signed-in contributor as issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Path or URL of the avatar image
    pub avatar: String,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_creation() {
        let identity = Identity::new("user-123", "Ama Mensah", "ama@example.com", "/ama.jpg");
        assert_eq!(identity.id, "user-123");
        assert_eq!(identity.name, "Ama Mensah");
        assert_eq!(identity.email, "ama@example.com");
        assert_eq!(identity.avatar, "/ama.jpg");
    }
}
