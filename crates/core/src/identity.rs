//! Responder identity.
//!
//! A response belongs to either an authenticated user or an anonymous voter
//! token, never both. Modeling the pair as an enum makes "exactly one
//! identity populated" a compile-time invariant instead of a runtime check
//! over two nullable columns.

use serde::{Deserialize, Serialize};

/// The identity a response or stats row is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// An authenticated user ID.
    User(String),
    /// An anonymous voter token ID.
    Voter(String),
}

impl Identity {
    /// The user ID, if this is a user identity.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(id) => Some(id),
            Self::Voter(_) => None,
        }
    }

    /// The voter token ID, if this is a voter identity.
    #[must_use]
    pub fn voter_token_id(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Voter(id) => Some(id),
        }
    }

    /// Split into the `(user_id, voter_token_id)` column pair for storage.
    #[must_use]
    pub fn into_columns(self) -> (Option<String>, Option<String>) {
        match self {
            Self::User(id) => (Some(id), None),
            Self::Voter(id) => (None, Some(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_split() {
        let (user, voter) = Identity::User("u1".into()).into_columns();
        assert_eq!(user.as_deref(), Some("u1"));
        assert!(voter.is_none());

        let (user, voter) = Identity::Voter("v1".into()).into_columns();
        assert!(user.is_none());
        assert_eq!(voter.as_deref(), Some("v1"));
    }
}
