//! Voter identity service.
//!
//! Maps an anonymous request to a stable opaque voter token, independent of
//! user accounts. Tokens are random secrets; only their digest is stored
//! and the raw value is handed to the client exactly once.

use chrono::Utc;
use pulse_common::{token_digest, AppError, AppResult, IdGenerator};
use pulse_db::{entities::voter_token, repositories::VoterTokenRepository};
use sea_orm::Set;

use crate::services::rate_limit::normalize_ip;

/// Outcome of identity resolution.
#[derive(Debug, Clone)]
pub struct ResolvedVoter {
    /// The voter token row backing this identity.
    pub token: voter_token::Model,
    /// The raw token, present only when freshly minted. Callers must
    /// forward it to the client; it cannot be recovered later.
    pub issued: Option<String>,
}

/// Voter identity service.
#[derive(Clone)]
pub struct VoterService {
    voter_repo: VoterTokenRepository,
    id_gen: IdGenerator,
}

impl VoterService {
    /// Create a new voter service.
    #[must_use]
    pub const fn new(voter_repo: VoterTokenRepository) -> Self {
        Self {
            voter_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a request to a voter identity.
    ///
    /// A presented token that matches an existing row reuses it; a missing
    /// or unknown token mints a fresh identity with `vote_count = 0`.
    /// Idempotent given the same prior token, and performs no writes beyond
    /// its own row.
    pub async fn resolve(&self, presented: Option<&str>, ip: &str) -> AppResult<ResolvedVoter> {
        if let Some(raw) = presented {
            let raw = raw.trim();
            if !raw.is_empty() {
                if let Some(existing) = self.voter_repo.find_by_hash(&token_digest(raw)).await? {
                    let token = self.voter_repo.touch(existing).await?;
                    return Ok(ResolvedVoter {
                        token,
                        issued: None,
                    });
                }
            }
        }
        self.mint(ip).await
    }

    /// Resolve a presented token that must already exist.
    pub async fn require(&self, presented: &str) -> AppResult<voter_token::Model> {
        self.voter_repo
            .find_by_hash(&token_digest(presented.trim()))
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Mint a fresh voter identity.
    pub async fn mint(&self, ip: &str) -> AppResult<ResolvedVoter> {
        let raw = self.id_gen.generate_token();
        let now = Utc::now();
        let model = voter_token::ActiveModel {
            id: Set(self.id_gen.generate()),
            token_hash: Set(token_digest(&raw)),
            ip_address: Set(normalize_ip(ip)),
            vote_count: Set(0),
            created_at: Set(now.into()),
            last_seen_at: Set(now.into()),
        };
        let token = self.voter_repo.create(model).await?;
        Ok(ResolvedVoter {
            token,
            issued: Some(raw),
        })
    }

    /// Count an accepted vote against a token.
    pub async fn record_vote(&self, token_id: &str) -> AppResult<()> {
        let token = self
            .voter_repo
            .find_by_id(token_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Voter token not found: {token_id}")))?;
        self.voter_repo.record_vote(token).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn voter_row(id: &str, hash: &str, votes: i32) -> voter_token::Model {
        let now = Utc::now();
        voter_token::Model {
            id: id.to_string(),
            token_hash: hash.to_string(),
            ip_address: "203.0.113.7".to_string(),
            vote_count: votes,
            created_at: now.into(),
            last_seen_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_resolve_reuses_known_token() {
        let raw = "voter-secret";
        let existing = voter_row("v1", &token_digest(raw), 4);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()], [existing.clone()]])
            .into_connection();
        let service = VoterService::new(VoterTokenRepository::new(Arc::new(db)));

        let resolved = service.resolve(Some(raw), "203.0.113.7").await.unwrap();
        assert_eq!(resolved.token.id, "v1");
        assert_eq!(resolved.token.vote_count, 4);
        // Reuse never re-issues the raw token.
        assert!(resolved.issued.is_none());
    }

    #[tokio::test]
    async fn test_resolve_without_token_mints_fresh_identity() {
        let minted = voter_row("v2", "irrelevant", 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[minted]])
            .into_connection();
        let service = VoterService::new(VoterTokenRepository::new(Arc::new(db)));

        let resolved = service.resolve(None, "203.0.113.7").await.unwrap();
        assert_eq!(resolved.token.vote_count, 0);
        let issued = resolved.issued.unwrap();
        assert_eq!(issued.len(), 32);
    }

    #[tokio::test]
    async fn test_require_unknown_token_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<voter_token::Model>::new()])
            .into_connection();
        let service = VoterService::new(VoterTokenRepository::new(Arc::new(db)));

        let err = service.require("nope").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
