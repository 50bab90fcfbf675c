use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portalguard_core::AppResult;
use portalguard_domain::{AuditAction, EmailAddress, UserProfile};

/// Repository port for the stored user profiles feeding the resolver.
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Finds the stored profile of an identity.
    async fn find_profile(&self, identity: &EmailAddress) -> AppResult<Option<UserProfile>>;
}

/// Immutable audit event payload emitted by authorization use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Identity that performed the action.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
    /// When the action happened.
    pub occurred_at: DateTime<Utc>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
