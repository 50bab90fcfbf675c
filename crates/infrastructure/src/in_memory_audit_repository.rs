use async_trait::async_trait;
use portalguard_application::{AuditEvent, AuditRepository};
use portalguard_core::AppResult;
use tokio::sync::RwLock;
use tracing::info;

/// Append-only in-memory audit log that also traces every event.
#[derive(Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events in append order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            subject = event.subject.as_str(),
            action = event.action.as_str(),
            resource_type = event.resource_type.as_str(),
            resource_id = event.resource_id.as_str(),
            detail = event.detail.as_deref(),
            occurred_at = %event.occurred_at,
            "audit event"
        );

        self.events.write().await.push(event);
        Ok(())
    }
}
