use std::sync::Arc;

use chrono::Utc;
use portalguard_core::{AppError, AppResult, SessionId};
use portalguard_domain::{
    AuditAction, EffectivePermissions, EmailAddress, Permission, Role, UserContext,
};
use tracing::warn;

use crate::{
    AuditEvent, AuditRepository, AuthorizationConfig, PermissionResolver, RoleSwitchController,
    UserProfileRepository,
};

/// Application service combining stored profiles, session roles and the
/// permission resolver.
#[derive(Clone)]
pub struct AuthorizationService {
    resolver: PermissionResolver,
    profile_repository: Arc<dyn UserProfileRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        config: Arc<AuthorizationConfig>,
        profile_repository: Arc<dyn UserProfileRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            resolver: PermissionResolver::new(config),
            profile_repository,
            audit_repository,
        }
    }

    /// Returns the underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Opens a new role session for an identity.
    #[must_use]
    pub fn open_session(&self, identity: EmailAddress) -> RoleSwitchController {
        RoleSwitchController::open(SessionId::new(), identity, self.resolver.config())
    }

    /// Builds the authorization snapshot of a session.
    ///
    /// A missing profile, or one stored under a different identity, yields a
    /// context without per-user grants.
    pub async fn user_context(&self, session: &RoleSwitchController) -> AppResult<UserContext> {
        let identity = session.identity();
        let super_users = self.resolver.config().super_users();
        let active_role = Some(session.current_role());

        let profile = self.profile_repository.find_profile(identity).await?;
        let Some(profile) = profile else {
            return Ok(UserContext::without_profile(
                identity.clone(),
                active_role,
                super_users,
            ));
        };

        let stored_identity = EmailAddress::new(profile.email.as_str()).ok();
        if stored_identity.as_ref() != Some(identity) {
            warn!(
                identity = %identity,
                stored_email = profile.email.as_str(),
                "stored profile belongs to a different identity; ignoring its grants"
            );
        }

        Ok(UserContext::from_profile(
            identity,
            &profile,
            active_role,
            super_users,
        ))
    }

    /// Returns whether the session may use `permission`.
    pub async fn has_permission(
        &self,
        session: &RoleSwitchController,
        permission: &str,
    ) -> AppResult<bool> {
        let context = self.user_context(session).await?;
        Ok(self.resolver.resolve(permission, &context))
    }

    /// Ensures the session holds `permission`.
    pub async fn require_permission(
        &self,
        session: &RoleSwitchController,
        permission: Permission,
    ) -> AppResult<()> {
        if self.has_permission(session, permission.as_str()).await? {
            return Ok(());
        }

        self.append_event(
            session,
            AuditAction::PermissionDenied,
            "permission",
            permission.as_str(),
            Some(format!("active role '{}'", session.current_role())),
        )
        .await?;

        Err(AppError::Forbidden(format!(
            "identity '{}' is missing permission '{}'",
            session.identity(),
            permission.as_str()
        )))
    }

    /// Returns the display summary of the session's grants.
    pub async fn effective_permissions(
        &self,
        session: &RoleSwitchController,
    ) -> AppResult<EffectivePermissions> {
        let context = self.user_context(session).await?;
        Ok(self.resolver.effective_permissions(&context))
    }

    /// Switches the session's active role and records the attempt.
    ///
    /// The session is left untouched unless the switch is accepted and its
    /// audit event is stored.
    pub async fn switch_role(
        &self,
        session: &mut RoleSwitchController,
        target_role: &str,
    ) -> AppResult<Role> {
        let mut candidate = session.clone();
        let result = candidate.switch_role(self.resolver.config(), target_role);

        match result {
            Ok(role) => {
                self.append_event(
                    session,
                    AuditAction::RoleSwitched,
                    "session",
                    session.session_id().to_string().as_str(),
                    Some(format!("from '{}' to '{role}'", session.current_role())),
                )
                .await?;
                *session = candidate;
                Ok(role)
            }
            Err(denied) => {
                self.append_event(
                    session,
                    AuditAction::RoleSwitchDenied,
                    "session",
                    session.session_id().to_string().as_str(),
                    Some(format!("requested '{target_role}': {denied}")),
                )
                .await?;
                Err(denied.into())
            }
        }
    }

    async fn append_event(
        &self,
        session: &RoleSwitchController,
        action: AuditAction,
        resource_type: &str,
        resource_id: &str,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: session.identity().to_string(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id: resource_id.to_owned(),
                detail,
                occurred_at: Utc::now(),
            })
            .await
    }
}
