//! Session-scoped active role state machine.

use std::str::FromStr;

use portalguard_core::{AppError, SessionId};
use portalguard_domain::{EmailAddress, Role};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::AuthorizationConfig;

/// Reason a role switch was rejected.
///
/// Every variant is reported to end users as the same `"denied"` reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleSwitchDenied {
    /// The requested role is not a known role identifier.
    #[error("'{0}' is not a known role")]
    UnknownRole(String),
    /// The identity has no role policy.
    #[error("identity has no role policy")]
    NoPolicy,
    /// The identity's policy forbids switching.
    #[error("identity may not switch profiles")]
    SwitchingDisabled,
    /// The requested role is outside the identity's allowed roles.
    #[error("role '{0}' is not allowed for this identity")]
    RoleNotAllowed(Role),
}

impl RoleSwitchDenied {
    /// Reason reported to callers.
    pub const REASON: &'static str = "denied";

    /// Returns the externally visible reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        Self::REASON
    }
}

impl From<RoleSwitchDenied> for AppError {
    fn from(value: RoleSwitchDenied) -> Self {
        AppError::Forbidden(format!("role switch denied: {value}"))
    }
}

/// Transport shape of a role switch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleSwitchOutcome {
    /// Whether the switch was applied.
    pub ok: bool,
    /// Failure reason, present only when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl RoleSwitchOutcome {
    /// Builds the outcome of a switch attempt.
    #[must_use]
    pub fn from_result(result: &Result<Role, RoleSwitchDenied>) -> Self {
        match result {
            Ok(_) => Self {
                ok: true,
                reason: None,
            },
            Err(denied) => Self {
                ok: false,
                reason: Some(denied.reason()),
            },
        }
    }
}

/// Active role of one session.
///
/// Only accepted switches mutate the state; the guard and the write happen
/// under the same exclusive borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSwitchController {
    session_id: SessionId,
    identity: EmailAddress,
    current_role: Role,
}

impl RoleSwitchController {
    /// Opens a session in the identity's initial role.
    #[must_use]
    pub fn open(
        session_id: SessionId,
        identity: EmailAddress,
        config: &AuthorizationConfig,
    ) -> Self {
        let current_role = config.initial_role_for(&identity);
        Self {
            session_id,
            identity,
            current_role,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the session identity.
    #[must_use]
    pub fn identity(&self) -> &EmailAddress {
        &self.identity
    }

    /// Returns the active role.
    #[must_use]
    pub fn current_role(&self) -> Role {
        self.current_role
    }

    /// Switches to a role given by its storage value.
    pub fn switch_role(
        &mut self,
        config: &AuthorizationConfig,
        target_role: &str,
    ) -> Result<Role, RoleSwitchDenied> {
        match Role::from_str(target_role.trim()) {
            Ok(target) => self.switch_to(config, target),
            Err(_) => {
                let denied = RoleSwitchDenied::UnknownRole(target_role.to_owned());
                warn!(
                    session_id = %self.session_id,
                    identity = %self.identity,
                    target_role,
                    %denied,
                    "role switch denied"
                );
                Err(denied)
            }
        }
    }

    /// Switches to `target` if the identity's policy admits it.
    pub fn switch_to(
        &mut self,
        config: &AuthorizationConfig,
        target: Role,
    ) -> Result<Role, RoleSwitchDenied> {
        if let Err(denied) = self.authorize_switch(config, target) {
            warn!(
                session_id = %self.session_id,
                identity = %self.identity,
                target_role = %target,
                %denied,
                "role switch denied"
            );
            return Err(denied);
        }

        let previous = std::mem::replace(&mut self.current_role, target);
        info!(
            session_id = %self.session_id,
            identity = %self.identity,
            from = %previous,
            to = %target,
            "role switched"
        );

        Ok(target)
    }

    fn authorize_switch(
        &self,
        config: &AuthorizationConfig,
        target: Role,
    ) -> Result<(), RoleSwitchDenied> {
        if config.is_super_user(&self.identity) {
            return Ok(());
        }

        let policy = config
            .identity_policies()
            .get(&self.identity)
            .ok_or(RoleSwitchDenied::NoPolicy)?;

        if !policy.can_switch_profiles {
            return Err(RoleSwitchDenied::SwitchingDisabled);
        }

        if !policy.permits_switch_to(target) {
            return Err(RoleSwitchDenied::RoleNotAllowed(target));
        }

        Ok(())
    }
}
