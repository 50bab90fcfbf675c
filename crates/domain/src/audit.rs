use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by authorization use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a session changes its active role.
    RoleSwitched,
    /// Emitted when a role switch request is rejected.
    RoleSwitchDenied,
    /// Emitted when a guarded action is refused.
    PermissionDenied,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleSwitched => "security.role.switched",
            Self::RoleSwitchDenied => "security.role.switch_denied",
            Self::PermissionDenied => "security.permission.denied",
        }
    }
}
