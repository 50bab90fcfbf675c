//! Authorization vocabulary, role tables and user snapshots.

#![forbid(unsafe_code)]

mod audit;
mod bridge;
mod identity_policy;
mod permission;
mod role;
mod user;
mod user_context;

pub use audit::AuditAction;
pub use identity_policy::{IdentityRolePolicy, IdentityRolePolicyTable, SuperUserAllowlist};
pub use permission::{LEGACY_ADMIN_BUNDLE, Permission, PermissionCategory};
pub use role::{Role, RoleCapabilities, RoleCapability, RoleDefinition, RoleDisplay, RoleTable};
pub use user::{EmailAddress, UserProfile};
pub use user_context::{EffectivePermissions, PageScope, UserContext};
