//! Layered permission resolution.
//!
//! Layers are evaluated in a fixed order and the first granting layer wins:
//! super-user, custom permissions, page permissions, feature permissions,
//! legacy admin bundle, role defaults. Anything left unresolved is denied.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use portalguard_domain::{
    EffectivePermissions, PageScope, Permission, RoleCapability, RoleDefinition, UserContext,
};
use serde::Serialize;
use tracing::debug;

use crate::AuthorizationConfig;

/// Layer that granted a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    /// Identity is on the super-user allowlist.
    SuperUser,
    /// Per-user permission override.
    CustomPermission,
    /// Page access list entry.
    PagePermission,
    /// Feature access list entry.
    FeaturePermission,
    /// Superseded single-flag admin bundle.
    LegacyAdminBundle,
    /// Default capability flag of the active role.
    RoleDefault,
}

/// Outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// Allowed by the given layer.
    Granted(GrantSource),
    /// No layer granted the permission.
    Denied,
}

impl PermissionDecision {
    /// Returns whether the permission was granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// Returns the granting layer, if any.
    #[must_use]
    pub fn source(&self) -> Option<GrantSource> {
        match self {
            Self::Granted(source) => Some(*source),
            Self::Denied => None,
        }
    }
}

/// Pure permission resolver over injected authorization tables.
///
/// Holds no mutable state and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    config: Arc<AuthorizationConfig>,
}

impl PermissionResolver {
    /// Creates a resolver over the given tables.
    #[must_use]
    pub fn new(config: Arc<AuthorizationConfig>) -> Self {
        Self { config }
    }

    /// Returns the tables this resolver reads.
    #[must_use]
    pub fn config(&self) -> &AuthorizationConfig {
        &self.config
    }

    /// Returns whether `permission` is allowed for the user.
    ///
    /// Unknown identifiers are denied rather than rejected.
    #[must_use]
    pub fn resolve(&self, permission: &str, context: &UserContext) -> bool {
        self.explain(permission, context).is_granted()
    }

    /// Typed variant of [`Self::resolve`].
    #[must_use]
    pub fn resolve_permission(&self, permission: Permission, context: &UserContext) -> bool {
        self.resolve(permission.as_str(), context)
    }

    /// Resolves a legacy boolean capability check.
    #[must_use]
    pub fn has_capability(&self, capability: RoleCapability, context: &UserContext) -> bool {
        self.resolve(capability.as_str(), context)
    }

    /// Resolves `permission` and reports which layer decided it.
    #[must_use]
    pub fn explain(&self, permission: &str, context: &UserContext) -> PermissionDecision {
        let decision = self.evaluate(permission, context);
        debug!(
            permission,
            identity = context.identity().as_str(),
            granted = decision.is_granted(),
            source = ?decision.source(),
            "resolved permission"
        );

        decision
    }

    fn evaluate(&self, permission: &str, context: &UserContext) -> PermissionDecision {
        if context.is_system_admin() {
            return PermissionDecision::Granted(GrantSource::SuperUser);
        }

        let known = Permission::from_str(permission).ok();

        if known.is_some_and(|value| context.custom_permissions().contains(&value)) {
            return PermissionDecision::Granted(GrantSource::CustomPermission);
        }

        // Page and feature identifiers share the permission namespace.
        if context.page_permissions().contains(permission) {
            return PermissionDecision::Granted(GrantSource::PagePermission);
        }

        if context.feature_permissions().contains(permission) {
            return PermissionDecision::Granted(GrantSource::FeaturePermission);
        }

        if context.legacy_admin_bundle_applies()
            && known.is_some_and(|value| value.is_in_legacy_admin_bundle())
        {
            return PermissionDecision::Granted(GrantSource::LegacyAdminBundle);
        }

        if self.role_default_allows(permission, known, context) {
            return PermissionDecision::Granted(GrantSource::RoleDefault);
        }

        PermissionDecision::Denied
    }

    fn role_default_allows(
        &self,
        permission: &str,
        known: Option<Permission>,
        context: &UserContext,
    ) -> bool {
        let Some(definition) = self.active_role_definition(context) else {
            return false;
        };

        if let Ok(capability) = RoleCapability::from_str(permission) {
            return definition.capabilities.allows(capability);
        }

        known
            .and_then(|value| value.role_capability())
            .is_some_and(|capability| definition.capabilities.allows(capability))
    }

    fn active_role_definition(&self, context: &UserContext) -> Option<&RoleDefinition> {
        context
            .current_role()
            .and_then(|role| self.config.role_table().get(role))
    }

    /// Summarizes everything the user is granted, for display.
    ///
    /// Super-users are reported with the all-pages marker and the full
    /// permission vocabulary instead of their literal grants.
    #[must_use]
    pub fn effective_permissions(&self, context: &UserContext) -> EffectivePermissions {
        if context.is_system_admin() {
            return EffectivePermissions {
                pages: PageScope::All,
                features: Permission::all()
                    .iter()
                    .map(|permission| permission.as_str().to_owned())
                    .collect(),
                role_permissions: RoleCapability::all()
                    .iter()
                    .map(|capability| (*capability, true))
                    .collect(),
            };
        }

        let definition = self.active_role_definition(context);

        let mut features: BTreeSet<String> = context.feature_permissions().clone();
        features.extend(
            context
                .custom_permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned()),
        );

        if context.legacy_admin_bundle_applies() {
            features.extend(
                portalguard_domain::LEGACY_ADMIN_BUNDLE
                    .iter()
                    .map(|permission| permission.as_str().to_owned()),
            );
        }

        if let Some(definition) = definition {
            features.extend(
                definition
                    .capabilities
                    .granted()
                    .filter_map(|capability| capability.permission())
                    .map(|permission| permission.as_str().to_owned()),
            );
        }

        EffectivePermissions {
            pages: PageScope::Listed(context.page_permissions().iter().cloned().collect()),
            features: features.into_iter().collect(),
            role_permissions: definition
                .map(|definition| definition.capabilities.flags())
                .unwrap_or_default(),
        }
    }
}
