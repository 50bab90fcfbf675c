//! Immutable authorization tables injected into the resolver and the
//! role-switch controller.

use portalguard_core::{AppError, AppResult};
use portalguard_domain::{
    EmailAddress, IdentityRolePolicyTable, Role, RoleTable, SuperUserAllowlist,
};
use serde::Deserialize;
use tracing::warn;

/// Role given to identities without a role policy.
pub const DEFAULT_ROLE: Role = Role::SocialMediaManager;

/// Static tables consulted by authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationConfig {
    super_users: SuperUserAllowlist,
    role_table: RoleTable,
    identity_policies: IdentityRolePolicyTable,
    default_role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AuthorizationConfigDocument {
    #[serde(default)]
    super_users: SuperUserAllowlist,
    role_table: RoleTable,
    #[serde(default)]
    identity_policies: IdentityRolePolicyTable,
    #[serde(default = "default_role")]
    default_role: Role,
}

fn default_role() -> Role {
    DEFAULT_ROLE
}

impl AuthorizationConfig {
    /// Creates a validated configuration.
    pub fn new(
        super_users: SuperUserAllowlist,
        role_table: RoleTable,
        identity_policies: IdentityRolePolicyTable,
        default_role: Role,
    ) -> AppResult<Self> {
        let config = Self {
            super_users,
            role_table,
            identity_policies,
            default_role,
        };

        if let Err(error) = config.validate() {
            warn!(%error, "rejected authorization configuration");
            return Err(error);
        }

        Ok(config)
    }

    /// Returns the tables shipped with the portal.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            super_users: SuperUserAllowlist::builtin(),
            role_table: RoleTable::builtin(),
            identity_policies: IdentityRolePolicyTable::builtin(),
            default_role: DEFAULT_ROLE,
        }
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// Expected shape: `{ "superUsers": [..], "roleTable": {..},
    /// "identityPolicies": {..}, "defaultRole": ".." }`. Only `roleTable` is
    /// required.
    pub fn from_json_str(document: &str) -> AppResult<Self> {
        let document: AuthorizationConfigDocument =
            serde_json::from_str(document).map_err(|error| {
                warn!(%error, "failed to parse authorization configuration");
                AppError::Validation(format!("invalid authorization configuration: {error}"))
            })?;

        Self::new(
            document.super_users,
            document.role_table,
            document.identity_policies,
            document.default_role,
        )
    }

    /// Returns the super-user allowlist.
    #[must_use]
    pub fn super_users(&self) -> &SuperUserAllowlist {
        &self.super_users
    }

    /// Returns the role table.
    #[must_use]
    pub fn role_table(&self) -> &RoleTable {
        &self.role_table
    }

    /// Returns the identity role policies.
    #[must_use]
    pub fn identity_policies(&self) -> &IdentityRolePolicyTable {
        &self.identity_policies
    }

    /// Returns the fallback role for identities without a policy.
    #[must_use]
    pub fn default_role(&self) -> Role {
        self.default_role
    }

    /// Returns whether an identity is a super-user.
    #[must_use]
    pub fn is_super_user(&self, identity: &EmailAddress) -> bool {
        self.super_users.contains(identity)
    }

    /// Returns the role a new session of `identity` starts in.
    #[must_use]
    pub fn initial_role_for(&self, identity: &EmailAddress) -> Role {
        self.identity_policies
            .get(identity)
            .map(|policy| policy.role)
            .unwrap_or(self.default_role)
    }

    fn validate(&self) -> AppResult<()> {
        if self.role_table.contains_super_user_entry() {
            return Err(AppError::Validation(format!(
                "role table must not define the reserved '{}' role",
                Role::Admin
            )));
        }

        if self.default_role.is_super_user() {
            return Err(AppError::Validation(format!(
                "default role must not be the reserved '{}' role",
                Role::Admin
            )));
        }

        for (identity, policy) in self.identity_policies.iter() {
            if policy.role.is_super_user() || policy.allowed_roles.iter().any(Role::is_super_user)
            {
                return Err(AppError::Validation(format!(
                    "role policy for '{identity}' must not reference the reserved '{}' role; \
                     use the super-user allowlist instead",
                    Role::Admin
                )));
            }

            if self.role_table.get(policy.role).is_none() {
                warn!(
                    identity = %identity,
                    role = %policy.role,
                    "role policy starts in a role without a role table entry"
                );
            }
        }

        Ok(())
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use portalguard_domain::{
        EmailAddress, IdentityRolePolicy, IdentityRolePolicyTable, Role, RoleCapabilities,
        RoleCapability, RoleDefinition, RoleDisplay, RoleTable, SuperUserAllowlist,
    };

    use super::{AuthorizationConfig, DEFAULT_ROLE};

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value).unwrap_or_else(|_| unreachable!("test email is valid"))
    }

    #[test]
    fn builtin_configuration_is_valid() {
        let builtin = AuthorizationConfig::builtin();
        let validated = AuthorizationConfig::new(
            builtin.super_users().clone(),
            builtin.role_table().clone(),
            builtin.identity_policies().clone(),
            builtin.default_role(),
        );
        assert!(validated.is_ok());
        assert_eq!(builtin.default_role(), DEFAULT_ROLE);
    }

    #[test]
    fn initial_role_uses_policy_then_fallback() {
        let config = AuthorizationConfig::builtin();
        assert_eq!(
            config.initial_role_for(&email("people@teamportal.example")),
            Role::HrManager
        );
        assert_eq!(
            config.initial_role_for(&email("stranger@teamportal.example")),
            DEFAULT_ROLE
        );
    }

    #[test]
    fn admin_role_table_entry_is_rejected() {
        let role_table = RoleTable::new(BTreeMap::from([(
            Role::Admin,
            RoleDefinition {
                display: RoleDisplay {
                    name: "Admin".to_owned(),
                    color: "#000".to_owned(),
                    icon: "shield".to_owned(),
                    features: Vec::new(),
                },
                capabilities: RoleCapabilities::granting(RoleCapability::all()),
            },
        )]));

        let result = AuthorizationConfig::new(
            SuperUserAllowlist::default(),
            role_table,
            IdentityRolePolicyTable::default(),
            DEFAULT_ROLE,
        );
        assert!(result.is_err());
    }

    #[test]
    fn admin_default_role_is_rejected() {
        let result = AuthorizationConfig::new(
            SuperUserAllowlist::default(),
            RoleTable::builtin(),
            IdentityRolePolicyTable::default(),
            Role::Admin,
        );
        assert!(result.is_err());
    }

    #[test]
    fn policy_granting_admin_is_rejected() {
        let policies = IdentityRolePolicyTable::new(BTreeMap::from([(
            email("jane@portal.example"),
            IdentityRolePolicy::switchable(Role::HrManager, vec![Role::HrManager, Role::Admin]),
        )]));

        let result = AuthorizationConfig::new(
            SuperUserAllowlist::default(),
            RoleTable::builtin(),
            policies,
            DEFAULT_ROLE,
        );
        assert!(result.is_err());
    }

    #[test]
    fn json_document_is_parsed() {
        let document = r##"{
            "superUsers": ["Root@Portal.Example"],
            "roleTable": {
                "hr_manager": {
                    "display": { "name": "HR", "color": "#059669", "icon": "users" },
                    "capabilities": { "canViewHRData": true }
                }
            },
            "identityPolicies": {
                "jane@portal.example": {
                    "role": "hr_manager",
                    "canSwitchProfiles": false,
                    "allowedRoles": ["hr_manager"]
                }
            },
            "defaultRole": "hr_manager"
        }"##;

        let config = AuthorizationConfig::from_json_str(document);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert!(config.is_super_user(&email("root@portal.example")));
        assert_eq!(config.default_role(), Role::HrManager);
        assert_eq!(config.role_table().iter().count(), 1);
    }

    #[test]
    fn json_document_with_unknown_identifiers_is_rejected() {
        let unknown_role = r##"{ "roleTable": { "intern": { "display": {
            "name": "Intern", "color": "#fff", "icon": "user" } } } }"##;
        assert!(AuthorizationConfig::from_json_str(unknown_role).is_err());

        let unknown_field = r#"{ "roleTable": {}, "superAdmins": [] }"#;
        assert!(AuthorizationConfig::from_json_str(unknown_field).is_err());

        let missing_table = r#"{ "superUsers": [] }"#;
        assert!(AuthorizationConfig::from_json_str(missing_table).is_err());
    }
}
