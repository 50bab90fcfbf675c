use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{EmailAddress, Role};

/// Role-switching policy for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRolePolicy {
    /// Role a new session starts in.
    pub role: Role,
    /// Whether the identity may change its active role at all.
    #[serde(default)]
    pub can_switch_profiles: bool,
    /// Roles the identity may switch into.
    #[serde(default)]
    pub allowed_roles: Vec<Role>,
}

impl IdentityRolePolicy {
    /// Creates a policy that pins the identity to one role.
    #[must_use]
    pub fn fixed(role: Role) -> Self {
        Self {
            role,
            can_switch_profiles: false,
            allowed_roles: vec![role],
        }
    }

    /// Creates a policy that allows switching between the listed roles.
    #[must_use]
    pub fn switchable(role: Role, allowed_roles: Vec<Role>) -> Self {
        Self {
            role,
            can_switch_profiles: true,
            allowed_roles,
        }
    }

    /// Returns whether this policy admits a switch into `role`.
    #[must_use]
    pub fn permits_switch_to(&self, role: Role) -> bool {
        self.can_switch_profiles && self.allowed_roles.contains(&role)
    }
}

/// Identity-keyed role-switching policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityRolePolicyTable(BTreeMap<EmailAddress, IdentityRolePolicy>);

impl IdentityRolePolicyTable {
    /// Creates a table from explicit entries.
    #[must_use]
    pub fn new(entries: BTreeMap<EmailAddress, IdentityRolePolicy>) -> Self {
        Self(entries)
    }

    /// Returns the policy configured for an identity.
    #[must_use]
    pub fn get(&self, identity: &EmailAddress) -> Option<&IdentityRolePolicy> {
        self.0.get(identity)
    }

    /// Iterates over all configured policies.
    pub fn iter(&self) -> impl Iterator<Item = (&EmailAddress, &IdentityRolePolicy)> {
        self.0.iter()
    }

    /// Returns the policies shipped with the portal.
    #[must_use]
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        let mut insert = |email: &str, policy: IdentityRolePolicy| {
            if let Ok(email) = EmailAddress::new(email) {
                entries.insert(email, policy);
            }
        };

        insert(
            "director@teamportal.example",
            IdentityRolePolicy::switchable(
                Role::ContentDirector,
                vec![Role::ContentDirector, Role::SocialMediaManager],
            ),
        );
        insert(
            "operations@teamportal.example",
            IdentityRolePolicy::switchable(
                Role::SalesManager,
                vec![Role::SalesManager, Role::HrManager, Role::ContentDirector],
            ),
        );
        insert(
            "people@teamportal.example",
            IdentityRolePolicy::fixed(Role::HrManager),
        );
        insert(
            "social@teamportal.example",
            IdentityRolePolicy::fixed(Role::SocialMediaManager),
        );

        Self(entries)
    }
}

/// Identities that bypass every resolution layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuperUserAllowlist(BTreeSet<EmailAddress>);

impl SuperUserAllowlist {
    /// Creates an allowlist from explicit identities.
    #[must_use]
    pub fn new(identities: impl IntoIterator<Item = EmailAddress>) -> Self {
        Self(identities.into_iter().collect())
    }

    /// Returns whether the identity is a super-user.
    #[must_use]
    pub fn contains(&self, identity: &EmailAddress) -> bool {
        self.0.contains(identity)
    }

    /// Returns the number of super-user identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no super-user is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the allowlist shipped with the portal.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(EmailAddress::new("owner@teamportal.example"))
    }
}
