use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::{EmailAddress, Permission, Role, RoleCapability, SuperUserAllowlist, UserProfile};

/// Read-only authorization snapshot of one user for one resolution.
///
/// Built from a stored [`UserProfile`]. Super-user status is derived from the
/// session identity and the allowlist alone; no profile field can set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    identity: EmailAddress,
    is_system_admin: bool,
    current_role: Option<Role>,
    roles: Vec<Role>,
    custom_permissions: BTreeSet<Permission>,
    page_permissions: BTreeSet<String>,
    feature_permissions: BTreeSet<String>,
    admin_permissions: bool,
}

impl UserContext {
    /// Interprets the stored profile of `identity`.
    ///
    /// Super-user status comes from `identity` alone. A profile stored under
    /// another email contributes no grants. `active_role` overrides the
    /// stored role, typically with the role of the current session. Unknown
    /// role and permission values are dropped.
    #[must_use]
    pub fn from_profile(
        identity: &EmailAddress,
        profile: &UserProfile,
        active_role: Option<Role>,
        super_users: &SuperUserAllowlist,
    ) -> Self {
        let owned_by_identity = EmailAddress::new(profile.email.as_str())
            .is_ok_and(|stored| &stored == identity);
        if !owned_by_identity {
            return Self::without_profile(identity.clone(), active_role, super_users);
        }

        Self {
            is_system_admin: super_users.contains(identity),
            identity: identity.clone(),
            current_role: active_role.or_else(|| Role::from_str(profile.role.trim()).ok()),
            roles: profile
                .roles
                .iter()
                .filter_map(|role| Role::from_str(role.trim()).ok())
                .collect(),
            custom_permissions: profile
                .custom_permissions
                .iter()
                .filter_map(|permission| Permission::from_str(permission.trim()).ok())
                .collect(),
            page_permissions: collect_identifiers(&profile.page_permissions),
            feature_permissions: collect_identifiers(&profile.feature_permissions),
            admin_permissions: profile.admin_permissions,
        }
    }

    /// Returns a context for an identity that has no stored profile.
    ///
    /// Only the super-user and role-default layers can grant anything.
    #[must_use]
    pub fn without_profile(
        identity: EmailAddress,
        active_role: Option<Role>,
        super_users: &SuperUserAllowlist,
    ) -> Self {
        Self {
            is_system_admin: super_users.contains(&identity),
            identity,
            current_role: active_role,
            roles: Vec::new(),
            custom_permissions: BTreeSet::new(),
            page_permissions: BTreeSet::new(),
            feature_permissions: BTreeSet::new(),
            admin_permissions: false,
        }
    }

    /// Returns the identity this context was built for.
    #[must_use]
    pub fn identity(&self) -> &EmailAddress {
        &self.identity
    }

    /// Returns whether the identity is on the super-user allowlist.
    #[must_use]
    pub fn is_system_admin(&self) -> bool {
        self.is_system_admin
    }

    /// Returns the active role, if it was recognized.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.current_role
    }

    /// Returns the roles the identity may use.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        self.roles.as_slice()
    }

    /// Returns the first listed role.
    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }

    /// Returns the per-user permission overrides.
    #[must_use]
    pub fn custom_permissions(&self) -> &BTreeSet<Permission> {
        &self.custom_permissions
    }

    /// Returns the page access list.
    #[must_use]
    pub fn page_permissions(&self) -> &BTreeSet<String> {
        &self.page_permissions
    }

    /// Returns the feature access list.
    #[must_use]
    pub fn feature_permissions(&self) -> &BTreeSet<String> {
        &self.feature_permissions
    }

    /// Returns the legacy admin bundle flag.
    #[must_use]
    pub fn admin_permissions(&self) -> bool {
        self.admin_permissions
    }

    /// Returns whether the legacy admin bundle applies to this user.
    ///
    /// Only accounts predating feature access lists qualify.
    #[must_use]
    pub fn legacy_admin_bundle_applies(&self) -> bool {
        self.admin_permissions && self.feature_permissions.is_empty()
    }
}

fn collect_identifiers(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Page scope of an effective permission summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScope {
    /// Every page, reported as the `"*"` marker.
    All,
    /// The listed pages only.
    Listed(Vec<String>),
}

impl PageScope {
    /// Marker reported for unrestricted page access.
    pub const ALL_PAGES_MARKER: &'static str = "*";

    /// Returns whether a page is inside this scope.
    #[must_use]
    pub fn includes(&self, page: &str) -> bool {
        match self {
            Self::All => true,
            Self::Listed(pages) => pages.iter().any(|value| value == page),
        }
    }
}

impl Serialize for PageScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => [Self::ALL_PAGES_MARKER].serialize(serializer),
            Self::Listed(pages) => pages.serialize(serializer),
        }
    }
}

/// Display-only union of everything a user is granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePermissions {
    /// Accessible pages.
    pub pages: PageScope,
    /// Granted feature and permission identifiers, sorted.
    pub features: Vec<String>,
    /// Capability flags of the active role.
    pub role_permissions: BTreeMap<RoleCapability, bool>,
}

#[cfg(test)]
mod tests {
    use super::{EffectivePermissions, PageScope, UserContext};
    use crate::{EmailAddress, Permission, Role, RoleCapability, SuperUserAllowlist, UserProfile};

    fn allowlist() -> SuperUserAllowlist {
        SuperUserAllowlist::new(EmailAddress::new("owner@portal.example"))
    }

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value).unwrap_or_else(|_| unreachable!("test email is valid"))
    }

    #[test]
    fn system_admin_is_derived_from_allowlist_only() {
        let owner = UserProfile {
            email: "OWNER@portal.example".to_owned(),
            ..UserProfile::default()
        };
        let context = UserContext::from_profile(&email("owner@portal.example"), &owner, None, &allowlist());
        assert!(context.is_system_admin());

        let impostor = UserProfile {
            email: "impostor@portal.example".to_owned(),
            role: "admin".to_owned(),
            roles: vec!["admin".to_owned()],
            admin_permissions: true,
            ..UserProfile::default()
        };
        let context = UserContext::from_profile(
            &email("impostor@portal.example"),
            &impostor,
            None,
            &allowlist(),
        );
        assert!(!context.is_system_admin());
        assert_eq!(context.current_role(), Some(Role::Admin));
    }

    #[test]
    fn stored_owner_email_does_not_make_identity_a_super_user() {
        let forged = UserProfile {
            email: "owner@portal.example".to_owned(),
            role: "social_media_manager".to_owned(),
            custom_permissions: vec!["manage_users".to_owned()],
            admin_permissions: true,
            ..UserProfile::default()
        };
        let identity = email("mallory@portal.example");
        let context = UserContext::from_profile(&identity, &forged, None, &allowlist());

        assert!(!context.is_system_admin());
        assert_eq!(context.identity(), &identity);
        assert!(context.custom_permissions().is_empty());
        assert_eq!(context.current_role(), None);
        assert!(!context.legacy_admin_bundle_applies());
    }

    #[test]
    fn profile_with_invalid_email_contributes_no_grants() {
        let profile = UserProfile {
            email: "not-an-email".to_owned(),
            custom_permissions: vec!["view_hr_data".to_owned()],
            ..UserProfile::default()
        };
        let context = UserContext::from_profile(
            &email("jane@portal.example"),
            &profile,
            Some(Role::HrManager),
            &allowlist(),
        );

        assert!(context.custom_permissions().is_empty());
        assert_eq!(context.current_role(), Some(Role::HrManager));
    }

    #[test]
    fn unknown_values_are_dropped() {
        let profile = UserProfile {
            email: "jane@portal.example".to_owned(),
            role: "chief_everything".to_owned(),
            roles: vec!["hr_manager".to_owned(), "intern".to_owned()],
            custom_permissions: vec!["view_hr_data".to_owned(), "do_anything".to_owned()],
            page_permissions: vec!["clients".to_owned(), "  ".to_owned()],
            ..UserProfile::default()
        };
        let context =
            UserContext::from_profile(&email("jane@portal.example"), &profile, None, &allowlist());

        assert_eq!(context.current_role(), None);
        assert_eq!(context.roles(), &[Role::HrManager]);
        assert_eq!(context.primary_role(), Some(Role::HrManager));
        assert_eq!(context.custom_permissions().len(), 1);
        assert!(context.custom_permissions().contains(&Permission::ViewHrData));
        assert_eq!(context.page_permissions().len(), 1);
    }

    #[test]
    fn active_role_overrides_stored_role() {
        let profile = UserProfile {
            email: "jane@portal.example".to_owned(),
            role: "hr_manager".to_owned(),
            ..UserProfile::default()
        };
        let context = UserContext::from_profile(
            &email("jane@portal.example"),
            &profile,
            Some(Role::SalesManager),
            &allowlist(),
        );
        assert_eq!(context.current_role(), Some(Role::SalesManager));
    }

    #[test]
    fn legacy_bundle_requires_empty_feature_list() {
        let jane = email("jane@portal.example");
        let mut profile = UserProfile {
            email: "jane@portal.example".to_owned(),
            admin_permissions: true,
            ..UserProfile::default()
        };
        assert!(
            UserContext::from_profile(&jane, &profile, None, &allowlist())
                .legacy_admin_bundle_applies()
        );

        profile.feature_permissions = vec!["reports".to_owned()];
        assert!(
            !UserContext::from_profile(&jane, &profile, None, &allowlist())
                .legacy_admin_bundle_applies()
        );
    }

    #[test]
    fn context_without_profile_keeps_only_identity_and_role() {
        let owner = EmailAddress::new("owner@portal.example");
        assert!(owner.is_ok_and(|owner| {
            UserContext::without_profile(owner, None, &allowlist()).is_system_admin()
        }));

        let jane = EmailAddress::new("jane@portal.example");
        assert!(jane.is_ok_and(|jane| {
            let context = UserContext::without_profile(jane, Some(Role::HrManager), &allowlist());
            !context.is_system_admin()
                && context.current_role() == Some(Role::HrManager)
                && context.roles().is_empty()
                && !context.legacy_admin_bundle_applies()
        }));
    }

    #[test]
    fn all_pages_scope_serializes_as_marker() {
        let summary = EffectivePermissions {
            pages: PageScope::All,
            features: vec!["manage_users".to_owned()],
            role_permissions: [(RoleCapability::CanManageTeam, true)].into_iter().collect(),
        };
        let encoded = serde_json::to_value(&summary).unwrap_or_default();
        assert_eq!(encoded["pages"], serde_json::json!(["*"]));
        assert_eq!(encoded["rolePermissions"]["canManageTeam"], serde_json::json!(true));
        assert!(PageScope::All.includes("anything"));
        assert!(!PageScope::Listed(vec!["clients".to_owned()]).includes("hr"));
    }
}
