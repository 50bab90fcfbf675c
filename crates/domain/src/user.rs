//! Portal identities and the stored user profile record.

use portalguard_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Validated, lower-cased email address used as the portal identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// User profile document as persisted by the portal's profile store.
///
/// Every field is raw text so that records written by older clients still
/// load. Interpretation happens in [`crate::UserContext::from_profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Identity email of the profile owner.
    pub email: String,
    /// Stored active role.
    pub role: String,
    /// Roles the identity may use; the first one is the primary role.
    pub roles: Vec<String>,
    /// Per-user permission overrides.
    pub custom_permissions: Vec<String>,
    /// Page identifiers from the legacy page access list.
    pub page_permissions: Vec<String>,
    /// Feature identifiers from the legacy feature access list.
    pub feature_permissions: Vec<String>,
    /// Superseded single-flag admin bundle.
    pub admin_permissions: bool,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{EmailAddress, UserProfile};

    #[test]
    fn email_is_normalized() {
        let email = EmailAddress::new("  Jane.Doe@Portal.Example ");
        assert_eq!(
            email.ok().map(String::from),
            Some("jane.doe@portal.example".to_owned())
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        assert!(EmailAddress::new("").is_err());
        assert!(EmailAddress::new("no-at-sign.example").is_err());
        assert!(EmailAddress::new("two@@portal.example").is_err());
        assert!(EmailAddress::new("@portal.example").is_err());
        assert!(EmailAddress::new("jane@localhost").is_err());
    }

    #[test]
    fn email_deserialization_validates() {
        let parsed: Result<EmailAddress, _> = serde_json::from_str("\"not-an-email\"");
        assert!(parsed.is_err());
        let parsed: Result<EmailAddress, _> = serde_json::from_str("\"Ops@Portal.Example\"");
        assert_eq!(
            parsed.ok().map(String::from),
            Some("ops@portal.example".to_owned())
        );
    }

    #[test]
    fn profile_ignores_stored_system_admin_flag() {
        let json = r#"{
            "email": "jane@portal.example",
            "role": "hr_manager",
            "roles": ["hr_manager"],
            "isSystemAdmin": true,
            "adminPermissions": true
        }"#;
        let profile: Result<UserProfile, _> = serde_json::from_str(json);
        assert!(profile.is_ok());
        let profile = profile.unwrap_or_default();
        assert_eq!(profile.role, "hr_manager");
        assert!(profile.admin_permissions);
        assert!(profile.custom_permissions.is_empty());
    }

    proptest! {
        #[test]
        fn valid_emails_normalize_idempotently(
            local in "[A-Za-z0-9._]{1,16}",
            domain in "[A-Za-z0-9]{1,12}\\.[a-z]{2,4}",
        ) {
            let first = EmailAddress::new(format!("{local}@{domain}"));
            prop_assert!(first.is_ok());
            let first = first.map(String::from).unwrap_or_default();
            let second = EmailAddress::new(first.clone()).map(String::from).unwrap_or_default();
            prop_assert_eq!(first, second);
        }
    }
}
