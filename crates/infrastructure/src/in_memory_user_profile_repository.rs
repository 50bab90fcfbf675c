use std::collections::HashMap;

use async_trait::async_trait;
use portalguard_application::UserProfileRepository;
use portalguard_core::AppResult;
use portalguard_domain::{EmailAddress, UserProfile};
use tokio::sync::RwLock;

/// In-memory profile store keyed by normalized identity email.
#[derive(Default)]
pub struct InMemoryUserProfileRepository {
    profiles: RwLock<HashMap<EmailAddress, UserProfile>>,
}

impl InMemoryUserProfileRepository {
    /// Creates an empty profile store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a profile under its own email.
    pub async fn save_profile(&self, profile: UserProfile) -> AppResult<()> {
        let identity = EmailAddress::new(profile.email.as_str())?;

        self.profiles.write().await.insert(identity, profile);
        Ok(())
    }

    /// Removes the profile of an identity, returning it if present.
    pub async fn remove_profile(&self, identity: &EmailAddress) -> Option<UserProfile> {
        self.profiles.write().await.remove(identity)
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn find_profile(&self, identity: &EmailAddress) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(identity).cloned())
    }
}

#[cfg(test)]
mod tests {
    use portalguard_application::UserProfileRepository;
    use portalguard_domain::{EmailAddress, UserProfile};

    use super::InMemoryUserProfileRepository;

    #[tokio::test]
    async fn profiles_are_found_by_normalized_email() {
        let repository = InMemoryUserProfileRepository::new();
        let saved = repository
            .save_profile(UserProfile {
                email: "Jane@Portal.Example".to_owned(),
                role: "hr_manager".to_owned(),
                ..UserProfile::default()
            })
            .await;
        assert!(saved.is_ok());

        let identity = EmailAddress::new("jane@portal.example");
        assert!(identity.is_ok());
        let Ok(identity) = identity else {
            return;
        };

        let found = repository.find_profile(&identity).await;
        assert!(matches!(found, Ok(Some(ref profile)) if profile.role == "hr_manager"));

        assert!(repository.remove_profile(&identity).await.is_some());
        assert!(matches!(repository.find_profile(&identity).await, Ok(None)));
    }

    #[tokio::test]
    async fn profile_with_invalid_email_is_rejected() {
        let repository = InMemoryUserProfileRepository::new();
        let saved = repository.save_profile(UserProfile::default()).await;
        assert!(saved.is_err());
    }
}
