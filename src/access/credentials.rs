use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::model::{Feature, Plan, UserAccount};
use crate::utils::hash_password;

/// Looks up an operator by credentials. Expiry is left to the caller.
pub trait AuthBackend: Send + Sync {
    fn verify_credentials(&self, username: &str, password: &str) -> Option<UserAccount>;
}

/// Read-only operator table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, UserAccount>,
}

impl CredentialStore {
    pub fn new(users: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// The three demo operators, one per plan, with expiry counted from `now`.
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self::new([
            UserAccount::new(
                "admin",
                "admin123",
                Plan::Premium,
                now + Duration::days(365),
                &["AI_Girl_1", "AI_Girl_2", "AI_Girl_3"],
                &[
                    Feature::Chats,
                    Feature::Content,
                    Feature::Analytics,
                    Feature::AiSuggestions,
                ],
            ),
            UserAccount::new(
                "operator1",
                "password123",
                Plan::Basic,
                now + Duration::days(30),
                &["AI_Girl_1"],
                &[Feature::Chats, Feature::Content],
            ),
            UserAccount::new(
                "demo",
                "demo",
                Plan::Trial,
                now + Duration::days(7),
                &["AI_Girl_1"],
                &[Feature::Chats],
            ),
        ])
    }

    pub fn find(&self, username: &str) -> Option<&UserAccount> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl AuthBackend for CredentialStore {
    fn verify_credentials(&self, username: &str, password: &str) -> Option<UserAccount> {
        let user = self.find(username)?;
        (user.password_hash == hash_password(password)).then(|| user.clone())
    }
}
