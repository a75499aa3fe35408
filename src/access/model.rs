use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::hash_password;

pub type AccountId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Chats,
    Content,
    Analytics,
    AiSuggestions,
}

impl Feature {
    pub fn label(self) -> &'static str {
        match self {
            Feature::Chats => "Chats",
            Feature::Content => "Content generation",
            Feature::Analytics => "Analytics",
            Feature::AiSuggestions => "AI suggestions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Basic,
    Premium,
}

impl Plan {
    pub fn name(self) -> &'static str {
        match self {
            Plan::Trial => "Trial",
            Plan::Basic => "Basic",
            Plan::Premium => "Premium",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Plan::Trial => "#9E9E9E",
            Plan::Basic => "#4CAF50",
            Plan::Premium => "#FFD700",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Plan::Trial => "🆓",
            Plan::Basic => "💚",
            Plan::Premium => "💎",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    #[default]
    #[serde(rename = "chats_page")]
    Chats,
    #[serde(rename = "content_page")]
    Content,
    #[serde(rename = "analytics_page")]
    Analytics,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Chats, Page::Content, Page::Analytics];

    pub fn required_feature(self) -> Feature {
        match self {
            Page::Chats => Feature::Chats,
            Page::Content => Feature::Content,
            Page::Analytics => Feature::Analytics,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Chats => "💬 Chats",
            Page::Content => "🎥 Content",
            Page::Analytics => "📊 Analytics",
        }
    }
}

/// Reference data for one operator, copied into the session at login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAccount {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub plan: Plan,
    pub expires_at: DateTime<Utc>,
    pub accounts: Vec<AccountId>,
    pub features: BTreeSet<Feature>,
}

impl UserAccount {
    pub fn new(
        username: &str,
        password: &str,
        plan: Plan,
        expires_at: DateTime<Utc>,
        accounts: &[&str],
        features: &[Feature],
    ) -> Self {
        Self {
            username: username.to_string(),
            password_hash: hash_password(password),
            plan,
            expires_at,
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            features: features.iter().copied().collect(),
        }
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn owns_account(&self, account: &str) -> bool {
        self.accounts.iter().any(|a| a == account)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeOption {
    pub plan: Plan,
    pub label: String,
}

/// Shown in place of a page the plan does not cover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeNotice {
    pub feature: Feature,
    pub message: String,
    pub options: Vec<UpgradeOption>,
}

impl UpgradeNotice {
    pub fn for_feature(feature: Feature) -> Self {
        let options = [Plan::Premium, Plan::Basic]
            .into_iter()
            .map(|plan| UpgradeOption {
                plan,
                label: format!("{} Upgrade to {}", plan.icon(), plan.name()),
            })
            .collect();

        Self {
            feature,
            message: format!(
                "\"{}\" is not available on your plan. Upgrade to Basic or Premium to unlock it.",
                feature.label()
            ),
            options,
        }
    }
}
