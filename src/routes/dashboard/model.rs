use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    access::{Page, Plan, UpgradeNotice, check_feature_access},
    error::SessionError,
    routes::{analytics::AnalyticsView, chats::ChatsView, content::ContentView},
    session::Session,
};

pub const VERSION_CAPTION: &str = "v0.2 · Subscription MVP";

#[derive(Debug, Serialize)]
pub struct PlanBadge {
    pub plan: Plan,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl From<Plan> for PlanBadge {
    fn from(plan: Plan) -> Self {
        Self {
            plan,
            name: plan.name(),
            icon: plan.icon(),
            color: plan.color(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavEntry {
    pub page: Page,
    pub title: &'static str,
    pub locked: bool,
    pub active: bool,
}

/// Sidebar state: who is signed in, on which account, and where they can go.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub username: String,
    pub plan: PlanBadge,
    pub days_left: i64,
    pub accounts: Vec<String>,
    pub current_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub current_page: Page,
    pub navigation: Vec<NavEntry>,
    pub caption: &'static str,
}

impl DashboardView {
    pub fn build(session: &Session, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let user = session.user()?;
        let current_page = session.current_page();

        let navigation = Page::ALL
            .into_iter()
            .map(|page| NavEntry {
                page,
                title: page.title(),
                locked: !check_feature_access(session, page.required_feature()),
                active: page == current_page,
            })
            .collect();

        Ok(Self {
            username: user.username.clone(),
            plan: user.plan.into(),
            days_left: user.days_left(now),
            accounts: user.accounts.clone(),
            current_account: session.current_account().map(str::to_string),
            notice: user
                .accounts
                .is_empty()
                .then(|| "You have no accounts available".to_string()),
            current_page,
            navigation,
            caption: VERSION_CAPTION,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectAccountRequest {
    pub account: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub page: Page,
}

/// Whatever the current page renders to, or the upgrade prompt in its place.
#[derive(Debug, Serialize)]
#[serde(tag = "page", content = "view", rename_all = "snake_case")]
pub enum PageView {
    Chats(ChatsView),
    Content(ContentView),
    Analytics(AnalyticsView),
    UpgradeRequired(UpgradeNotice),
}
