use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    access::{Feature, check_feature_access},
    error::AppError,
    providers::{ChatMessage, Fan, FanId, Segment, or_empty},
    routes::account_fans,
    session::Session,
};

#[derive(Debug, Serialize)]
pub struct FanRow {
    pub id: FanId,
    pub label: String,
    pub name: String,
    pub segment: Segment,
    pub revenue: u64,
    pub has_new: bool,
    pub selected: bool,
}

impl FanRow {
    fn new(fan: &Fan, selected: Option<FanId>) -> Self {
        let new_marker = if fan.has_new { "🔴 " } else { "" };
        Self {
            id: fan.id,
            label: format!(
                "{} {}{} · ${}",
                fan.segment.icon(),
                new_marker,
                fan.name,
                fan.revenue
            ),
            name: fan.name.clone(),
            segment: fan.segment,
            revenue: fan.revenue,
            has_new: fan.has_new,
            selected: selected == Some(fan.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FanCard {
    pub id: FanId,
    pub name: String,
    pub segment: Segment,
    pub segment_color: &'static str,
    pub revenue: u64,
    pub has_new: bool,
}

impl From<&Fan> for FanCard {
    fn from(fan: &Fan) -> Self {
        Self {
            id: fan.id,
            name: fan.name.clone(),
            segment: fan.segment,
            segment_color: fan.segment.color(),
            revenue: fan.revenue,
            has_new: fan.has_new,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatsView {
    pub account: Option<String>,
    pub segments: Vec<Segment>,
    pub segment_filter: Vec<Segment>,
    pub fans: Vec<FanRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub selected_fan: Option<FanCard>,
    pub history: Vec<ChatMessage>,
    pub draft: String,
    pub suggestions_enabled: bool,
}

impl ChatsView {
    /// Renders the inbox, settling the fan selection against the current filter.
    pub async fn build(state: &AppState, session: &mut Session) -> Result<Self, AppError> {
        let mut view = ChatsView {
            account: session.current_account().map(str::to_string),
            segments: Segment::ALL.to_vec(),
            segment_filter: session.segment_filter().iter().copied().collect(),
            fans: Vec::new(),
            notice: None,
            selected_fan: None,
            history: Vec::new(),
            draft: session.ai_suggestion().unwrap_or_default().to_string(),
            suggestions_enabled: check_feature_access(session, Feature::AiSuggestions),
        };

        if view.account.is_none() {
            view.notice = Some("You have no accounts available".into());
            return Ok(view);
        }

        let fans = account_fans(state, session).await?;
        let visible = session.reconcile_fan_selection(&fans);
        if fans.is_empty() {
            view.notice = Some("No fans available".into());
            return Ok(view);
        }

        let selected = session.selected_fan_id();
        if visible.is_empty() {
            view.notice = Some("No fans match the selected segments".into());
        }
        view.fans = visible.iter().map(|fan| FanRow::new(fan, selected)).collect();

        if let Some(fan) = selected_fan(session, &fans) {
            view.history = or_empty(state.providers.messaging.get_history(fan.id).await)?;
            view.selected_fan = Some(FanCard::from(fan));
        }

        Ok(view)
    }
}

pub(crate) fn selected_fan<'a>(session: &Session, fans: &'a [Fan]) -> Option<&'a Fan> {
    let id = session.selected_fan_id()?;
    fans.iter().find(|fan| fan.id == id)
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
pub struct SelectFanRequest {
    pub fan_id: FanId,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendReceipt {
    pub fan_id: FanId,
    pub text: String,
    pub view: ChatsView,
}
