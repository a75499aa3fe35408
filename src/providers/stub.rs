//! Fixed sample data standing in for the real fan platform.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use super::{
    AnalyticsStore, ChatMessage, ContentKind, DailyStats, Fan, FanDirectory, FanId,
    GenerationService, LoraRef, MessagingBackend, Role, Segment, SuggestionService,
};
use crate::error::DataError;

#[derive(Debug, Clone)]
pub struct StubFanDirectory {
    fans: Vec<Fan>,
}

impl StubFanDirectory {
    pub fn new(fans: Vec<Fan>) -> Self {
        Self { fans }
    }
}

impl Default for StubFanDirectory {
    fn default() -> Self {
        let fan = |id, name: &str, segment, revenue, has_new| Fan {
            id,
            name: name.to_string(),
            segment,
            revenue,
            has_new,
        };

        Self::new(vec![
            fan(1, "Mike 🔥", Segment::Vip, 250, true),
            fan(2, "Alex 💎", Segment::Buyer, 100, false),
            fan(3, "John", Segment::Free, 0, true),
            fan(4, "Sarah", Segment::Buyer, 75, false),
            fan(5, "Dave", Segment::Vip, 300, false),
        ])
    }
}

#[async_trait]
impl FanDirectory for StubFanDirectory {
    // every account sees the same sample fans
    async fn list_fans(&self, _account: &str) -> Result<Vec<Fan>, DataError> {
        Ok(self.fans.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StubMessaging;

#[async_trait]
impl MessagingBackend for StubMessaging {
    async fn get_history(&self, _fan_id: FanId) -> Result<Vec<ChatMessage>, DataError> {
        let msg = |role, text: &str, time: &str| ChatMessage {
            role,
            text: text.to_string(),
            time: time.to_string(),
        };

        Ok(vec![
            msg(Role::User, "Hi, how are you?", "10:01"),
            msg(
                Role::Assistant,
                "Hey cutie 😘 Just woke up, thinking about you.",
                "10:02",
            ),
            msg(Role::User, "I want a custom video 😈", "10:05"),
        ])
    }

    async fn send_message(&self, fan_id: FanId, text: &str) -> Result<(), DataError> {
        tracing::debug!(fan_id, chars = text.chars().count(), "Stub message accepted");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StubSuggestions;

#[async_trait]
impl SuggestionService for StubSuggestions {
    async fn suggest_warmup(
        &self,
        history: &[ChatMessage],
        fan_name: &str,
    ) -> Result<String, DataError> {
        let last = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.text.as_str())
            .unwrap_or("");

        Ok(format!(
            "Pick up the thread: \"{last}\" and gently steer toward paid content \
             (custom video, photo set). Address them by name: {fan_name}."
        ))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StubGenerator;

#[async_trait]
impl GenerationService for StubGenerator {
    async fn generate(
        &self,
        kind: ContentKind,
        _prompt: &str,
        _model: &str,
        _lora: &LoraRef,
        count: u32,
    ) -> Result<Vec<String>, DataError> {
        let urls = (1..=count)
            .map(|n| match kind {
                ContentKind::Image => {
                    format!("https://via.placeholder.com/400x600/FF69B4/FFFFFF?text={n}")
                }
                ContentKind::Video => format!("https://example.com/fake_video_{n}.mp4"),
            })
            .collect();
        Ok(urls)
    }
}

#[derive(Debug, Clone)]
pub struct StubAnalytics {
    series: Vec<DailyStats>,
}

impl StubAnalytics {
    pub fn new(series: Vec<DailyStats>) -> Self {
        Self { series }
    }
}

impl Default for StubAnalytics {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap_or_default();
        let revenue = [1200, 1800, 950, 2200, 1500, 1900, 2300];
        let subs = [45, 52, 48, 60, 55, 62, 70];
        let avg_watch = [18.0, 21.0, 16.0, 24.0, 20.0, 23.0, 25.0];

        let series = (0..7)
            .map(|i| DailyStats {
                day: start + Duration::days(i as i64),
                revenue: revenue[i],
                subs: subs[i],
                avg_watch: avg_watch[i],
            })
            .collect();
        Self::new(series)
    }
}

#[async_trait]
impl AnalyticsStore for StubAnalytics {
    async fn get_series(&self, _account: &str) -> Result<Vec<DailyStats>, DataError> {
        if self.series.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        Ok(self.series.clone())
    }
}
