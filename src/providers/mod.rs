//! Narrow interfaces to the services the console reads from and writes to.
//!
//! Only stub implementations ship with the crate, see [`stub`].

pub mod stub;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

pub type FanId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "VIP")]
    Vip,
    Buyer,
    Free,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Vip, Segment::Buyer, Segment::Free];

    pub fn icon(self) -> &'static str {
        match self {
            Segment::Vip => "💎",
            Segment::Buyer => "💰",
            Segment::Free => "👤",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Segment::Vip => "#FFD700",
            Segment::Buyer => "#4CAF50",
            Segment::Free => "#9E9E9E",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fan {
    pub id: FanId,
    pub name: String,
    pub segment: Segment,
    pub revenue: u64,
    pub has_new: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Image,
    Video,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum LoraRef {
    #[default]
    None,
    Id(String),
    File(String),
}

impl LoraRef {
    pub fn as_str(&self) -> &str {
        match self {
            LoraRef::None => "",
            LoraRef::Id(id) => id,
            LoraRef::File(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub day: NaiveDate,
    pub revenue: u64,
    pub subs: u64,
    pub avg_watch: f64,
}

#[async_trait]
pub trait FanDirectory: Send + Sync {
    async fn list_fans(&self, account: &str) -> Result<Vec<Fan>, DataError>;
}

#[async_trait]
pub trait MessagingBackend: Send + Sync {
    async fn get_history(&self, fan_id: FanId) -> Result<Vec<ChatMessage>, DataError>;

    async fn send_message(&self, fan_id: FanId, text: &str) -> Result<(), DataError>;
}

#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggest_warmup(
        &self,
        history: &[ChatMessage],
        fan_name: &str,
    ) -> Result<String, DataError>;
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        kind: ContentKind,
        prompt: &str,
        model: &str,
        lora: &LoraRef,
        count: u32,
    ) -> Result<Vec<String>, DataError>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn get_series(&self, account: &str) -> Result<Vec<DailyStats>, DataError>;
}

/// Generation cost in dollars for an estimated token count.
pub fn estimate_cost(tokens: u32, price_per_1k: f64) -> f64 {
    tokens as f64 / 1000.0 * price_per_1k
}

#[derive(Clone)]
pub struct Providers {
    pub fans: Arc<dyn FanDirectory>,
    pub messaging: Arc<dyn MessagingBackend>,
    pub suggestions: Arc<dyn SuggestionService>,
    pub generation: Arc<dyn GenerationService>,
    pub analytics: Arc<dyn AnalyticsStore>,
}

impl Providers {
    pub fn stub() -> Self {
        Self {
            fans: Arc::new(stub::StubFanDirectory::default()),
            messaging: Arc::new(stub::StubMessaging),
            suggestions: Arc::new(stub::StubSuggestions),
            generation: Arc::new(stub::StubGenerator),
            analytics: Arc::new(stub::StubAnalytics::default()),
        }
    }

    pub fn with_fans(mut self, fans: Arc<dyn FanDirectory>) -> Self {
        self.fans = fans;
        self
    }

    pub fn with_messaging(mut self, messaging: Arc<dyn MessagingBackend>) -> Self {
        self.messaging = messaging;
        self
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsStore>) -> Self {
        self.analytics = analytics;
        self
    }
}

/// Treats an empty dataset as an empty list so pages can render an empty state.
pub fn or_empty<T>(result: Result<Vec<T>, DataError>) -> Result<Vec<T>, DataError> {
    match result {
        Err(DataError::EmptyDataset) => Ok(Vec::new()),
        other => other,
    }
}
