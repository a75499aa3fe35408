//! Generation parameters, generated batches and the price calculator.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::providers::{ContentKind, LoraRef, estimate_cost};

pub const MODELS: [&str; 3] = ["Base_SDXL", "Sexy_v3", "AnimePink"];
pub const SUBCATEGORIES: [&str; 3] = ["NSFW", "Bikini", "Soft"];
pub const MIN_VARIANTS: u8 = 1;
pub const MAX_VARIANTS: u8 = 8;
pub const DEFAULT_VARIANTS: u8 = 4;

fn default_model() -> String {
    MODELS[0].to_string()
}

fn default_subcategory() -> String {
    SUBCATEGORIES[0].to_string()
}

fn default_variants() -> u32 {
    u32::from(DEFAULT_VARIANTS)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub prompt: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub lora: LoraRef,
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default = "default_subcategory")]
    pub subcategory: String,
    #[serde(default = "default_variants")]
    pub variants: u32,
}

impl GenerationParams {
    pub fn new(prompt: &str, kind: ContentKind, variants: u32) -> Self {
        Self {
            prompt: prompt.to_string(),
            model: default_model(),
            lora: LoraRef::None,
            kind,
            subcategory: default_subcategory(),
            variants,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.prompt.trim().is_empty() {
            return Err(AppError::Validation(
                "Enter a prompt to generate content".into(),
            ));
        }
        if !MODELS.contains(&self.model.as_str()) {
            return Err(AppError::Validation(format!("Unknown model {}", self.model)));
        }
        if !SUBCATEGORIES.contains(&self.subcategory.as_str()) {
            return Err(AppError::Validation(format!(
                "Unknown category {}",
                self.subcategory
            )));
        }
        if !(u32::from(MIN_VARIANTS)..=u32::from(MAX_VARIANTS)).contains(&self.variants) {
            return Err(AppError::Validation(format!(
                "Variant count must be between {MIN_VARIANTS} and {MAX_VARIANTS}"
            )));
        }
        if matches!(&self.lora, LoraRef::Id(v) | LoraRef::File(v) if v.trim().is_empty()) {
            return Err(AppError::Validation("LoRA reference is empty".into()));
        }
        Ok(())
    }
}

/// One batch of generated media together with the params that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedContent {
    pub kind: ContentKind,
    pub urls: Vec<String>,
    pub params: GenerationParams,
}

pub const MIN_TOKENS: u32 = 500;
pub const MAX_TOKENS: u32 = 8000;
pub const MAX_PRICE_PER_1K: f64 = 1.0;
pub const MIN_MARKUP: f64 = 1.0;
pub const MAX_MARKUP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub tokens: u32,
    pub price_per_1k: f64,
    pub markup: f64,
}

impl Default for QuoteRequest {
    fn default() -> Self {
        Self {
            tokens: 2000,
            price_per_1k: 0.002,
            markup: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub tokens: u32,
    pub price_per_1k: f64,
    pub markup: f64,
    pub cost: f64,
    pub sell_price: f64,
    pub profit: f64,
    pub margin_percent: f64,
}

impl QuoteRequest {
    pub fn quote(&self) -> Result<Quote, AppError> {
        if !(MIN_TOKENS..=MAX_TOKENS).contains(&self.tokens) {
            return Err(AppError::Validation(format!(
                "Token estimate must be between {MIN_TOKENS} and {MAX_TOKENS}"
            )));
        }
        if !(0.0..=MAX_PRICE_PER_1K).contains(&self.price_per_1k) {
            return Err(AppError::Validation(format!(
                "Price per 1k tokens must be between 0 and {MAX_PRICE_PER_1K}"
            )));
        }
        if !(MIN_MARKUP..=MAX_MARKUP).contains(&self.markup) {
            return Err(AppError::Validation(format!(
                "Markup must be between {MIN_MARKUP} and {MAX_MARKUP}"
            )));
        }

        let cost = estimate_cost(self.tokens, self.price_per_1k);
        let sell_price = cost * self.markup;
        Ok(Quote {
            tokens: self.tokens,
            price_per_1k: self.price_per_1k,
            markup: self.markup,
            cost,
            sell_price,
            profit: sell_price - cost,
            margin_percent: (self.markup - 1.0) * 100.0,
        })
    }
}
