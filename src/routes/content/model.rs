use serde::Serialize;

use crate::{
    content::{
        DEFAULT_VARIANTS, GeneratedContent, MAX_VARIANTS, MIN_VARIANTS, MODELS, Quote,
        QuoteRequest, SUBCATEGORIES,
    },
    error::AppError,
    providers::ContentKind,
    session::Session,
};

#[derive(Debug, Serialize)]
pub struct ContentOptions {
    pub models: &'static [&'static str],
    pub lora_modes: &'static [&'static str],
    pub kinds: [ContentKind; 2],
    pub subcategories: &'static [&'static str],
    pub min_variants: u8,
    pub max_variants: u8,
    pub default_variants: u8,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            models: &MODELS,
            lora_modes: &["none", "id", "file"],
            kinds: [ContentKind::Image, ContentKind::Video],
            subcategories: &SUBCATEGORIES,
            min_variants: MIN_VARIANTS,
            max_variants: MAX_VARIANTS,
            default_variants: DEFAULT_VARIANTS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VariantView {
    pub index: usize,
    pub url: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct GeneratedView {
    pub kind: ContentKind,
    pub title: &'static str,
    pub model: String,
    pub subcategory: String,
    pub variant_count: usize,
    pub variants: Vec<VariantView>,
}

impl GeneratedView {
    fn new(content: &GeneratedContent, session: &Session) -> Self {
        let selected = session.selected_variant_indices();
        Self {
            kind: content.kind,
            title: match content.kind {
                ContentKind::Image => "📸 Photos",
                ContentKind::Video => "🎬 Videos",
            },
            model: content.params.model.clone(),
            subcategory: content.params.subcategory.clone(),
            variant_count: content.urls.len(),
            variants: content
                .urls
                .iter()
                .enumerate()
                .map(|(index, url)| VariantView {
                    index,
                    url: url.clone(),
                    selected: selected.contains(&index),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentView {
    pub account: Option<String>,
    pub options: ContentOptions,
    pub generated: Option<GeneratedView>,
    pub selected_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub quote: Quote,
}

impl ContentView {
    pub fn build(session: &Session) -> Result<Self, AppError> {
        let generated = session
            .generated_content()
            .map(|content| GeneratedView::new(content, session));

        Ok(Self {
            account: session.current_account().map(str::to_string),
            options: ContentOptions::default(),
            notice: generated.is_none().then(|| {
                "Nothing generated yet. Set the options and press Generate.".to_string()
            }),
            generated,
            selected_count: session.selected_variant_indices().len(),
            quote: QuoteRequest::default().quote()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionAction {
    Saved,
    Sent,
}

#[derive(Debug, Serialize)]
pub struct SelectionReceipt {
    pub action: SelectionAction,
    pub count: usize,
    pub urls: Vec<String>,
    pub message: String,
}

impl SelectionReceipt {
    pub fn new(action: SelectionAction, urls: Vec<&str>) -> Self {
        let count = urls.len();
        let noun = if count == 1 { "variant" } else { "variants" };
        let verb = match action {
            SelectionAction::Saved => "Saved",
            SelectionAction::Sent => "Sent",
        };
        Self {
            action,
            count,
            urls: urls.into_iter().map(str::to_string).collect(),
            message: format!("{verb} {count} {noun}"),
        }
    }
}
