mod handler;
mod model;

pub use handler::{
    clear, generate, get_content, quote, regenerate, save_selection, send_selection,
    toggle_variant,
};
pub use model::{
    ContentOptions, ContentView, GeneratedView, SelectionAction, SelectionReceipt, VariantView,
};
