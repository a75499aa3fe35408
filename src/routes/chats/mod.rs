mod handler;
mod model;

pub use handler::{apply_filter, clear_draft, get_chats, select_fan, send_message, suggest};
pub use model::{
    ChatsView, FanCard, FanRow, FilterRequest, SelectFanRequest, SendMessageRequest, SendReceipt,
};
