use std::sync::Arc;

use polybot::Dispatcher;

use crate::telegram::TelegramClient;

/// Everything a request handler needs. The dispatcher does its own per-chat
/// locking, so the state itself is shared without a mutex.
pub struct BotState {
    pub dispatcher: Dispatcher<TelegramClient>,
    /// `/{token}/` — the only path updates are accepted on.
    pub webhook_path: String,
}

/// Shared state type — an `Arc<BotState>` passed to every handler.
pub type SharedState = Arc<BotState>;
