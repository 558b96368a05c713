use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::dispatch::message::ChatId;

/// Per-chat conversation state.
#[derive(Debug, Default, Clone)]
pub struct Session {
    /// Stored photo waiting for a partner to be concatenated with. Set by a
    /// `concat` caption, cleared only after a successful concatenation. It
    /// never expires.
    pub pending_first: Option<PathBuf>,
}

/// Chat id → session map.
///
/// Each chat has its own lock. A handler holds it for the whole message, so
/// two messages from the same chat never interleave while different chats
/// proceed in parallel. Entries exist only while a chat has a pending image
/// or a message in flight; idle chats are dropped by `release`.
#[derive(Debug, Default)]
pub struct SessionStore {
    chats: Mutex<HashMap<ChatId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// Returns the chat's session cell, creating an empty one on first use.
    pub fn chat(&self, chat_id: ChatId) -> Arc<Mutex<Session>> {
        let mut chats = lock(&self.chats);
        chats.entry(chat_id).or_default().clone()
    }

    /// Hands back a cell obtained from `chat` once its message is done. The
    /// entry is removed when the chat has nothing pending and no other
    /// handler holds or awaits the cell.
    pub fn release(&self, chat_id: ChatId, cell: Arc<Mutex<Session>>) {
        let mut chats = lock(&self.chats);
        // One reference in the map, one in `cell`. Any other handler got its
        // clone through the map lock we now hold.
        if Arc::strong_count(&cell) != 2 {
            return;
        }
        let idle = match cell.try_lock() {
            Ok(session) => session.pending_first.is_none(),
            Err(_) => false,
        };
        if idle {
            chats.remove(&chat_id);
        }
    }

    pub fn pending_first(&self, chat_id: ChatId) -> Option<PathBuf> {
        let cell = lock(&self.chats).get(&chat_id).cloned()?;
        let session = lock(&cell);
        session.pending_first.clone()
    }

    /// Number of chats currently tracked.
    pub fn len(&self) -> usize {
        lock(&self.chats).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked. Session
/// state is a plain value that is never left half-written.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
