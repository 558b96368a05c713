use std::collections::HashMap;
use std::sync::Mutex;

use polybot::dispatch::{Attachment, ChatId, Transport};
use polybot::DispatchError;

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat_id: ChatId, text: String },
    Quote { chat_id: ChatId, text: String, quoted: i64 },
    Photo { chat_id: ChatId, file_name: String, bytes: Vec<u8> },
}

/// In-memory transport: serves registered files and records every send.
#[derive(Default)]
pub struct MockTransport {
    files: Mutex<HashMap<String, Attachment>>,
    sent: Mutex<Vec<Sent>>,
    fail_photos: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Registers `bytes` under `file_id`, stored as `photos/<file_id>.png`.
    pub fn add_file(&self, file_id: &str, bytes: Vec<u8>) {
        self.files.lock().unwrap().insert(
            file_id.to_owned(),
            Attachment { file_path: format!("photos/{}.png", file_id), bytes },
        );
    }

    pub fn fail_photo_sends(&self, fail: bool) {
        *self.fail_photos.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|s| match s {
            Sent::Text { text, .. } => Some(text),
            _ => None,
        })
    }

    pub fn photos(&self) -> Vec<Vec<u8>> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Photo { bytes, .. } => Some(bytes),
                _ => None,
            })
            .collect()
    }
}

impl Transport for MockTransport {
    fn fetch_attachment(&self, file_id: &str) -> Result<Attachment, DispatchError> {
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| DispatchError::Transport(format!("no such file: {}", file_id)))
    }

    fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(Sent::Text { chat_id, text: text.to_owned() });
        Ok(())
    }

    fn send_text_with_quote(&self, chat_id: ChatId, text: &str, quoted_msg_id: i64) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(Sent::Quote {
            chat_id,
            text: text.to_owned(),
            quoted: quoted_msg_id,
        });
        Ok(())
    }

    fn send_photo(&self, chat_id: ChatId, file_name: &str, bytes: Vec<u8>) -> Result<(), DispatchError> {
        if *self.fail_photos.lock().unwrap() {
            return Err(DispatchError::Transport("upload rejected".into()));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            file_name: file_name.to_owned(),
            bytes,
        });
        Ok(())
    }
}
