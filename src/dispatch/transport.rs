use crate::dispatch::message::ChatId;
use crate::error::DispatchError;

/// A downloaded attachment.
///
/// `file_path` is the platform's relative path for the file (for example
/// `photos/file_12.jpg`); it names the local copy.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_path: String,
    pub bytes: Vec<u8>,
}

/// Messaging platform operations the dispatcher relies on.
pub trait Transport: Send + Sync {
    fn fetch_attachment(&self, file_id: &str) -> Result<Attachment, DispatchError>;

    fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DispatchError>;

    /// Sends `text` as a reply to message `quoted_msg_id`.
    fn send_text_with_quote(
        &self,
        chat_id: ChatId,
        text: &str,
        quoted_msg_id: i64,
    ) -> Result<(), DispatchError>;

    fn send_photo(&self, chat_id: ChatId, file_name: &str, bytes: Vec<u8>) -> Result<(), DispatchError>;
}
