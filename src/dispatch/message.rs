use serde::{Serialize, Deserialize};

pub type ChatId = i64;

/// Webhook payload. Only the `message` field is consumed; other update kinds
/// (edits, callbacks) deserialize with `message: None` and are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

/// One size variant of an uploaded photo. The platform lists them smallest
/// first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Inbound chat message: either text, or a photo with an optional caption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
}

impl Message {
    pub fn is_photo(&self) -> bool {
        self.photo.as_ref().map_or(false, |sizes| !sizes.is_empty())
    }

    /// Highest resolution variant of the attached photo.
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo.as_ref().and_then(|sizes| sizes.last())
    }

    /// Caption normalized for command lookup; blank captions count as none.
    pub fn command_caption(&self) -> Option<String> {
        self.caption
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
    }
}
