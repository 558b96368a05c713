use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::dispatch::command::{parse_caption, unknown_command_text, Command};
use crate::dispatch::message::{ChatId, Message, PhotoSize};
use crate::dispatch::session::{lock, Session, SessionStore};
use crate::dispatch::store::PhotoStore;
use crate::dispatch::transport::Transport;
use crate::error::DispatchError;
use crate::filters::{Direction, Filter, DEFAULT_BLUR_LEVEL};
use crate::image::codec::{decode_rgb, encode, format_for_path, Quantize};
use crate::image::img::Image;

pub const GREETING_TEXT: &str = "Hello! How can I assist you today?";
pub const MISSING_COMMAND_TEXT: &str = "Please send a photo with a valid command as the caption.";
pub const FAILURE_TEXT: &str = "Something went wrong... please try again.";
pub const CONCAT_PENDING_TEXT: &str =
    "First image received. Send the second image without a caption to concatenate them.";
/// Text the quote mode leaves unanswered.
pub const NO_QUOTE_TEXT: &str = "Please don't quote me";

/// Which conversation behavior the bot runs.
///
/// - `Echo`            — repeats text messages back.
/// - `Quote`           — replies to text by quoting it.
/// - `ImageProcessing` — applies caption commands to photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotMode {
    Echo,
    Quote,
    #[default]
    ImageProcessing,
}

impl std::str::FromStr for BotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "echo" => Ok(BotMode::Echo),
            "quote" => Ok(BotMode::Quote),
            "image_processing" | "image" => Ok(BotMode::ImageProcessing),
            other => Err(format!("unknown bot mode '{}'", other)),
        }
    }
}

/// Tunables the dispatcher reads on every message.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings {
    pub mode: BotMode,
    /// Window side used by the `blur` caption.
    pub blur_level: usize,
    pub quantize: Quantize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        DispatchSettings {
            mode: BotMode::ImageProcessing,
            blur_level: DEFAULT_BLUR_LEVEL,
            quantize: Quantize::Stretch,
        }
    }
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Greeted,
    Echoed,
    Quoted,
    /// Quote mode declined to answer.
    Ignored,
    /// A caption command ran; `shape` is the `(height, width)` sent back.
    Processed { caption: String, shape: (usize, usize) },
    /// A `concat` photo was stored as the chat's pending-first image.
    PendingStored { path: PathBuf },
    /// The pending-first image was joined with this photo.
    Concatenated { shape: (usize, usize) },
    UnknownCommand(String),
    MissingCommand,
    /// Processing failed; the user got the generic failure reply.
    Failed(String),
}

/// Routes inbound messages to filters and replies through a `Transport`.
///
/// Every message is handled start to finish under its chat's session lock.
/// Errors never escape `handle_message`: they are logged, answered with a
/// failure text and reported as `Outcome::Failed`.
pub struct Dispatcher<T: Transport> {
    transport: T,
    store: PhotoStore,
    sessions: SessionStore,
    settings: DispatchSettings,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, store: PhotoStore, settings: DispatchSettings) -> Self {
        Dispatcher {
            transport,
            store,
            sessions: SessionStore::new(),
            settings,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn handle_message(&self, msg: &Message) -> Outcome {
        log::info!(
            "Incoming message {} in chat {}: text={:?} caption={:?} photo={}",
            msg.message_id, msg.chat.id, msg.text, msg.caption, msg.is_photo()
        );
        let chat_id = msg.chat.id;
        let cell = self.sessions.chat(chat_id);
        let mut session = lock(&cell);

        let outcome = match self.route(msg, &mut session) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Error processing message {} in chat {}: {}", msg.message_id, chat_id, e);
                self.reply(chat_id, FAILURE_TEXT);
                Outcome::Failed(e.to_string())
            }
        };

        drop(session);
        self.sessions.release(chat_id, cell);
        outcome
    }

    fn route(&self, msg: &Message, session: &mut Session) -> Result<Outcome, DispatchError> {
        let chat_id = msg.chat.id;

        if let Some(text) = msg.text.as_deref() {
            if text.trim().eq_ignore_ascii_case("hi") {
                self.transport.send_text(chat_id, GREETING_TEXT)?;
                return Ok(Outcome::Greeted);
            }
        }

        match self.settings.mode {
            BotMode::Echo => match msg.text.as_deref() {
                Some(text) => {
                    self.transport.send_text(chat_id, &format!("Your original message: {}", text))?;
                    Ok(Outcome::Echoed)
                }
                None => Ok(self.missing_command(chat_id)),
            },
            BotMode::Quote => match msg.text.as_deref() {
                Some(NO_QUOTE_TEXT) => Ok(Outcome::Ignored),
                Some(text) => {
                    self.transport.send_text_with_quote(chat_id, text, msg.message_id)?;
                    Ok(Outcome::Quoted)
                }
                None => Ok(self.missing_command(chat_id)),
            },
            BotMode::ImageProcessing => self.handle_image_message(msg, session),
        }
    }

    fn handle_image_message(&self, msg: &Message, session: &mut Session) -> Result<Outcome, DispatchError> {
        let chat_id = msg.chat.id;
        let photo = match msg.largest_photo() {
            Some(photo) => photo,
            None => return Ok(self.missing_command(chat_id)),
        };

        let caption = match msg.command_caption() {
            Some(caption) => caption,
            None => {
                return match session.pending_first.clone() {
                    Some(first) => self.finish_concat(chat_id, photo, &first, session),
                    None => Ok(self.missing_command(chat_id)),
                };
            }
        };

        match parse_caption(&caption) {
            None => {
                log::warn!("Unknown command '{}' in chat {}", caption, chat_id);
                self.reply(chat_id, &unknown_command_text());
                Ok(Outcome::UnknownCommand(caption))
            }
            Some(Command::ConcatFirst) => {
                let path = self.download(photo)?;
                // An unreadable first half must never occupy the slot.
                self.load(&path)?;
                log::info!("Chat {} pending-first image set to {}", chat_id, path.display());
                session.pending_first = Some(path.clone());
                self.reply(chat_id, CONCAT_PENDING_TEXT);
                Ok(Outcome::PendingStored { path })
            }
            Some(Command::Transform(filters)) => {
                let path = self.download(photo)?;
                let filters: Vec<Filter> = filters.iter().map(|f| self.configure(*f)).collect();
                let img = self.load(&path)?.apply_all(&filters)?;
                self.send_image(chat_id, &img)?;
                Ok(Outcome::Processed { caption, shape: img.matrix().shape() })
            }
        }
    }

    /// Joins the pending-first image (left) with `photo` (right). The slot is
    /// cleared only once the result has been sent.
    fn finish_concat(
        &self,
        chat_id: ChatId,
        photo: &PhotoSize,
        first: &Path,
        session: &mut Session,
    ) -> Result<Outcome, DispatchError> {
        let second_path = self.download(photo)?;
        let first_img = self.load(first)?;
        let second_img = self.load(&second_path)?;
        let joined = first_img.concat(&second_img, Direction::Horizontal)?;
        self.send_image(chat_id, &joined)?;
        session.pending_first = None;
        Ok(Outcome::Concatenated { shape: joined.matrix().shape() })
    }

    fn configure(&self, filter: Filter) -> Filter {
        match filter {
            Filter::Blur { .. } => Filter::Blur { level: self.settings.blur_level },
            other => other,
        }
    }

    fn download(&self, photo: &PhotoSize) -> Result<PathBuf, DispatchError> {
        let attachment = self.transport.fetch_attachment(&photo.file_id)?;
        Ok(self.store.save_attachment(&attachment)?)
    }

    fn load(&self, path: &Path) -> Result<Image, DispatchError> {
        let bytes = self.store.read(path)?;
        Ok(Image::from_rgb(path, &decode_rgb(&bytes)?)?)
    }

    /// Encodes `img`, saves it next to its source and sends it.
    fn send_image(&self, chat_id: ChatId, img: &Image) -> Result<(), DispatchError> {
        let out_path = img.filtered_path();
        let bytes = encode(img.matrix(), self.settings.quantize, format_for_path(&out_path))?;
        self.store.write(&out_path, &bytes)?;
        let file_name = out_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "filtered.png".to_owned());
        self.transport.send_photo(chat_id, &file_name, bytes)
    }

    fn missing_command(&self, chat_id: ChatId) -> Outcome {
        self.reply(chat_id, MISSING_COMMAND_TEXT);
        Outcome::MissingCommand
    }

    /// Best-effort text reply; a failed send is logged, never propagated.
    fn reply(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.transport.send_text(chat_id, text) {
            log::error!("Failed to send reply to chat {}: {}", chat_id, e);
        }
    }
}
