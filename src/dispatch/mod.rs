pub mod command;
pub mod dispatcher;
pub mod message;
pub mod session;
pub mod store;
pub mod transport;

pub use command::{parse_caption, Command, COMMANDS};
pub use dispatcher::{BotMode, DispatchSettings, Dispatcher, Outcome};
pub use message::{ChatId, Message, Update};
pub use session::{Session, SessionStore};
pub use store::PhotoStore;
pub use transport::{Attachment, Transport};
