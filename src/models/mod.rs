//! Data model shared by the stream reducer and the host.

mod message;
mod playlist;
mod request;
mod tools;
mod user;

pub use message::{ChatMessage, MessageId, MessageKind};
pub use playlist::{format_duration, PlaylistData, PlaylistImage, PlaylistTrack};
pub use request::ChatRequest;
pub use tools::{ActivityStatus, ToolActivity, ToolPanel};
pub use user::UserProfile;
