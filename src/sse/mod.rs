//! Server-sent event stream handling
//!
//! The chat endpoint answers with frames separated by a blank line, each
//! carrying one `data: <json>` payload:
//!
//! ```text
//! data: {"type":"status","message":"Looking for tracks"}
//!
//! data: {"type":"complete","message":"Done","thread_id":"t1"}
//! ```
//!
//! # Module structure
//! - `events` - Event type definitions (ChatEvent, SseParseError)
//! - `payloads` - Internal payload deserialization struct
//! - `parser` - Frame assembly and payload parsing

mod events;
mod parser;
mod payloads;

pub use events::{ChatEvent, SseParseError};
pub use parser::{parse_chat_event, parse_frame, FrameAssembler};
