//! OneBot v11 host integration.
//!
//! The bot host posts events to us over HTTP and accepts API calls
//! (messages, file uploads) on its own HTTP endpoint.

mod client;
mod event;

pub use client::OneBotClient;
pub use event::{Event, MessageEvent, MessageType};
