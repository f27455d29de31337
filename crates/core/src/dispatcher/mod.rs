//! Inbound command handling.
//!
//! Parses chat messages into commands and fans fetch commands out into one
//! detached orchestration task per album id. Search and status commands run
//! a single blocking library call each.

mod command;
mod handler;
mod spawner;

pub use command::{extract_album_ids, parse_command, Command};
pub use handler::{Dispatch, RequestDispatcher};
pub use spawner::{TaskSpawner, TokioSpawner};
