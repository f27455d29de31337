//! User-facing reply texts.

use crate::context::{ReplyTarget, RequestContext};
use crate::library::{AlbumSummary, LoginStatus};

/// Maximum search results listed in one reply.
pub const MAX_SEARCH_RESULTS: usize = 5;

const RULE: &str = "--------------------------";

/// Mention code for the requester in group chats, empty in direct chats.
pub fn at_user(ctx: &RequestContext) -> String {
    match ctx.target {
        ReplyTarget::Group { .. } => format!("[CQ:at,qq={}]", ctx.user_id),
        ReplyTarget::Direct { .. } => String::new(),
    }
}

/// Prefix `text` with the requester mention (group chats only).
pub fn mentioned(ctx: &RequestContext, text: &str) -> String {
    format!("{} {}", at_user(ctx), text).trim().to_string()
}

pub fn no_album_ids() -> &'static str {
    "Please provide at least one valid album ID."
}

pub fn received(count: usize) -> String {
    format!("Got it! Processing {} album ID(s)...", count)
}

pub fn cache_hit(album_id: &str) -> String {
    format!("Found album {} in the local cache, sending...", album_id)
}

pub fn fetch_started(album_id: &str) -> String {
    format!("Downloading album {}, this may take a while...", album_id)
}

/// Reply for a failed fetch: the library's own message, unchanged.
pub fn fetch_failed(album_id: &str, message: &str) -> String {
    if message.trim().is_empty() {
        format!("Download of album {} failed.", album_id)
    } else {
        message.to_string()
    }
}

pub fn packaging_failed(album_id: &str) -> String {
    format!(
        "Album {} downloaded, but packaging failed. Please check the server logs.",
        album_id
    )
}

pub fn processing_error(album_id: &str, error: &dyn std::fmt::Display) -> String {
    format!("A serious error occurred while processing {}: {}", album_id, error)
}

pub fn delivered(album_id: &str, file_name: &str) -> String {
    format!("Album {} ({}) has been sent.", album_id, file_name)
}

pub fn delivery_failed(album_id: &str, error: &dyn std::fmt::Display) -> String {
    format!("Sending file for {} failed: {}", album_id, error)
}

pub fn search_usage() -> &'static str {
    "Please enter a search keyword. Usage: /jm_search [keyword]"
}

pub fn searching(keyword: &str) -> String {
    format!("Searching: '{}'...", keyword)
}

pub fn search_failed(message: &dyn std::fmt::Display) -> String {
    format!("Search failed: {}", message)
}

pub fn search_empty(keyword: &str) -> String {
    format!("No results found for '{}'.", keyword)
}

/// Format up to [`MAX_SEARCH_RESULTS`] albums as ID/title/author blocks.
pub fn search_results(keyword: &str, albums: &[AlbumSummary]) -> String {
    let shown = &albums[..albums.len().min(MAX_SEARCH_RESULTS)];

    let mut reply = format!("Results for '{}' (top {}):\n", keyword, shown.len());
    reply.push_str(RULE);
    reply.push('\n');

    for album in shown {
        let authors = if album.author_list.is_empty() {
            "N/A".to_string()
        } else {
            album.author_list.join(", ")
        };
        reply.push_str(&format!("ID: {}\n", album.id));
        reply.push_str(&format!("Title: {}\n", album.title));
        reply.push_str(&format!("Author: {}\n", authors));
        reply.push_str(RULE);
        reply.push('\n');
    }

    reply.push_str("Use /jm [ID] to download.");
    reply
}

pub fn checking_login() -> &'static str {
    "Checking login status..."
}

pub fn login_status(status: &LoginStatus) -> String {
    if status.is_login {
        format!(
            "Logged in!\nUser: {}\nEmail: {}\nVIP: {}",
            status.username, status.email, status.vip
        )
    } else {
        format!(
            "Not logged in.\nInfo: {}\nCheck the library username/password settings, \
             or whether the cookies in the library option file are still valid.",
            status.msg
        )
    }
}

pub fn login_check_failed(error: &dyn std::fmt::Display) -> String {
    format!("Error while checking login status: {}", error)
}
