//! Inbound command parsing.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static ALBUM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

const FETCH_PREFIX: &str = "/jm";
const SEARCH_PREFIXES: [&str; 2] = ["/jm_search", "/jmsearch"];
const STATUS_COMMANDS: [&str; 2] = ["/jm_status", "/jminfo"];

/// A recognised chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch every album id found in the text, duplicates included.
    Fetch { album_ids: Vec<String> },
    /// Search by keyword. May be empty; the dispatcher rejects that.
    Search { keyword: String },
    /// Report the library's login state.
    Status,
}

impl Command {
    /// Label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Search { .. } => "search",
            Self::Status => "status",
        }
    }
}

/// Parse a chat message. `None` means the message is not for us.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();

    for prefix in SEARCH_PREFIXES {
        if is_command(text, prefix) {
            return Some(Command::Search {
                keyword: text[prefix.len()..].trim().to_string(),
            });
        }
    }

    if STATUS_COMMANDS.iter().any(|command| is_command(text, command)) {
        return Some(Command::Status);
    }

    text.strip_prefix(FETCH_PREFIX).map(|rest| Command::Fetch {
        album_ids: extract_album_ids(rest),
    })
}

/// `text` is `command`, alone or followed by whitespace.
fn is_command(text: &str, command: &str) -> bool {
    text.strip_prefix(command)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Every run of ASCII digits in `text`, in order.
pub fn extract_album_ids(text: &str) -> Vec<String> {
    ALBUM_ID
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fetch_single() {
        assert_eq!(
            parse_command("/jm 350234"),
            Some(Command::Fetch {
                album_ids: ids(&["350234"])
            })
        );
    }

    #[test]
    fn test_fetch_keeps_duplicates_in_order() {
        assert_eq!(
            parse_command("/jm 123 456 123"),
            Some(Command::Fetch {
                album_ids: ids(&["123", "456", "123"])
            })
        );
    }

    #[test]
    fn test_fetch_extracts_from_noise() {
        assert_eq!(
            parse_command("  /jm please get 12,34 and JM567!  "),
            Some(Command::Fetch {
                album_ids: ids(&["12", "34", "567"])
            })
        );
    }

    #[test]
    fn test_fetch_without_space() {
        assert_eq!(
            parse_command("/jm123"),
            Some(Command::Fetch {
                album_ids: ids(&["123"])
            })
        );
    }

    #[test]
    fn test_fetch_without_ids() {
        assert_eq!(
            parse_command("/jm hello"),
            Some(Command::Fetch { album_ids: vec![] })
        );
    }

    #[test]
    fn test_search_is_not_a_fetch() {
        assert_eq!(
            parse_command("/jm_search 123"),
            Some(Command::Search {
                keyword: "123".to_string()
            })
        );
        assert_eq!(
            parse_command("/jmsearch  some words "),
            Some(Command::Search {
                keyword: "some words".to_string()
            })
        );
    }

    #[test]
    fn test_search_without_keyword() {
        assert_eq!(
            parse_command("/jm_search   "),
            Some(Command::Search {
                keyword: String::new()
            })
        );
    }

    #[test]
    fn test_status_commands() {
        assert_eq!(parse_command("/jm_status"), Some(Command::Status));
        assert_eq!(parse_command(" /jminfo "), Some(Command::Status));
    }

    #[test]
    fn test_status_with_trailing_text_is_status() {
        assert_eq!(parse_command("/jm_status 5"), Some(Command::Status));
        assert_eq!(parse_command("/jminfo now"), Some(Command::Status));
    }

    #[test]
    fn test_unrelated_text_is_ignored() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command("jm 123"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_command_kind() {
        assert_eq!(Command::Status.kind(), "status");
        assert_eq!(Command::Fetch { album_ids: vec![] }.kind(), "fetch");
    }
}
