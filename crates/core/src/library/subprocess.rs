//! Content library driven through an external helper process.
//!
//! The helper is invoked as `<program> <args...> <verb> [argument]` and must
//! print exactly one JSON document on stdout:
//!
//! | verb       | stdout                                                        |
//! |------------|---------------------------------------------------------------|
//! | `login`    | `{"is_login", "username", "email", "vip", "msg"}`             |
//! | `search`   | `{"ok", "msg", "album_list": [{"id", "title", "author_list"}]}` |
//! | `download` | `{"ok", "msg", "album": {"file_path"}}`                        |
//!
//! The library's own option file, download directory and credentials are
//! passed through the environment.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use crate::config::{LibraryConfig, OutputConfig};

use super::traits::ContentLibrary;
use super::types::{FetchOutcome, LibraryError, LoginStatus, SearchOutcome};

/// Wire shape of a `download` response.
#[derive(Debug, Deserialize)]
struct DownloadResponse {
    ok: bool,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    album: Option<DownloadedAlbum>,
}

#[derive(Debug, Deserialize)]
struct DownloadedAlbum {
    #[serde(default)]
    file_path: Option<String>,
}

impl From<DownloadResponse> for FetchOutcome {
    fn from(response: DownloadResponse) -> Self {
        let path = response
            .album
            .and_then(|album| album.file_path)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        FetchOutcome::from_parts(response.ok, response.msg, path)
    }
}

/// [`ContentLibrary`] backed by a helper executable.
pub struct SubprocessLibrary {
    config: LibraryConfig,
    download_dir: PathBuf,
}

impl SubprocessLibrary {
    pub fn new(config: LibraryConfig, output: &OutputConfig) -> Self {
        Self {
            config,
            download_dir: output.download_dir.clone(),
        }
    }

    fn invoke<T: DeserializeOwned>(&self, verb: &str, argument: Option<&str>) -> Result<T, LibraryError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(verb)
            .env("ALBUMDROP_LIBRARY_CONFIG", &self.config.config_path)
            .env("ALBUMDROP_DOWNLOAD_DIR", &self.download_dir);
        if let Some(argument) = argument {
            command.arg(argument);
        }
        if let Some((username, password)) = self.config.credentials() {
            command
                .env("ALBUMDROP_USERNAME", username)
                .env("ALBUMDROP_PASSWORD", password);
        }

        debug!(program = %self.config.program, verb, ?argument, "Invoking library helper");

        let output = command.output().map_err(|source| LibraryError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LibraryError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().chars().take(500).collect(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            LibraryError::Decode(format!(
                "{} (stdout: {})",
                e,
                String::from_utf8_lossy(&output.stdout)
                    .chars()
                    .take(200)
                    .collect::<String>()
            ))
        })
    }
}

impl ContentLibrary for SubprocessLibrary {
    fn name(&self) -> &str {
        "subprocess"
    }

    fn check_login(&self) -> Result<LoginStatus, LibraryError> {
        self.invoke("login", None)
    }

    fn search_album(&self, keyword: &str) -> Result<SearchOutcome, LibraryError> {
        self.invoke("search", Some(keyword))
    }

    fn download_album(&self, album_id: &str) -> Result<FetchOutcome, LibraryError> {
        self.invoke::<DownloadResponse>("download", Some(album_id))
            .map(FetchOutcome::from)
    }
}
