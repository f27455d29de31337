use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub onebot: OneBotConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Inbound event listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Verification of inbound event posts
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub method: AuthMethod,
    /// Token expected in `Authorization: Bearer <token>` (required when method = "access_token")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    #[default]
    None,
    AccessToken,
}

/// Where finished artifacts live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory holding `<album_id>.<extension>` files
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Artifact extension without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            extension: default_extension(),
        }
    }
}

impl OutputConfig {
    /// File name an artifact for `album_id` is expected to carry.
    pub fn artifact_name(&self, album_id: &str) -> String {
        format!("{}.{}", album_id, self.extension)
    }

    /// Full path an artifact for `album_id` is expected at.
    pub fn expected_path(&self, album_id: &str) -> PathBuf {
        self.download_dir.join(self.artifact_name(album_id))
    }

    /// Whether `path` carries the artifact extension.
    pub fn has_artifact_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("data/albumdrop/pdf")
}

fn default_extension() -> String {
    "pdf".to_string()
}

/// Content library helper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// The library's own option file. Only handed to the helper, never parsed here.
    #[serde(default = "default_library_config_path")]
    pub config_path: PathBuf,
    /// Helper executable
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the verb
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            config_path: default_library_config_path(),
            program: default_program(),
            args: default_args(),
            username: None,
            password: None,
        }
    }
}

impl LibraryConfig {
    /// Credentials are only used when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

fn default_library_config_path() -> PathBuf {
    PathBuf::from("data/albumdrop/library.yml")
}

fn default_program() -> String {
    "python3".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-m".to_string(), "albumdrop_bridge".to_string()]
}

/// OneBot v11 HTTP API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OneBotConfig {
    /// Base URL of the OneBot HTTP API (e.g., "http://127.0.0.1:3000")
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Request timeout in seconds (default: 60). Uploads of large files go through this too.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    60
}

/// Sanitized config for logs and API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub output: OutputConfig,
    pub library: SanitizedLibraryConfig,
    pub onebot: SanitizedOneBotConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub access_token_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLibraryConfig {
    pub config_path: PathBuf,
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOneBotConfig {
    pub api_url: String,
    pub access_token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::AccessToken => "access_token".to_string(),
                },
                access_token_configured: config
                    .auth
                    .access_token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
            },
            server: config.server.clone(),
            output: config.output.clone(),
            library: SanitizedLibraryConfig {
                config_path: config.library.config_path.clone(),
                program: config.library.program.clone(),
                args: config.library.args.clone(),
                username: config.library.username.clone(),
                password_configured: config
                    .library
                    .password
                    .as_ref()
                    .is_some_and(|p| !p.is_empty()),
            },
            onebot: SanitizedOneBotConfig {
                api_url: config.onebot.api_url.clone(),
                access_token_configured: config
                    .onebot
                    .access_token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
                timeout_secs: config.onebot.timeout_secs,
            },
        }
    }
}
