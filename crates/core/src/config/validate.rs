use super::{
    types::{AuthMethod, Config},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - OneBot API URL is set (section presence enforced by serde)
/// - Server port is not 0
/// - Access-token auth carries a token
/// - Artifact extension is a bare, non-empty extension
/// - Library helper program is set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.onebot.api_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "onebot.api_url cannot be empty".to_string(),
        ));
    }

    if config.auth.method == AuthMethod::AccessToken
        && config
            .auth
            .access_token
            .as_ref()
            .is_none_or(|t| t.is_empty())
    {
        return Err(ConfigError::ValidationError(
            "auth.access_token must be set when auth.method = \"access_token\"".to_string(),
        ));
    }

    let extension = &config.output.extension;
    if extension.is_empty() || extension.contains('.') || extension.contains('/') {
        return Err(ConfigError::ValidationError(format!(
            "output.extension must be a bare extension like \"pdf\", got {:?}",
            extension
        )));
    }

    if config.library.program.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "library.program cannot be empty".to_string(),
        ));
    }

    Ok(())
}
