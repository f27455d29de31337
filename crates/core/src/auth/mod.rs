mod access_token;
mod none;
mod traits;
mod types;

pub use access_token::*;
pub use none::*;
pub use traits::*;
pub use types::*;

use crate::config::{AuthConfig, AuthMethod};

/// Factory function to create authenticator from config
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::AccessToken => {
            let token = config
                .access_token
                .clone()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    AuthError::ConfigurationError(
                        "access_token must be set when using access_token auth method"
                            .to_string(),
                    )
                })?;
            Ok(Box::new(AccessTokenAuthenticator::new(token)))
        }
    }
}
