//! Shared-secret verification of inbound event posts.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Authenticator that expects `Authorization: Bearer <token>` on every post.
///
/// OneBot implementations that forward events over HTTP send the token they
/// were configured with, so this is the same secret set on the bot host side.
pub struct AccessTokenAuthenticator {
    expected_token: String,
}

impl AccessTokenAuthenticator {
    pub fn new(access_token: String) -> Self {
        Self {
            expected_token: access_token,
        }
    }

    fn extract_token<'a>(&self, request: &'a AuthRequest) -> Option<&'a str> {
        let header = request.headers.get("authorization")?;
        header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
    }
}

#[async_trait]
impl Authenticator for AccessTokenAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let provided = self
            .extract_token(request)
            .ok_or(AuthError::NotAuthenticated)?;

        if constant_time_eq(provided.as_bytes(), self.expected_token.as_bytes()) {
            Ok(Identity {
                subject: "bot_host".to_string(),
                method: "access_token".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials(
                "Invalid access token".to_string(),
            ))
        }
    }

    fn method_name(&self) -> &'static str {
        "access_token"
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
