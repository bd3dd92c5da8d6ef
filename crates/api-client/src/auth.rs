//! Credential carrier for authenticated writes
//!
//! Credentials are passed per call and turned into request headers. The
//! client never stores them.

use crate::error::{TransportError, TransportResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::env;
use std::fmt;

const USERNAME_VAR: &str = "OPENFOOD_USERNAME";
const PASSWORD_VAR: &str = "OPENFOOD_PASSWORD";
const TOKEN_VAR: &str = "OPENFOOD_AUTH_TOKEN";

/// HTTP Basic credentials, held as the pre-encoded token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Wrap an already base64-encoded `user:password` token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Encode a username and password pair
    pub fn basic(username: &str, password: &str) -> Self {
        Self::from_token(STANDARD.encode(format!("{username}:{password}")))
    }

    /// Read credentials from the environment
    ///
    /// `OPENFOOD_AUTH_TOKEN` wins when set; otherwise both
    /// `OPENFOOD_USERNAME` and `OPENFOOD_PASSWORD` are required.
    pub fn from_env() -> TransportResult<Self> {
        if let Ok(token) = env::var(TOKEN_VAR) {
            return Ok(Self::from_token(token));
        }

        let username = env::var(USERNAME_VAR).map_err(|_| TransportError::missing_env(USERNAME_VAR))?;
        let password = env::var(PASSWORD_VAR).map_err(|_| TransportError::missing_env(PASSWORD_VAR))?;
        Ok(Self::basic(&username, &password))
    }

    /// Value for the `Authorization` header
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Basic {}", self.token)
    }

    /// Headers to attach to an authenticated request
    #[must_use]
    pub fn headers(&self) -> [(String, String); 2] {
        [
            ("Authorization".to_string(), self.authorization()),
            ("Accept".to_string(), "application/json".to_string()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}
