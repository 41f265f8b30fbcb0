//! Bearer token verification.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
}

/// Maps a bearer token to the id of the user who owns it.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Verifier backed by a fixed token → user id table.
#[derive(Clone, Debug, Default)]
pub struct StaticVerifier {
    token_to_uid: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new<I, T, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            token_to_uid: entries
                .into_iter()
                .map(|(token, uid)| (token.into(), uid.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.token_to_uid
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// The authenticated user, inserted into request extensions by the auth
/// middleware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
