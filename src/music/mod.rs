//! Music-streaming account link over OAuth 2.0 with PKCE
//!
//! Only the connection half is implemented: authorize, exchange the code,
//! remember the tokens per user and read the profile. Playlist generation from
//! driving data is not built yet.

pub mod pkce;
pub mod client;
pub mod tokens;

pub use pkce::{authorize_url, code_challenge, PkcePair};
pub use client::{MusicClient, MusicProfile, TokenSet};
pub use tokens::MusicTokenStore;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MusicError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("authorization code exchange failed: {0}")]
    Exchange(String),
    #[error("music service request failed: {0}")]
    Transport(String),
    #[error("invalid accounts URL: {0}")]
    InvalidUrl(String),
    #[error("user {0} is not connected")]
    NotConnected(String),
}

pub type MusicResult<T> = Result<T, MusicError>;

impl From<reqwest::Error> for MusicError {
    fn from(error: reqwest::Error) -> Self {
        MusicError::Transport(error.to_string())
    }
}
