//! PKCE verifier/challenge generation and the authorize URL

use crate::music::{MusicError, MusicResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use reqwest::Url;
use sha2::{Digest, Sha256};

const VERIFIER_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

pub const VERIFIER_LEN: usize = 64;

/// Verifier and its S256 challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let verifier: String = (0..VERIFIER_LEN)
            .map(|_| VERIFIER_ALPHABET[rng.gen_range(0..VERIFIER_ALPHABET.len())] as char)
            .collect();
        let challenge = code_challenge(&verifier);
        Self { verifier, challenge }
    }
}

/// base64url(SHA-256(verifier)) without padding
pub fn code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Authorization endpoint URL for the code flow
pub fn authorize_url(
    accounts_base_url: &str,
    client_id: &str,
    redirect_uri: &str,
    challenge: &str,
    scopes: &[String],
) -> MusicResult<Url> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        &format!("{}/authorize", accounts_base_url.trim_end_matches('/')),
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge_method", "S256"),
            ("code_challenge", challenge),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| MusicError::InvalidUrl(e.to_string()))
}
