//! Accounts and Web API calls

use crate::music::{MusicError, MusicResult};
use crate::utils::config::MusicSettings;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tokens returned by the accounts service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of `access_token` in seconds
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenSet {
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }
}

/// Profile of the connected account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Turn an accounts error body into a readable reason
fn exchange_failure(body: &str) -> String {
    match serde_json::from_str::<OAuthErrorBody>(body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{}: {}", err.error, description),
            None => err.error,
        },
        Err(_) => body.trim().to_string(),
    }
}

/// Client for the music service
#[derive(Clone)]
pub struct MusicClient {
    client: Client,
    accounts_base_url: String,
    api_base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl std::fmt::Debug for MusicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicClient")
            .field("accounts_base_url", &self.accounts_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl MusicClient {
    pub fn new(settings: &MusicSettings) -> MusicResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("DriveTunes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            accounts_base_url: settings.accounts_base_url.trim_end_matches('/').to_string(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        })
    }

    pub fn client_id(&self) -> MusicResult<&str> {
        self.client_id
            .as_deref()
            .ok_or(MusicError::NotConfigured("SPOTIFY_CLIENT_ID"))
    }

    pub fn accounts_base_url(&self) -> &str {
        &self.accounts_base_url
    }

    /// Exchange an authorization code and its PKCE verifier for tokens
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> MusicResult<TokenSet> {
        let client_id = self.client_id()?;
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("code_verifier", code_verifier),
        ];

        let mut request = self
            .client
            .post(format!("{}/api/token", self.accounts_base_url))
            .form(&form);
        // Confidential clients authenticate too; pure PKCE clients don't have a secret
        if let Some(secret) = &self.client_secret {
            request = request.basic_auth(client_id, Some(secret));
        }

        debug!("exchanging authorization code");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("code exchange rejected with {}", status);
            return Err(MusicError::Exchange(exchange_failure(&body)));
        }

        Ok(response.json().await?)
    }

    /// Profile of the account owning `access_token`
    pub async fn fetch_profile(&self, access_token: &str) -> MusicResult<MusicProfile> {
        let response = self
            .client
            .get(format!("{}/me", self.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MusicError::Transport(format!("profile request returned {}", status)));
        }
        Ok(response.json().await?)
    }
}
