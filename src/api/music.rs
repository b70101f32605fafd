//! Music account connection routes

use crate::api::{ApiError, ApiResult, AppState};
use crate::music::{authorize_url, MusicError, MusicProfile, MusicResult, PkcePair};
use crate::vehicle::VehicleDataSource;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use log::{info, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicConfigResponse {
    client_id: Option<String>,
    redirect_uri: String,
    scopes: Vec<String>,
}

/// Start of the PKCE flow; the browser keeps the verifier until the callback
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    authorize_url: String,
    code_verifier: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    code: String,
    code_verifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    user_id: String,
}

pub async fn config<V: VehicleDataSource>(State(state): State<AppState<V>>) -> Json<MusicConfigResponse> {
    Json(MusicConfigResponse {
        client_id: state.config.music.client_id.clone(),
        redirect_uri: state.config.music_redirect_uri(),
        scopes: state.config.music.scopes.clone(),
    })
}

pub async fn authorize<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
) -> ApiResult<Json<AuthorizeResponse>> {
    let client_id = state.music.client_id()?;
    let pair = PkcePair::generate();
    let url = authorize_url(
        state.music.accounts_base_url(),
        client_id,
        &state.config.music_redirect_uri(),
        &pair.challenge,
        &state.config.music.scopes,
    )?;
    Ok(Json(AuthorizeResponse {
        authorize_url: url.to_string(),
        code_verifier: pair.verifier,
    }))
}

/// Bounce the provider's redirect back to the dashboard page
pub async fn callback<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Redirect> {
    let param = match (query.code, query.error) {
        (_, Some(error)) => ("music_error", error),
        (Some(code), None) => ("music_code", code),
        (None, None) => ("music_error", "missing_code".to_string()),
    };
    let page = format!("{}/", state.config.public_origin.trim_end_matches('/'));
    let url = Url::parse_with_params(&page, &[param])
        .map_err(|e| ApiError::Internal(format!("invalid public origin: {}", e)))?;
    Ok(Redirect::to(url.as_str()))
}

async fn connect<V: VehicleDataSource>(state: &AppState<V>, request: &ExchangeRequest) -> MusicResult<String> {
    let redirect_uri = state.config.music_redirect_uri();
    let tokens = state
        .music
        .exchange_code(&request.code, &request.code_verifier, &redirect_uri)
        .await?;
    let profile = state.music.fetch_profile(&tokens.access_token).await?;
    state.music_tokens.store(&profile.id, tokens);
    Ok(profile.id)
}

pub async fn exchange<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    Json(request): Json<ExchangeRequest>,
) -> Response {
    match connect(&state, &request).await {
        Ok(user_id) => {
            info!("music account {} connected", user_id);
            Json(json!({ "success": true, "userId": user_id })).into_response()
        }
        Err(err) => {
            warn!("music account connection failed: {}", err);
            let message = err.to_string();
            let status = ApiError::from(err).status();
            (status, Json(json!({ "success": false, "message": message }))).into_response()
        }
    }
}

pub async fn profile<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<MusicProfile>> {
    let token = state
        .music_tokens
        .access_token(&query.user_id)
        .ok_or_else(|| MusicError::NotConnected(query.user_id.clone()))?;
    Ok(Json(state.music.fetch_profile(&token).await?))
}
