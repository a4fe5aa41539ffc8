use std::sync::Arc;

use axum::{
    extract::{Query, State, Json},
    http::HeaderMap,
    response::Redirect,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;
use shared_utils::jwt::validate_token;

pub const HOME: &str = "/";
pub const AUTH_ERROR_REDIRECT: &str = "/?error=auth_error";
pub const NO_CODE_REDIRECT: &str = "/?error=no_code";

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub code_verifier: Option<String>,
}

/// OAuth redirect target. Exchanges the code for a session and sends the
/// browser back to the dashboard.
pub async fn oauth_callback(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        debug!("OAuth callback without a code");
        return Redirect::to(NO_CODE_REDIRECT);
    };

    let client = SupabaseClient::new(&config);
    match client.exchange_code_for_session(&code, query.code_verifier.as_deref()).await {
        Ok(session) => {
            info!("OAuth session established (calendar access: {})", session.provider_token.is_some());
            Redirect::to(HOME)
        }
        Err(e) => {
            error!("OAuth code exchange failed: {}", e);
            Redirect::to(AUTH_ERROR_REDIRECT)
        }
    }
}

pub async fn validate(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = bearer_token(&headers)?;
    let user = validate_token(&token, &config.supabase_jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

pub async fn verify(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = bearer_token(&headers)?;
    let valid = validate_token(&token, &config.supabase_jwt_secret).is_ok();
    Ok(Json(json!({ "valid": valid })))
}
