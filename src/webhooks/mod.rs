//! Inbound webhooks from the payment provider (Polka).

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::verify_api_key;
use crate::db::UserRepository;
use crate::error::AppError;
use crate::AppState;

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub user_id: String,
}

/// Applies a provider event. Events other than `user.upgraded` are
/// acknowledged and ignored. The key is checked before the body is parsed.
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if let Err(reason) = verify_api_key(req.headers(), &state.config.auth.polka_key) {
        warn!(%reason, "Rejected webhook call");
        return Err(reason.into());
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(format!("invalid webhook payload: {}", e)))?;

    if event.event != USER_UPGRADED_EVENT {
        info!("Ignoring webhook event: {}", event.event);
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&event.data.user_id)
        .map_err(|_| AppError::ValidationError("data.user_id must be a UUID".into()))?;

    let user = state.users.upgrade_to_chirpy_red(user_id).await?;
    info!("Upgraded user {} to Chirpy Red", user.id);

    Ok(HttpResponse::NoContent().finish())
}
