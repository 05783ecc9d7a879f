use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::credentials::get_bearer_token;
use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    match state.auth.login(&req.email, &req.password, req.expires_in_seconds).await {
        Ok((user, session)) => {
            info!("Login successful for user: {}", user.id);
            Ok(HttpResponse::Ok().json(LoginResponse {
                id: user.id,
                created_at: user.created_at,
                updated_at: user.updated_at,
                email: user.email,
                is_chirpy_red: user.is_chirpy_red,
                token: session.access_token,
                refresh_token: session.refresh_token,
            }))
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            Err(e)
        }
    }
}

/// Exchanges `Authorization: Bearer <refresh token>` for a new access token.
pub async fn refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = get_bearer_token(req.headers())?;

    match state.auth.refresh_session(&refresh_token).await {
        Ok(token) => Ok(HttpResponse::Ok().json(TokenResponse { token })),
        Err(e) => {
            warn!("Refresh failed: {}", e);
            Err(e)
        }
    }
}

/// Revokes the presented refresh token.
///
/// Unknown tokens also get 204 so the endpoint cannot be used to discover which
/// tokens exist. Storage failures still surface as 500.
pub async fn revoke(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = get_bearer_token(req.headers())?;

    match state.auth.revoke_session(&refresh_token).await {
        Ok(()) => info!("Refresh token revoked"),
        Err(AppError::AuthError(AuthError::NotFound)) => info!("Revoke requested for unknown refresh token"),
        Err(e) => {
            warn!("Revoke failed: {}", e);
            return Err(e);
        }
    }

    Ok(HttpResponse::NoContent().finish())
}
