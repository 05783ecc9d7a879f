use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::AuthenticatedUser;
use crate::db::models::User;
use crate::db::UserRepository;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

impl UserRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() {
            return Err(AppError::ValidationError("email must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::ValidationError("password must not be empty".into()));
        }
        Ok(())
    }
}

pub async fn create_user(
    req: web::Json<UserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    req.validate()?;

    let hashed_password = state.auth.passwords().hash(&req.password).await?;
    match state.users.create_user(&User::new(req.email.clone(), hashed_password)).await {
        Ok(user) => {
            info!("Created user: {}", user.id);
            Ok(HttpResponse::Created().json(user))
        }
        Err(e) => {
            error!("User creation failed: {}", e);
            Err(e)
        }
    }
}

/// Replaces the authenticated user's email and password.
pub async fn update_user(
    identity: AuthenticatedUser,
    req: web::Json<UserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    req.validate()?;

    let hashed_password = state.auth.passwords().hash(&req.password).await?;
    let user = state
        .users
        .update_user(identity.user_id, &req.email, &hashed_password)
        .await?;

    info!("Updated user: {}", user.id);
    Ok(HttpResponse::Ok().json(user))
}
