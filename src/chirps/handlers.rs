use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::chirps::clean_body;
use crate::db::models::Chirp;
use crate::db::ChirpRepository;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

pub async fn create_chirp(
    identity: AuthenticatedUser,
    req: web::Json<CreateChirpRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = clean_body(&req.body)?;
    let chirp = state.chirps.create_chirp(&Chirp::new(identity.user_id, body)).await?;

    info!("Created chirp {} for user {}", chirp.id, chirp.user_id);
    Ok(HttpResponse::Created().json(chirp))
}

pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let author_id = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::ValidationError("author_id must be a UUID".into()))?,
        ),
    };

    let mut chirps = state.chirps.list_chirps(author_id).await?;
    match query.sort.as_deref() {
        None | Some("") | Some("asc") => {}
        Some("desc") => chirps.reverse(),
        Some(_) => return Err(AppError::ValidationError("sort must be asc or desc".into())),
    }

    Ok(HttpResponse::Ok().json(chirps))
}

pub async fn get_chirp(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let chirp = state
        .chirps
        .get_chirp(path.into_inner())
        .await?
        .ok_or(DatabaseError::NotFound)?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// Only the author may delete a chirp.
pub async fn delete_chirp(
    identity: AuthenticatedUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();
    let chirp = state
        .chirps
        .get_chirp(chirp_id)
        .await?
        .ok_or(DatabaseError::NotFound)?;

    if chirp.user_id != identity.user_id {
        warn!("User {} attempted to delete chirp {} owned by {}", identity.user_id, chirp.id, chirp.user_id);
        return Err(AppError::Forbidden("chirp belongs to another user".into()));
    }

    state.chirps.delete_chirp(chirp_id).await?;
    info!("Deleted chirp {}", chirp_id);
    Ok(HttpResponse::NoContent().finish())
}
