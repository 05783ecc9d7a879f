//! Request guard for endpoints that need an authenticated user.

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use tracing::debug;
use uuid::Uuid;

use crate::auth::credentials::{get_api_key, get_bearer_token};
use crate::auth::token::AccessTokenCodec;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Extracts the bearer credential and validates it as an access token.
pub fn resolve_identity(headers: &HeaderMap, codec: &AccessTokenCodec) -> Result<Uuid, AuthError> {
    let token = get_bearer_token(headers)?;
    codec.validate(&token)
}

/// Checks an `Authorization: ApiKey <key>` header against the expected key.
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let key = get_api_key(headers)?;
    if key != expected {
        return Err(AuthError::InvalidApiKey);
    }
    Ok(())
}

/// Identity resolved from the request's access token.
///
/// Taking this as a handler argument guards the handler: on failure the
/// handler never runs and the client gets a bare 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("application state is not configured".into()))?;

    match state.auth.resolve_identity(req.headers()) {
        Ok(user_id) => Ok(AuthenticatedUser { user_id }),
        Err(reason) => {
            debug!(path = %req.path(), %reason, "rejected unauthenticated request");
            Err(reason.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderValue, AUTHORIZATION};
    use chrono::Duration;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_resolve_identity() {
        let codec = AccessTokenCodec::new(b"secret").unwrap();
        let user_id = Uuid::new_v4();
        let token = codec.issue(user_id, Duration::minutes(5)).unwrap();

        let headers = headers_with(&format!("Bearer {}", token));
        assert_eq!(resolve_identity(&headers, &codec), Ok(user_id));
    }

    #[test]
    fn test_resolve_identity_failures() {
        let codec = AccessTokenCodec::new(b"secret").unwrap();

        assert_eq!(resolve_identity(&HeaderMap::new(), &codec), Err(AuthError::MissingHeader));

        let token = codec.issue(Uuid::new_v4(), Duration::minutes(5)).unwrap();
        let headers = headers_with(&format!("ApiKey {}", token));
        assert_eq!(resolve_identity(&headers, &codec), Err(AuthError::BadScheme));

        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(resolve_identity(&headers, &codec), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_verify_api_key() {
        let headers = headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(verify_api_key(&headers, "f271c81ff7084ee5b99a5091b42d486e"), Ok(()));
        assert_eq!(verify_api_key(&headers, "something-else"), Err(AuthError::InvalidApiKey));
        assert_eq!(verify_api_key(&HeaderMap::new(), "key"), Err(AuthError::MissingHeader));
    }
}
