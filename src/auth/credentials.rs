//! Parsing of the `Authorization` header.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use std::fmt;

use crate::error::AuthError;

/// Authorization schemes this service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Bearer,
    ApiKey,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Bearer => "Bearer",
            Scheme::ApiKey => "ApiKey",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the credential from a raw header value.
///
/// The value must start with exactly `"<Scheme> "` (case-sensitive, one
/// space). The rest is trimmed and returned verbatim.
pub fn extract_credential(header: Option<&str>, scheme: Scheme) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingHeader),
    };

    let credential = header
        .strip_prefix(scheme.as_str())
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(AuthError::BadScheme)?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::EmptyCredential);
    }

    Ok(credential)
}

/// A header that is present but not valid visible ASCII is treated as a
/// scheme mismatch, since no accepted scheme could have produced it.
fn authorization(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    match headers.get(AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value.to_str().map(Some).map_err(|_| AuthError::BadScheme),
    }
}

pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(authorization(headers)?, Scheme::Bearer).map(str::to_string)
}

pub fn get_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(authorization(headers)?, Scheme::ApiKey).map(str::to_string)
}
