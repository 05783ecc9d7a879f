//! Authentication module for the Chirpy server
//!
//! Header parsing, signed access tokens, opaque refresh tokens, the request
//! guard for protected endpoints, and the session service tying them together.

pub mod credentials;
pub mod gate;
pub mod handlers;
pub mod password;
pub mod refresh;
pub mod token;
mod service;

pub use credentials::{extract_credential, get_api_key, get_bearer_token, Scheme};
pub use gate::{resolve_identity, verify_api_key, AuthenticatedUser};
pub use password::PasswordHasher;
pub use refresh::{generate_refresh_token, RefreshTokenStore};
pub use service::{AuthService, Session};
pub use token::{AccessTokenCodec, Claims, ACCESS_TOKEN_ISSUER};
