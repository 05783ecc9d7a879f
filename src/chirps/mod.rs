//! Chirps: short posts owned by a user.

pub mod handlers;
mod validation;

pub use validation::{clean_body, MAX_CHIRP_LENGTH};
