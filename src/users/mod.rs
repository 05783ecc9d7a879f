//! User registration and profile updates.

pub mod handlers;
