#![allow(dead_code)]

use chirpy_server::db::models::User;
use chirpy_server::{AppState, Settings, UserRepository};

pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub fn test_settings(jwt_secret: &str) -> Settings {
    let builder = Settings::defaults()
        .expect("Failed to build defaults")
        .set_override("environment", "test")
        .and_then(|b| b.set_override("auth.jwt_secret", jwt_secret))
        .and_then(|b| b.set_override("auth.polka_key", POLKA_KEY))
        .and_then(|b| b.set_override("auth.bcrypt_cost", 4))
        .expect("Failed to apply test overrides");

    Settings::from_builder(builder).expect("Failed to load test settings")
}

pub fn test_state() -> AppState {
    AppState::in_memory(test_settings("integration-test-secret")).expect("Failed to build state")
}

pub async fn seed_user(state: &AppState, email: &str, password: &str) -> User {
    let hash = state.auth.passwords().hash(password).await.expect("Failed to hash password");
    state
        .users
        .create_user(&User::new(email.to_string(), hash))
        .await
        .expect("Failed to seed user")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Builds the full service around a state value.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(chirpy_server::configure_routes),
        )
        .await
    };
}
