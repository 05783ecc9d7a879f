#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::bearer;
use serde_json::{json, Value};

async fn access_token(state: &chirpy_server::AppState, email: &str) -> String {
    common::seed_user(state, email, "password").await;
    let (_, session) = state.auth.login(email, "password", None).await.unwrap();
    session.access_token
}

#[actix_web::test]
async fn test_create_chirp_requires_authentication() {
    let app = test_app!(common::test_state());

    let response = test::TestRequest::post()
        .uri("/api/chirps")
        .set_json(json!({"body": "hello"}))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_chirp() {
    let state = common::test_state();
    let token = access_token(&state, "walt@breakingbad.com").await;
    let app = test_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/chirps")
        .insert_header(bearer(&token))
        .set_json(json!({"body": "I'm the one who knocks kerfuffle"}))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let chirp: Value = test::read_body_json(response).await;
    assert_eq!(chirp["body"], "I'm the one who knocks ****");

    let id = chirp["id"].as_str().unwrap();
    let fetched = test::TestRequest::get()
        .uri(&format!("/api/chirps/{}", id))
        .send_request(&app)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(fetched).await;
    assert_eq!(fetched, chirp);
}

#[actix_web::test]
async fn test_chirp_too_long() {
    let state = common::test_state();
    let token = access_token(&state, "walt@breakingbad.com").await;
    let app = test_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/chirps")
        .insert_header(bearer(&token))
        .set_json(json!({"body": "a".repeat(141)}))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_chirps_sorting_and_filtering() {
    let state = common::test_state();
    let walt = access_token(&state, "walt@breakingbad.com").await;
    let jesse = access_token(&state, "jesse@breakingbad.com").await;
    let app = test_app!(state);

    for (token, body) in [(&walt, "first"), (&jesse, "second"), (&walt, "third")] {
        let response = test::TestRequest::post()
            .uri("/api/chirps")
            .insert_header(bearer(token))
            .set_json(json!({ "body": body }))
            .send_request(&app)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let bodies = |chirps: &Value| -> Vec<String> {
        chirps
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect()
    };

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/chirps").to_request(),
    )
    .await;
    assert_eq!(bodies(&all), vec!["first", "second", "third"]);

    let desc: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/chirps?sort=desc").to_request(),
    )
    .await;
    assert_eq!(bodies(&desc), vec!["third", "second", "first"]);

    let walt_id = all[0]["user_id"].as_str().unwrap();
    let by_walt: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/chirps?author_id={}", walt_id))
            .to_request(),
    )
    .await;
    assert_eq!(bodies(&by_walt), vec!["first", "third"]);

    let bad_author = test::TestRequest::get()
        .uri("/api/chirps?author_id=not-a-uuid")
        .send_request(&app)
        .await;
    assert_eq!(bad_author.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_delete_chirp() {
    let state = common::test_state();
    let walt = access_token(&state, "walt@breakingbad.com").await;
    let jesse = access_token(&state, "jesse@breakingbad.com").await;
    let app = test_app!(state);

    let created = test::TestRequest::post()
        .uri("/api/chirps")
        .insert_header(bearer(&walt))
        .set_json(json!({"body": "Say my name"}))
        .send_request(&app)
        .await;
    let chirp: Value = test::read_body_json(created).await;
    let uri = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());

    let forbidden = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&jesse))
        .send_request(&app)
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let unauthenticated = test::TestRequest::delete().uri(&uri).send_request(&app).await;
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let deleted = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&walt))
        .send_request(&app)
        .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = test::TestRequest::get().uri(&uri).send_request(&app).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
