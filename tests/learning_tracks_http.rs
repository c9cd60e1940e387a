mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::app::spawn_test_server;
use common::auth::new_learner;
use common::http::call;

#[tokio::test]
async fn it_activate_then_read_active_track() {
    let app = spawn_test_server().await;
    let (learner_id, token) = new_learner(&app);
    let token = Some(token.as_str());

    call(&app.app, Method::GET, "/api/learning-tracks/active", None, token)
        .await
        .assert_error(StatusCode::NOT_FOUND, "NO_ACTIVE_TRACK");

    let activate = |lang: &'static str| {
        call(
            &app.app,
            Method::POST,
            "/api/learning-tracks/activate",
            Some(json!({ "languageCode": lang })),
            token,
        )
    };

    let french = activate("fr").await;
    let french_id = french.data()["id"].as_str().unwrap().to_string();
    assert_eq!(french.data()["learnerId"], learner_id);
    assert_eq!(french.data()["isCurrentActive"], true);

    activate("de").await.data();
    let again = activate("FR").await;
    assert_eq!(again.data()["id"], french_id);

    let active = call(&app.app, Method::GET, "/api/learning-tracks/active", None, token).await;
    assert_eq!(active.data()["id"], french_id);
    assert_eq!(active.data()["languageCode"], "fr");
}

#[tokio::test]
async fn it_activate_rejects_bad_language_code() {
    let app = spawn_test_server().await;
    let (_, token) = new_learner(&app);

    call(
        &app.app,
        Method::POST,
        "/api/learning-tracks/activate",
        Some(json!({ "languageCode": "x" })),
        Some(&token),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}
