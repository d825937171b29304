use actix_web::test;
use serde_json::Value;

use crate::support::game_setup::test_state;
use crate::support::test_app::test_app;

#[actix_web::test]
async fn health_reports_a_migrated_database() {
    let app = test_app!(test_state().await);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_ne!(body["migrations"], "no_migrations");
    assert_eq!(body["active_games"], 0);
    assert_eq!(body["sessions"], 0);
}

#[actix_web::test]
async fn health_without_a_database_still_answers() {
    let state = moonrise::build_state().build().await.unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "error");
    assert!(body["db_error"].as_str().unwrap().contains("unavailable"));
}
