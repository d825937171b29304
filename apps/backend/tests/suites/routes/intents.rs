use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use backend_test_support::unique_helpers::unique_str;
use serde_json::{json, Value};

use crate::support::game_setup::test_state;
use crate::support::test_app::{as_player, test_app};

fn intent(external_id: &str, body: Value) -> test::TestRequest {
    as_player(
        test::TestRequest::post().uri("/api/game/intents"),
        external_id,
        Some("Ada"),
    )
    .set_json(body)
}

#[actix_web::test]
async fn joining_returns_the_callers_view() {
    let app = test_app!(test_state().await);
    let me = unique_str("ada");

    let resp = test::call_service(&app, intent(&me, json!({ "action": "join_lobby" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["version"].as_i64().unwrap() >= 1);
    assert_eq!(body["view"]["status"], "lobby");
    assert_eq!(body["view"]["players"][0]["name"], "Ada");
    assert_eq!(body["view"]["me"]["alive"], true);
}

#[actix_web::test]
async fn string_fields_are_accepted() {
    let app = test_app!(test_state().await);
    let me = unique_str("ada");

    test::call_service(&app, intent(&me, json!({ "action": "join_lobby" })).to_request()).await;
    let resp = test::call_service(
        &app,
        intent(
            &me,
            json!({ "action": "set_role_count", "role_id": "2", "delta": "+1" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let counts = body["view"]["role_counts"].as_array().unwrap();
    assert!(counts
        .iter()
        .any(|c| c["role"] == "Werewolf" && c["count"] == 1));
}

#[actix_web::test]
async fn missing_identity_is_a_bad_header() {
    let app = test_app!(test_state().await);

    let req = test::TestRequest::post()
        .uri("/api/game/intents")
        .set_json(json!({ "action": "join_lobby" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "INVALID_HEADER", StatusCode::BAD_REQUEST).await;
}

#[actix_web::test]
async fn unknown_actions_are_malformed() {
    let app = test_app!(test_state().await);
    let me = unique_str("ada");

    let resp = test::call_service(&app, intent(&me, json!({ "action": "summon_vampire" })).to_request()).await;
    let problem = assert_problem(resp, "MALFORMED_INTENT", StatusCode::BAD_REQUEST).await;
    assert!(problem.detail.contains("summon_vampire"));

    let resp = test::call_service(
        &app,
        intent(&me, json!({ "action": "set_role_count", "role_id": "2", "delta": "3" })).to_request(),
    )
    .await;
    assert_problem(resp, "MALFORMED_INTENT", StatusCode::BAD_REQUEST).await;
}

#[actix_web::test]
async fn broken_json_is_malformed() {
    let app = test_app!(test_state().await);

    let req = as_player(
        test::TestRequest::post().uri("/api/game/intents"),
        &unique_str("ada"),
        None,
    )
    .insert_header(("content-type", "application/json"))
    .set_payload("{\"action\": ")
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "MALFORMED_INTENT", StatusCode::BAD_REQUEST).await;
}

#[actix_web::test]
async fn rule_rejections_are_problem_details() {
    let app = test_app!(test_state().await);
    let me = unique_str("ada");

    // No game yet.
    let resp = test::call_service(&app, intent(&me, json!({ "action": "day_pass" })).to_request()).await;
    assert_problem(resp, "PHASE_MISMATCH", StatusCode::BAD_REQUEST).await;

    test::call_service(&app, intent(&me, json!({ "action": "join_lobby" })).to_request()).await;
    let resp = test::call_service(&app, intent(&me, json!({ "action": "start_game" })).to_request()).await;
    let problem = assert_problem(resp, "INVALID_START", StatusCode::BAD_REQUEST).await;
    assert_eq!(problem.title, "Invalid Start");
}
