use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;

use crate::support::game_setup::test_state;
use crate::support::test_app::test_app;

#[actix_web::test]
async fn websocket_needs_an_identity() {
    let app = test_app!(test_state().await);

    let req = test::TestRequest::get().uri("/api/ws").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "INVALID_HEADER", StatusCode::BAD_REQUEST).await;
}

#[actix_web::test]
async fn plain_get_is_not_an_upgrade() {
    let app = test_app!(test_state().await);

    let req = test::TestRequest::get()
        .uri("/api/ws?player_id=ada&name=Ada")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
