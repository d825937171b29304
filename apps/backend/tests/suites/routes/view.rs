use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use backend_test_support::unique_helpers::unique_str;
use moonrise::domain::roles::RoleKind::{Seer, Villager, Werewolf};
use moonrise::protocol::view::PlayerView;
use serde_json::json;

use crate::support::game_setup::{start_with_roles, test_state};
use crate::support::test_app::{as_player, test_app};

#[actix_web::test]
async fn no_game_yet_is_not_found() {
    let app = test_app!(test_state().await);

    let req = as_player(
        test::TestRequest::get().uri("/api/game/view"),
        &unique_str("ada"),
        None,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "GAME_NOT_FOUND", StatusCode::NOT_FOUND).await;
}

#[actix_web::test]
async fn identity_headers_register_and_rename() {
    let app = test_app!(test_state().await);
    let me = unique_str("ada");

    let join = as_player(
        test::TestRequest::post().uri("/api/game/intents"),
        &me,
        Some("Ada"),
    )
    .set_json(json!({ "action": "join_lobby" }))
    .to_request();
    assert!(test::call_service(&app, join).await.status().is_success());

    let req = as_player(test::TestRequest::get().uri("/api/game/view"), &me, Some("Lovelace"))
        .to_request();
    let view: PlayerView = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.players[0].name, "Lovelace");
}

#[actix_web::test]
async fn strangers_see_the_public_table() {
    let g = start_with_roles(test_state().await, &[Werewolf, Seer, Villager]).await;
    let app = test_app!(g.state.clone());

    let req = as_player(
        test::TestRequest::get().uri("/api/game/view"),
        &unique_str("outsider"),
        None,
    )
    .to_request();
    let outsider: PlayerView = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outsider.game_id, g.game_id);
    assert!(outsider.me.is_none());
    assert_eq!(outsider.players.len(), 3);
    assert!(outsider.players.iter().all(|s| s.role.is_none()));
}
