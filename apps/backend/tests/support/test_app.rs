//! Test service wired like `main.rs`, minus CORS.

use actix_web::test::TestRequest;
use moonrise::extractors::current_player::{PLAYER_ID_HEADER, PLAYER_NAME_HEADER};

/// Initialise an actix test service over `routes::configure` with the
/// tracing middleware, sharing `$state`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(moonrise::TraceSpan)
                .wrap(moonrise::RequestTrace)
                .app_data(actix_web::web::Data::new($state))
                .configure(moonrise::routes::configure),
        )
        .await
    };
}

pub(crate) use test_app;

/// Attach the identity headers.
pub fn as_player(req: TestRequest, external_id: &str, name: Option<&str>) -> TestRequest {
    let req = req.insert_header((PLAYER_ID_HEADER, external_id));
    match name {
        Some(name) => req.insert_header((PLAYER_NAME_HEADER, name)),
        None => req,
    }
}
