use actix_web::{web, App, HttpServer};
use moonrise::config::db::DbProfile;
use moonrise::infra::state::build_state;
use moonrise::middleware::{cors_middleware, RequestTrace, TraceSpan};
use moonrise::{routes, telemetry};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("MOONRISE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("MOONRISE_PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                error!(value = %raw, "MOONRISE_PORT must be a valid port number");
                std::process::exit(1);
            }
        },
        Err(_) => 3001,
    };

    let app_state = match build_state()
        .with_db(DbProfile::Prod)
        .with_storyteller_from_env()
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        %host,
        port,
        storyteller = app_state.storyteller().is_some(),
        "Starting Moonrise"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
