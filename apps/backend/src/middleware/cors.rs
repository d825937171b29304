use std::env;

use actix_cors::Cors;
use actix_web::http::header;

use crate::extractors::current_player::{PLAYER_ID_HEADER, PLAYER_NAME_HEADER};

/// Comma-separated list of allowed origins.
pub const CORS_ORIGINS_ENV: &str = "MOONRISE_CORS_ORIGINS";

/// Origins from `raw`, keeping only `http(s)://` entries; localhost when
/// nothing usable is configured.
pub fn allowed_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}

pub fn cors_middleware() -> Cors {
    let raw = env::var(CORS_ORIGINS_ENV).unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(PLAYER_ID_HEADER),
            header::HeaderName::from_static(PLAYER_NAME_HEADER),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600);

    for origin in allowed_origins(&raw) {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
