#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the location report form.
//!
//! Serves the pre-built form page and the `/api` endpoints. Incoming
//! reports are re-validated server-side and relayed to a Discord webhook
//! when one is configured; webhook delivery failures are logged and
//! never surfaced to the submitting client.

mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

/// Shared application state.
pub struct AppState {
    /// Webhook endpoint for report notifications, if configured.
    pub webhook_url: Option<String>,
    /// Shared HTTP client for outbound webhook calls.
    pub http: reqwest::Client,
}

/// Starts the report API server.
///
/// Reads `BIND_ADDR`, `PORT`, and `DISCORD_WEBHOOK_URL` from the
/// environment. This is a regular async function — the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let webhook_url = geo_report_notify::webhook_url_from_env();
    if webhook_url.is_none() {
        log::warn!("DISCORD_WEBHOOK_URL not set; report notifications are disabled");
    }

    let state = web::Data::new(AppState {
        webhook_url,
        http: reqwest::Client::new(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/report", web::post().to(handlers::report)),
            )
            // Serve the pre-built form page and assets (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
