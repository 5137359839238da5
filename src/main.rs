use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use studiobook::auth::StaticTokenProvider;
use studiobook::config::AppConfig;
use studiobook::db;
use studiobook::handlers;
use studiobook::logbuf::LogBuffer;
use studiobook::services::repository::sqlite::SqliteBookingRepository;
use studiobook::services::repository::BookingRepository;
use studiobook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let (db, repo) = match &config.database_url {
        Some(url) => {
            let conn = db::init_db(url)?;
            let handle = Arc::new(Mutex::new(conn));
            tracing::info!(url = %url, "store configured");
            let repo = SqliteBookingRepository::new(handle.clone());
            (
                Some(handle),
                Some(Box::new(repo) as Box<dyn BookingRepository>),
            )
        }
        None => {
            if config.strict_intake {
                tracing::warn!("DATABASE_URL not set; strict mode will reject submissions");
            } else {
                tracing::warn!("DATABASE_URL not set; submissions will be logged, not persisted");
            }
            (None, None)
        }
    };

    let state = Arc::new(AppState {
        db,
        repo,
        config: config.clone(),
        identity: Box::new(StaticTokenProvider::from_spec(&config.admin_tokens)),
        logs: LogBuffer::new(config.log_buffer_size),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/book", post(handlers::book::submit_booking))
        .route("/api/packages", get(handlers::admin::public_packages))
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/status",
            post(handlers::admin::update_booking_status),
        )
        .route(
            "/api/admin/bookings/:id/delete",
            post(handlers::admin::delete_booking),
        )
        .route("/api/admin/content", get(handlers::admin::get_content))
        .route("/api/admin/content", post(handlers::admin::update_content))
        .route("/api/admin/packages", get(handlers::admin::get_packages))
        .route("/api/admin/packages", post(handlers::admin::create_package))
        .route(
            "/api/admin/packages/:id",
            post(handlers::admin::update_package),
        )
        .route(
            "/api/admin/packages/:id/delete",
            post(handlers::admin::delete_package),
        )
        .route("/api/admin/logs", get(handlers::admin::get_logs))
        .route("/api/admin/logs/clear", post(handlers::admin::clear_logs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
