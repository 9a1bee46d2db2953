//! Biblion Server - Library Loan & Inventory Ledger
//!
//! A Rust REST API server for library record keeping.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblion_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblion_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblion Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes consumed by the front-end
    let api_routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Catalog
        .route("/book", post(api::books::register_book))
        .route("/book", get(api::books::search_books))
        .route("/book/available", get(api::books::available_books))
        .route("/book/:id", get(api::books::availability))
        // People (members and librarians)
        .route("/person/socio", post(api::people::register_member))
        .route("/person/bibliotecario", post(api::people::register_librarian))
        .route("/person/socios", get(api::people::list_members))
        .route("/person/bibliotecarios", get(api::people::list_librarians))
        .route("/person/:id/deudas", get(api::people::person_debts))
        // Loans and debts
        .route("/loan", post(api::loans::create_loan))
        .route("/loan/active", get(api::loans::active_loans))
        .route("/loan/:id/devolucion", post(api::loans::return_loan))
        .route("/loan/:id/pagarDeuda", post(api::loans::pay_debt))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
