pub mod auth;
pub mod coach;
pub mod error;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        // Conversion engine
        .route(
            "/api/calculations",
            get(routes::calculations::list_calculations)
                .post(routes::calculations::create_calculation),
        )
        .route(
            "/api/calculations/preview",
            post(routes::calculations::preview_calculation),
        )
        // Daily logs and nudges
        .route(
            "/api/waste-logs",
            get(routes::waste_logs::list_waste_logs).post(routes::waste_logs::create_waste_log),
        )
        .route("/api/nudges", get(routes::nudges::get_nudges))
        // Eco points and store
        .route(
            "/api/ecopoints",
            get(routes::ecopoints::get_ecopoints).post(routes::ecopoints::award_ecopoints),
        )
        .route(
            "/api/ecostore",
            get(routes::ecostore::list_products).post(routes::ecostore::purchase_product),
        )
        // Community
        .route(
            "/api/locations",
            get(routes::locations::list_locations).post(routes::locations::create_location),
        )
        .route(
            "/api/events",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        // Coach
        .route("/api/coach", post(routes::coach::ask_coach))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the WasteWise API server for the project at `root`.
pub async fn serve(root: &Path, port: u16) -> anyhow::Result<()> {
    let app_state = AppState::open(root)?;
    let addr = format!("{}:{port}", app_state.config.server.bind);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let backend = app_state.coach.name();
    let app = build_router(app_state);

    tracing::info!(coach = backend, "WasteWise API listening on http://localhost:{actual_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
