use std::time::Duration;

use anyhow::Context;
use aq_api::{config::ApiConfig, state::ApiState};
use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("invalid configuration")?;

    aq_api::tracing::init_tracing(&config.env);

    let metrics_handle = aq_api::metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    let pool = aq_db::create_pool(&config.database_url, config.db_max_connections).await?;
    aq_db::migrate(&pool).await?;
    tracing::info!(
        questions = aq_db::repositories::question::count_questions(&pool).await?,
        "Database ready"
    );

    let state = ApiState::new(&config, pool.clone());

    let job_handles = aq_api::jobs::start_background_jobs(
        state.sessions.clone(),
        Duration::from_secs(config.session_sweep_seconds),
    );
    tracing::info!(
        every_seconds = config.session_sweep_seconds,
        "Session sweep started"
    );

    let cors = aq_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(aq_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = aq_api::router::router()
        .merge(metrics_app)
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(aq_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            aq_api::middleware::request_id::request_id_middleware,
        ));

    let app = aq_api::middleware::security_headers::apply_security_headers(app, config.env);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(environment = ?config.env, %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for handle in job_handles {
        handle.abort();
    }
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
