use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kbase_common::Config;
use kbase_drafting::DraftAssistant;
use kbase_engine::BatchEngine;
use kbase_store::PgDocumentStore;

mod auth;
mod jwt;
mod rest;

use jwt::JwtService;

pub struct AppState {
    pub config: Config,
    pub store: Arc<PgDocumentStore>,
    pub drafting: Arc<DraftAssistant>,
    pub engine: BatchEngine<Arc<PgDocumentStore>, Arc<DraftAssistant>>,
    pub jwt: JwtService,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kbase=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let store = Arc::new(PgDocumentStore::new(pool));
    store.migrate().await?;

    let drafting = Arc::new(DraftAssistant::new(
        &config.anthropic_api_key,
        &config.drafting_model,
    ));

    let state = Arc::new(AppState {
        engine: BatchEngine::new(store.clone(), drafting.clone()),
        jwt: JwtService::new(&config.jwt_secret, "kbase".to_string()),
        store,
        drafting,
        config: config.clone(),
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Auth
        .route("/api/auth/token", post(rest::token::issue_token))
        // Documents
        .route(
            "/api/documents",
            get(rest::documents::list_documents).post(rest::documents::create_document),
        )
        .route("/api/documents/{id}", get(rest::documents::get_document))
        .route(
            "/api/documents/{id}/summary",
            post(rest::documents::generate_summary),
        )
        // Batch workflow
        .route("/api/documents/batch", post(rest::batch::run_batch))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only (no query params, no bodies)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("kbase API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
