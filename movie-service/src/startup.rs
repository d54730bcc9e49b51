//! Application startup and lifecycle management.

use crate::config::{MovieConfig, StoreBackend};
use crate::handlers;
use crate::services::providers::openai::{OpenAiConfig, OpenAiProvider};
use crate::services::providers::CompletionProvider;
use crate::services::{InMemoryMovieStore, MongoMovieStore, MovieCatalog, MovieStore};
use axum::{
    http::Request,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::any::Any;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. Everything in here is built once at startup and
/// only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub catalog: MovieCatalog,
}

impl AppState {
    pub fn new(store: Arc<dyn MovieStore>, completions: Arc<dyn CompletionProvider>) -> Self {
        Self {
            catalog: MovieCatalog::new(store, completions),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/movies", get(handlers::list_movies))
        .route("/movies/year", get(handlers::list_movies_by_year))
        .route("/movies/year/:year", get(handlers::list_movies_by_year))
        .route("/movies/:movieTitle/summary", get(handlers::summarize_movie))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Last-resort boundary: a panicking handler still yields a JSON 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::InternalError(anyhow::anyhow!(detail)).into_response()
}

async fn build_store(config: &MovieConfig) -> Result<Arc<dyn MovieStore>, AppError> {
    match config.store.backend {
        StoreBackend::Mongo => {
            let store = MongoMovieStore::connect(
                &config.mongodb.uri,
                &config.mongodb.database,
                &config.mongodb.collection,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
            store.initialize_indexes().await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                e
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = match &config.store.seed_path {
                Some(path) => InMemoryMovieStore::from_json_file(path).await?,
                None => InMemoryMovieStore::default(),
            };
            tracing::info!(count = store.len(), "Using in-memory movie store");
            Ok(Arc::new(store))
        }
    }
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: MovieConfig) -> Result<Self, AppError> {
        let store = build_store(&config).await?;

        let provider = OpenAiProvider::new(OpenAiConfig {
            api_url: config.openai.api_url.clone(),
            api_key: config.openai.api_key.clone(),
            model: config.openai.model.clone(),
            max_tokens: config.openai.max_tokens,
        })
        .map_err(|e| {
            tracing::error!("Failed to initialize OpenAI provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;
        tracing::info!(
            model = %config.openai.model,
            max_tokens = config.openai.max_tokens,
            "Initialized OpenAI completion provider"
        );

        let app = build_router(AppState::new(store, Arc::new(provider)));

        // Port 0 binds a random port for tests
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Movie service listening on port {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
