use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ErrorResponse, HealthResponse, SchemeInfo, SchemeResult, TokenizeRequest, TokenizeResponse};
use crate::app::Result;
use crate::core::{annotate, Dispatcher, PastelPalette, Scheme, SchemeError};
use crate::middleware::{allowed_hosts_middleware, AllowedHosts};
use crate::rng::request_rng;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No text provided")]
    EmptyText,
    #[error("{0}")]
    Internal(String),
}

impl From<SchemeError> for ApiError {
    fn from(err: SchemeError) -> Self {
        match err {
            SchemeError::EmptyText => ApiError::EmptyText,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::EmptyText => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub palette: PastelPalette,
    pub allowed_hosts: AllowedHosts,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            palette: PastelPalette::default(),
            allowed_hosts: AllowedHosts::default(),
        }
    }

    pub fn allowed_hosts(mut self, hosts: Vec<String>) -> Self {
        self.allowed_hosts = AllowedHosts::new(hosts);
        self
    }
}

pub struct Server {
    host: String,
    port: u16,
    router: Router,
}

impl Server {
    pub fn new() -> Self {
        Self {
            host: crate::envconfig::DEFAULT_HOST.to_string(),
            port: crate::envconfig::DEFAULT_PORT,
            router: Router::new(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn routes(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/tokenize", post(tokenize))
        .route("/api/tokenize", post(tokenize))
        .route("/api/schemes", get(list_schemes))
        .route("/api/health", get(health))
        .layer(axum::middleware::from_fn_with_state(
            state.allowed_hosts.clone(),
            allowed_hosts_middleware,
        ))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn tokenize(
    State(state): State<AppState>,
    Json(req): Json<TokenizeRequest>,
) -> std::result::Result<Json<TokenizeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        "tokenize {}: {} chars, {} schemes",
        request_id,
        req.text.chars().count(),
        req.schemes.len()
    );

    let outcomes = state.dispatcher.tokenize_all(&req.text, &req.schemes).await?;

    let mut rng = request_rng(req.seed);
    let results = outcomes
        .into_iter()
        .map(|mut outcome| {
            let tokens = annotate(std::mem::take(&mut outcome.tokens), &state.palette, &mut rng);
            tracing::debug!(
                "tokenize {}: {} produced {} tokens ({:?})",
                request_id,
                outcome.scheme,
                tokens.len(),
                outcome.status
            );
            SchemeResult::from_outcome(outcome, tokens)
        })
        .collect();

    Ok(Json(TokenizeResponse { results }))
}

async fn list_schemes() -> Json<Vec<SchemeInfo>> {
    Json(Scheme::ALL.into_iter().map(SchemeInfo::from).collect())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
