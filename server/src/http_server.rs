use crate::config::ServiceConfig;
use crate::coordinator;
use crate::errors::{Result, ServerError};
use crate::port::find_available_port;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clara_core::{Answer, GeminiError, TextGenerator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const MISSING_QUESTION: &str = "O campo perguntaUsuario é obrigatório.";

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
    generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: ServiceConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }
}

/// Request model for `/consulta`
#[derive(Deserialize)]
pub struct QuestionRequest {
    #[serde(rename = "perguntaUsuario")]
    pergunta_usuario: Option<String>,
}

/// Body sent with client-input errors
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Error type for HTTP server
#[derive(Debug)]
pub enum ApiError {
    MissingQuestion,
    InternalError(GeminiError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingQuestion => {
                let body = Json(ErrorResponse {
                    error: MISSING_QUESTION.to_string(),
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            Self::InternalError(e) => {
                error!(error = %e, "Error in /consulta endpoint");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(Answer::internal_error())).into_response()
            }
        }
    }
}

/// Builds the router with every route and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/consulta", post(handle_consulta))
        .nest_service("/icons", ServeDir::new(state.config.icons_dir()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves the router on an already bound listener until the server stops
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, build_router(state))
        .await
        .map_err(ServerError::Serve)
}

/// Picks a free port starting at the configured one and runs the service
pub async fn run_server(config: ServiceConfig, generator: Arc<dyn TextGenerator>) -> Result<()> {
    let port = find_available_port(config.host, config.port, config.port_attempts)?;
    let listener = TcpListener::bind((config.host, port))
        .await
        .map_err(|source| ServerError::Bind { port, source })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { port, source })?;
    info!("Clara server is up and running at http://{}", local_addr);

    serve(listener, AppState::new(config, generator)).await
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Clara is running"
}

/// Handler for `POST /consulta`
async fn handle_consulta(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuestionRequest>, JsonRejection>,
) -> std::result::Result<Json<Answer>, ApiError> {
    info!("Received new request on /consulta...");

    let question = match payload {
        Ok(Json(request)) => request.pergunta_usuario.filter(|q| !q.is_empty()),
        Err(rejection) => {
            info!(reason = %rejection.body_text(), "Unreadable request body");
            None
        }
    };
    let Some(question) = question else {
        info!("Request rejected: no question provided.");
        return Err(ApiError::MissingQuestion);
    };

    info!(question = %question, "Question received");

    coordinator::process_question(state.generator.as_ref(), &question)
        .await
        .map(Json)
        .map_err(ApiError::InternalError)
}
