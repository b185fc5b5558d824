use std::env;

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};

/// Environment variable holding the greeting served from `/`.
pub const WELCOME_ENV: &str = "WELCOME_MSG";
/// Greeting served when [`WELCOME_ENV`] is unset.
pub const DEFAULT_WELCOME: &str = "Hello from Project 3 FastAPI!";

/// Body of `GET /`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Builds the responder router with its two routes.
pub fn router() -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
}

/// Reads the greeting from the environment, falling back to [`DEFAULT_WELCOME`].
pub fn welcome_message() -> String {
    env::var(WELCOME_ENV).unwrap_or_else(|_| DEFAULT_WELCOME.to_owned())
}

async fn welcome() -> Json<WelcomeResponse> {
    let message = welcome_message();
    tracing::debug!(%message, "serving welcome");
    Json(WelcomeResponse { message })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}
