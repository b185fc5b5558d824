//! Project 3 responder crate.
//!
//! A small Axum service answering `GET /` with a welcome message taken from the
//! `WELCOME_MSG` environment variable and `GET /health` with a fixed liveness
//! status.

pub mod config;
pub mod error;
pub mod routes;
pub mod runtime;

pub use crate::config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use crate::error::{ResponderError, Result};
pub use crate::routes::{DEFAULT_WELCOME, HealthResponse, WELCOME_ENV, WelcomeResponse, router};
pub use crate::runtime::{ResponderRuntime, run, serve};
