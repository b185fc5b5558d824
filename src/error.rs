use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ResponderError>;

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
