use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use dotenvy::Error as DotenvError;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const PORT_ENV: &str = "PORT";
const HOST_ENV: &str = "HOST";

/// Configuration consumed by the responder before spinning up Axum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Loads configuration from `HOST` and `PORT`.
    ///
    /// Values from a local `.env` file (parsed via [`dotenvy::dotenv_override`]) override whatever is already set in
    /// the process environment. `WELCOME_MSG` set there is picked up by the `/` handler as well, since it reads the
    /// environment on every request.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_overrides()?;
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self, ConfigError> {
        let port = resolve_port();

        let addr = match env::var(HOST_ENV) {
            Ok(value) => value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(value))?,
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        Ok(Self {
            bind_addr: SocketAddr::new(addr, port),
        })
    }

    /// Returns a builder for programmatic overrides.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl Default for ServerConfig {
    /// Binds to `0.0.0.0:8000`.
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
        }
    }
}

/// Builder type for [`ServerConfig`].
#[derive(Default, Clone, Debug)]
pub struct ServerConfigBuilder {
    bind_addr: Option<SocketAddr>,
}

impl ServerConfigBuilder {
    /// Sets the address for the Axum listener.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self
                .bind_addr
                .unwrap_or_else(|| ServerConfig::default().bind_addr),
        }
    }
}

/// Errors that can occur while building [`ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen host: {0}")]
    InvalidHost(String),
    #[error("failed to load .env overrides: {0}")]
    Dotenv(#[from] DotenvError),
}

fn load_env_overrides() -> Result<(), ConfigError> {
    match dotenvy::dotenv_override() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err)),
    }
}

fn resolve_port() -> u16 {
    env::var(PORT_ENV)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serializes tests that touch the process environment.
    pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_env() {
        unsafe {
            std::env::remove_var(PORT_ENV);
            std::env::remove_var(HOST_ENV);
        }
    }

    #[test]
    fn builder_overrides_defaults() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8)), 9999);
        let config = ServerConfig::builder().bind_addr(addr).build();
        assert_eq!(config.bind_addr, addr);

        assert_eq!(ServerConfig::builder().build(), ServerConfig::default());
    }

    #[test]
    fn defaults_without_env() {
        let _guard = env_lock();
        clear_env();

        let config = ServerConfig::from_process_env().expect("config");
        assert_eq!(
            config.bind_addr,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000)
        );
    }

    #[test]
    fn reads_env_configuration() {
        let _guard = env_lock();
        unsafe {
            std::env::set_var(PORT_ENV, "9000");
            std::env::set_var(HOST_ENV, "127.0.0.2");
        }

        let config = ServerConfig::from_process_env().expect("config");
        assert_eq!(
            config.bind_addr,
            SocketAddr::new("127.0.0.2".parse().unwrap(), 9000)
        );

        clear_env();
    }

    #[test]
    fn bad_port_falls_back_and_bad_host_errors() {
        let _guard = env_lock();
        unsafe {
            std::env::set_var(PORT_ENV, "not-a-port");
        }
        let config = ServerConfig::from_process_env().expect("config");
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);

        unsafe {
            std::env::set_var(HOST_ENV, "nowhere");
        }
        let err = ServerConfig::from_process_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost(host) if host == "nowhere"));

        clear_env();
    }
}
