use crate::auth::jwt::JwtConfig;

/// Which engine backend the gateway talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMode {
    /// Remote engine reached over HTTP.
    Remote,
    /// In-process stand-in, for local development only.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Engine backend selection.
    pub engine_mode: EngineMode,
    /// Engine API root, required when `engine_mode` is `Remote`.
    pub engine_url: String,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                   |
    /// |------------------------|---------------------------|
    /// | `HOST`                 | `0.0.0.0`                 |
    /// | `PORT`                 | `3000`                    |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                      |
    /// | `ENGINE_MODE`          | `remote`                  |
    /// | `ENGINE_URL`           | `http://localhost:8080/api/v1` |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values and on an unknown `ENGINE_MODE` --
    /// misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let engine_mode = match std::env::var("ENGINE_MODE")
            .unwrap_or_else(|_| "remote".into())
            .as_str()
        {
            "remote" => EngineMode::Remote,
            "memory" => EngineMode::Memory,
            other => panic!("ENGINE_MODE must be 'remote' or 'memory', got '{other}'"),
        };

        let engine_url = std::env::var("ENGINE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api/v1".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            engine_mode,
            engine_url,
            jwt,
        }
    }
}
