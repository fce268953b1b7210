use std::fmt;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str =
    "https://auth.opensky-network.org/auth/realms/opensky-network/protocol/openid-connect/token";
pub const DEFAULT_API_URL: &str = "https://opensky-network.org/api";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// The only origin allowed by CORS.
    /// Set via SKYPROXY_FRONTEND_ORIGIN env var. Default: http://localhost:5173.
    pub frontend_origin: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// OAuth2 token endpoint (client-credentials grant).
    pub auth_url: String,
    /// Base URL of the OpenSky REST API, without trailing slash.
    pub api_url: String,
    /// Applied to every upstream request, including authentication.
    pub upstream_timeout: Duration,
    /// Emit logs as JSON instead of human-readable text.
    pub json_logs: bool,
}

impl Config {
    /// Returns both credentials, or `None` if either one is missing.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }

    /// Builds a config from an arbitrary variable lookup.
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            port: lookup("SKYPROXY_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            frontend_origin: non_empty("SKYPROXY_FRONTEND_ORIGIN")
                .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.into()),
            client_id: non_empty("OPENSKY_CLIENT_ID"),
            client_secret: non_empty("OPENSKY_CLIENT_SECRET"),
            auth_url: non_empty("OPENSKY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into()),
            api_url: non_empty("OPENSKY_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            upstream_timeout: Duration::from_secs(
                lookup("SKYPROXY_UPSTREAM_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            json_logs: lookup("SKYPROXY_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_lookup(|_| None)
    }
}

// Never print the secret, even at debug level.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("frontend_origin", &self.frontend_origin)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "****"))
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let config = Config::from_lookup(|key| std::env::var(key).ok());

    if config.credentials().is_none() {
        let env_mode = std::env::var("SKYPROXY_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "OPENSKY_CLIENT_ID and OPENSKY_CLIENT_SECRET must both be set in production"
            );
        }
        eprintln!(
            "⚠️  OPENSKY_CLIENT_ID / OPENSKY_CLIENT_SECRET not set; flight endpoints will report auth_error."
        );
    }

    Ok(config)
}
