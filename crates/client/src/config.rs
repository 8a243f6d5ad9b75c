//! Client configuration.

/// Base URL used when `API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_ENV must be 'development' or 'production', got '{0}'")]
    UnknownEnvironment(String),
}

/// Where the client talks to and in which mode it runs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the HTTP API, without a trailing slash.
    pub api_base_url: String,
    pub environment: Environment,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            environment: Environment::Development,
        }
    }
}

impl ClientConfig {
    /// Point at `api_base_url` in development mode.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_base_url(api_base_url.into()),
            environment: Environment::Development,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var        | Default                       |
    /// |----------------|-------------------------------|
    /// | `API_BASE_URL` | `http://127.0.0.1:8000/api`   |
    /// | `APP_ENV`      | `development`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            None | Some("") | Some("development") | Some("dev") => Environment::Development,
            Some("production") | Some("prod") => Environment::Production,
            Some(other) => return Err(ConfigError::UnknownEnvironment(other.to_string())),
        };

        Ok(Self {
            api_base_url: trim_base_url(api_base_url),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
