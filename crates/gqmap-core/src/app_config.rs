use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML file overriding the built-in data-source variants.
    pub variants_path: Option<PathBuf>,
    /// Slug of the variant loaded when a command does not name one.
    pub default_variant: String,
    /// Mapbox access token; location search is disabled without it.
    pub mapbox_token: Option<String>,
    pub geocode_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub fallback_lat: f64,
    pub fallback_lng: f64,
    pub min_zoom: f64,
    pub nearest_limit: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("variants_path", &self.variants_path)
            .field("default_variant", &self.default_variant)
            .field(
                "mapbox_token",
                &self.mapbox_token.as_ref().map(|_| "[redacted]"),
            )
            .field("geocode_base_url", &self.geocode_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fallback_lat", &self.fallback_lat)
            .field("fallback_lng", &self.fallback_lng)
            .field("min_zoom", &self.min_zoom)
            .field("nearest_limit", &self.nearest_limit)
            .finish()
    }
}
