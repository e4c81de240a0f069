pub mod app_config;
pub mod config;
pub mod variants;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use variants::{builtin_variants, load_variants, resolve_variants, VariantConfig, VariantsFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read variants file {path}: {source}")]
    VariantsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse variants file: {0}")]
    VariantsFileParse(#[source] serde_yaml::Error),

    #[error("variants validation failed: {0}")]
    Validation(String),

    #[error("unknown variant '{0}'")]
    UnknownVariant(String),
}
