pub mod app_config;
pub mod config;
pub mod engagement;
pub mod platform;
pub mod posts;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use engagement::{engagement_rate, mean_rate};
pub use platform::{EngagementFormula, ExistingPostPolicy, MediaType, Platform, PostStatus};
pub use posts::{AccountSnapshot, MetricsSnapshot, NormalizedPost};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown media type: {0}")]
    UnknownMediaType(String),
}
