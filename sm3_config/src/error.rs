use config::ConfigError;
use std::io;
use thiserror::Error;
use toml::ser;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CfgError {
    #[error("Config parsing error: {0}")]
    ConfigParse(#[from] ConfigError),

    #[error("Cannot use provided value: {0}")]
    InvalidValue(String),

    #[error("Couldn't serialize config due to: {0}")]
    Serialization(#[from] ser::Error),

    #[error("Issue with disk: {0}")]
    IO(#[from] io::Error),

    #[error("Unable to install log subscriber: {0}")]
    Subscriber(String),
}
