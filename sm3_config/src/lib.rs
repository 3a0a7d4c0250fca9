#![cfg_attr(feature = "strict", deny(warnings))]

mod cfg;
mod error;
mod loader;
mod log;

pub use cfg::{Cfg, Engine, Log, Merkle, CURRENT_VERSION, DEFAULT_LOG_LEVEL};
pub use error::CfgError;
pub use loader::{ConfigLoader, Level};
pub use log::{initialize_tracing_subscriber, LogFormat};
