use std::fs::OpenOptions;
use std::io;
use std::str::FromStr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cfg::Cfg;
use crate::error::CfgError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = CfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(CfgError::InvalidValue(format!("log.format = {other:?}"))),
        }
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// `log.level`. Logs go to `log.path` (appended) when set, else to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn initialize_tracing_subscriber(cfg: &Cfg) -> Result<(), CfgError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_file(true)
        .with_target(false);

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cfg.log_level()))
        .map_err(|e| CfgError::InvalidValue(format!("log.level: {e}")))?;

    let trace_builder = tracing_subscriber::registry().with(filter_layer);

    // the fmt layer and writer change the subscriber type, hence one arm
    // per combination
    let format = cfg.log_format()?;
    let result = match cfg.log_path() {
        Some(path) => {
            let file = OpenOptions::new().append(true).create(true).open(path)?;
            match format {
                LogFormat::Compact => trace_builder
                    .with(fmt_layer.compact().with_writer(file))
                    .try_init(),
                LogFormat::Json => trace_builder
                    .with(fmt_layer.json().with_writer(file))
                    .try_init(),
            }
        }
        None => match format {
            LogFormat::Compact => trace_builder
                .with(fmt_layer.compact().with_writer(io::stderr))
                .try_init(),
            LogFormat::Json => trace_builder
                .with(fmt_layer.json().with_writer(io::stderr))
                .try_init(),
        },
    };
    result.map_err(|e| CfgError::Subscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!(matches!(
            "yaml".parse::<LogFormat>(),
            Err(CfgError::InvalidValue(_))
        ));
    }
}
