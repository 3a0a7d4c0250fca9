use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Value, ValueKind};
use tracing::debug;

use crate::cfg::Cfg;
use crate::error::CfgError;

const ENV_ROOT: &str = "SM3";
const ENV_SEPARATOR: &str = "_";

/// Level of configuration. The order of priority (overriding) is:
/// ENV > FILE > DEFAULT.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub enum Level {
    DEFAULT,
    FILE,
    ENV,
}

/// A sorted array of levels in order of increasing priority.
pub const LEVELS: [Level; 3] = [Level::DEFAULT, Level::FILE, Level::ENV];

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Resolves a [Cfg] from the built-in defaults, an optional TOML file and
/// `SM3_*` environment variables (`SM3_ENGINE_STRATEGY=unrolled` sets
/// `engine.strategy`).
pub struct ConfigLoader {
    file_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self { file_path }
    }

    /// Loads configuration from the indicated level only.
    pub fn load_config(&self, level: Level) -> Result<Cfg, CfgError> {
        let settings = self.add_config(Config::builder(), level)?;
        let config = settings.build()?;
        debug!("Config built: {config:?}");
        Ok(config.try_deserialize()?)
    }

    /// Similar to `load_config`, however this will also read in any
    /// lower-priority levels, merging them into the final config returned.
    pub fn resolve_config(&self, level: Level) -> Result<Cfg, CfgError> {
        let mut settings = Config::builder();
        for l in LEVELS.into_iter().filter(|l| *l <= level) {
            settings = self.add_config(settings, l)?;
        }
        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Resolves every level.
    pub fn resolve(&self) -> Result<Cfg, CfgError> {
        self.resolve_config(Level::ENV)
    }

    /// Searches all levels up to `level` for `key` (e.g. `log.level`).
    ///
    /// Returns Ok(None) when the key is not set anywhere.
    pub fn resolve_value(&self, level: Level, key: &str) -> Result<Option<String>, CfgError> {
        let mut settings = Config::builder();
        for l in LEVELS.into_iter().filter(|l| *l <= level) {
            settings = self.add_config(settings, l)?;
        }
        let config = settings.build()?;
        Self::get_value(&config, key)
    }

    // unlike `config.get(key)` this returns None if the key doesn't exist, so
    // the caller can tell an unset setting from a malformed key.
    fn get_value(config: &Config, key: &str) -> Result<Option<String>, CfgError> {
        let val = config
            .get::<Value>(key)
            .or_else(|e| match e {
                ConfigError::NotFound(_) => Ok(Value::new(None, ValueKind::Nil)),
                _ => Err(e),
            })
            .map(|v| {
                if v.kind == ValueKind::Nil {
                    None
                } else {
                    Some(v.to_string())
                }
            })?;
        Ok(val)
    }

    fn add_config(
        &self,
        settings: ConfigBuilder<DefaultState>,
        level: Level,
    ) -> Result<ConfigBuilder<DefaultState>, CfgError> {
        Ok(match level {
            Level::ENV => settings.add_source(
                Environment::with_prefix(ENV_ROOT)
                    .separator(ENV_SEPARATOR)
                    .prefix_separator(ENV_SEPARATOR),
            ),
            Level::FILE => match self.file_path.as_ref() {
                Some(path) => settings.add_source(
                    File::from(path.clone())
                        .required(false)
                        .format(FileFormat::Toml),
                ),
                None => settings,
            },
            Level::DEFAULT => settings.add_source(get_default_config()?),
        })
    }
}

fn get_default_config() -> Result<Config, CfgError> {
    Ok(Config::try_from(&Cfg::with_default_values())?)
}
