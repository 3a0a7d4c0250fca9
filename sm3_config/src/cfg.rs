use std::path::{Path, PathBuf};

use merkletree::{BuildOptions, DEFAULT_MIN_PARALLEL_LEAVES};
use serde::{Deserialize, Serialize};
use sm3hash::{CompressionStrategy, Sm3Engine};
use tracing::debug;

use crate::error::CfgError;
use crate::log::LogFormat;

pub const CURRENT_VERSION: u8 = 1;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings for the SM3 engine, Merkle tree building and logging.
///
/// All fields are optional so that a layer can leave a setting to the layers
/// below it. [Cfg::with_default_values] provides the bottom layer; the plain
/// `Default` leaves everything unset.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Cfg {
    pub version: u8,
    pub engine: Option<Engine>,
    pub merkle: Option<Merkle>,
    pub log: Option<Log>,
}

impl Cfg {
    /// Will construct a new Cfg with semantically default values.
    pub fn with_default_values() -> Self {
        Self {
            version: CURRENT_VERSION,
            engine: Some(Engine {
                strategy: Some(CompressionStrategy::default().name().to_string()),
            }),
            merkle: Some(Merkle {
                parallel: Some(true),
                minleaves: Some(DEFAULT_MIN_PARALLEL_LEAVES as u64),
            }),
            log: Some(Log {
                path: None,
                level: Some(DEFAULT_LOG_LEVEL.to_string()),
                format: None,
            }),
        }
    }

    /// The engine selected by `engine.strategy`, or the default engine when
    /// unset.
    pub fn engine(&self) -> Result<Sm3Engine, CfgError> {
        match self.engine.as_ref().and_then(|e| e.strategy.as_deref()) {
            Some(name) => Sm3Engine::from_name(name)
                .map_err(|_| CfgError::InvalidValue(format!("engine.strategy = {name:?}"))),
            None => Ok(Sm3Engine::default()),
        }
    }

    pub fn build_options(&self) -> Result<BuildOptions, CfgError> {
        let mut options = BuildOptions::default();
        if let Some(merkle) = self.merkle.as_ref() {
            if let Some(parallel) = merkle.parallel {
                options.parallel = parallel;
            }
            if let Some(minleaves) = merkle.minleaves {
                options.min_parallel_leaves = usize::try_from(minleaves)
                    .map_err(|_| CfgError::InvalidValue(format!("merkle.minleaves = {minleaves}")))?;
            }
        }
        Ok(options)
    }

    pub fn log_level(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_format(&self) -> Result<LogFormat, CfgError> {
        match self.log.as_ref().and_then(|l| l.format.as_deref()) {
            Some(format) => format.parse(),
            None => Ok(LogFormat::default()),
        }
    }

    /// Log file, or None to log to stderr. An empty path also means stderr.
    pub fn log_path(&self) -> Option<&Path> {
        self.log
            .as_ref()
            .and_then(|l| l.path.as_deref())
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Loads a config from a file
    pub fn from_file(path: &Path) -> Result<Cfg, CfgError> {
        let settings = config::Config::builder().add_source(
            config::File::from(path)
                .required(true)
                .format(config::FileFormat::Toml),
        );
        let config = settings.build()?;
        debug!("Config read from {path:?}");
        Ok(config.try_deserialize()?)
    }

    /// Writes a config to a file
    pub fn to_file(&self, path: &Path) -> Result<(), CfgError> {
        let data = toml::to_string(self)?;
        if let Some(parent_dir) = path.parent() {
            std::fs::create_dir_all(parent_dir)?;
        }

        std::fs::write(path, data)?;
        Ok(())
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            engine: None,
            merkle: None,
            log: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Engine {
    /// One of `reference`, `ring_buffer`, `lanes` or `unrolled`.
    pub strategy: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Merkle {
    pub parallel: Option<bool>,
    /// Smallest level hashed on the thread pool.
    /// minleaves instead of min_parallel_leaves here because the environment
    /// source splits keys on every underscore.
    pub minleaves: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Log {
    pub path: Option<PathBuf>,
    pub level: Option<String>,
    /// Format of the log messages. Options are: `json` or `compact`. Default is `compact`
    pub format: Option<String>,
}

#[cfg(test)]
mod serialization_tests {
    use super::*;

    #[test]
    fn test_serialization_empty() {
        let cfg = Cfg::default();
        assert_eq!(cfg.version, CURRENT_VERSION);
        assert!(cfg.engine.is_none());
        assert!(cfg.merkle.is_none());
        assert!(cfg.log.is_none());

        let string = toml::to_string(&cfg).unwrap();
        assert_eq!(format!("version = {}\n", CURRENT_VERSION), string)
    }

    #[test]
    fn test_deserialization_partial() {
        let cfg: Cfg = toml::from_str("[engine]\nstrategy = \"lanes\"\n").unwrap();
        assert_eq!(cfg.version, CURRENT_VERSION);
        assert_eq!(cfg.engine().unwrap().strategy(), CompressionStrategy::Lanes);
        assert!(cfg.merkle.is_none());
        assert_eq!(cfg.build_options().unwrap(), BuildOptions::default());
    }

    #[test]
    fn test_serde_default() {
        let cfg = Cfg::with_default_values();
        let data = toml::to_string(&cfg).unwrap();
        let cfg_deser: Cfg = toml::from_str(&data).unwrap();
        assert_eq!(cfg, cfg_deser);
    }

    #[test]
    fn test_default_values() {
        let cfg = Cfg::with_default_values();
        assert_eq!(cfg.engine().unwrap(), Sm3Engine::default());
        assert_eq!(cfg.build_options().unwrap(), BuildOptions::default());
        assert_eq!(cfg.log_level(), DEFAULT_LOG_LEVEL);
        assert_eq!(cfg.log_format().unwrap(), LogFormat::Compact);
        assert!(cfg.log_path().is_none());
    }

    #[test]
    fn test_unknown_strategy() {
        let cfg = Cfg {
            engine: Some(Engine {
                strategy: Some("avx512".to_string()),
            }),
            ..Default::default()
        };
        assert!(matches!(cfg.engine(), Err(CfgError::InvalidValue(_))));
    }

    #[test]
    fn test_build_options() {
        let cfg = Cfg {
            merkle: Some(Merkle {
                parallel: Some(false),
                minleaves: Some(16),
            }),
            ..Default::default()
        };
        let options = cfg.build_options().unwrap();
        assert!(!options.parallel);
        assert_eq!(options.min_parallel_leaves, 16);
    }

    #[test]
    fn test_empty_log_path_is_stderr() {
        let cfg = Cfg {
            log: Some(Log {
                path: Some(PathBuf::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(cfg.log_path().is_none());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sm3.toml");
        let cfg = Cfg {
            engine: Some(Engine {
                strategy: Some("ring_buffer".to_string()),
            }),
            log: Some(Log {
                level: Some("debug".to_string()),
                format: Some("json".to_string()),
                path: None,
            }),
            ..Default::default()
        };
        cfg.to_file(&path).unwrap();
        assert_eq!(Cfg::from_file(&path).unwrap(), cfg);
        assert!(Cfg::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
