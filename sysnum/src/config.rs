use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use sysnum_core::Arch;

/// Read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "sysnum.toml";

#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    /// `<number> <name>` lines
    #[default]
    Table,
    /// C header with `__NR_*` defines
    Header,
    /// YAML list of entries
    Yaml,
}

/// Logger configuration. `RUST_LOG` still overrides it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    pub level_filter: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::Warn,
        }
    }
}

impl LoggerConfig {
    pub fn init(&self) {
        env_logger::Builder::new()
            .filter_level(self.level_filter)
            .parse_env("RUST_LOG")
            .init();
    }
}

/// Main configuration of the tool.
/// Please use [`AppConfigBuilder`] if you want to build it from code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Table to use when `--arch` is not given. The host table if unset.
    pub arch: Option<Arch>,
    /// Format of `dump` when `--format` is not given.
    pub format: DumpFormat,
    pub logger: LoggerConfig,
}

impl AppConfig {
    /// Reads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str =
            std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
        Self::from_toml(&config_str).with_context(|| format!("parse {:?}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }
}

/// `AppConfigBuilder` is a convenience builder to create an `AppConfig` from code.
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Create a new builder from the defaults
    pub fn new() -> Self {
        Self {
            config: Default::default(),
        }
    }

    /// Start from an existing configuration, e.g. one read from a file
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_arch(mut self, arch: Arch) -> Self {
        self.config.arch = Some(arch);
        self
    }

    pub fn with_format(mut self, format: DumpFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Sets the logger configuration for the application
    pub fn with_logger_config(mut self, logger_config: LoggerConfig) -> Self {
        self.config.logger = logger_config;
        self
    }

    /// Retrieves the configuration built
    pub fn get(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.arch, None);
        assert_eq!(config.format, DumpFormat::Table);
        assert_eq!(config.logger.level_filter, LevelFilter::Warn);
    }

    #[test]
    fn full_file() {
        let config = AppConfig::from_toml(
            r#"
            arch = "amd64"
            format = "header"

            [logger]
            level_filter = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.arch, Some(Arch::X86_64));
        assert_eq!(config.format, DumpFormat::Header);
        assert_eq!(config.logger.level_filter, LevelFilter::Debug);
    }

    #[test]
    fn unknown_arch_is_an_error() {
        assert!(AppConfig::from_toml(r#"arch = "aarch64""#).is_err());
    }

    #[test]
    fn builder_overrides() {
        let config = AppConfigBuilder::from_config(AppConfig::default())
            .with_arch(Arch::X86_64)
            .with_format(DumpFormat::Yaml)
            .with_logger_config(LoggerConfig {
                level_filter: LevelFilter::Off,
            })
            .get();

        assert_eq!(config.arch, Some(Arch::X86_64));
        assert_eq!(config.format, DumpFormat::Yaml);
        assert_eq!(config.logger.level_filter, LevelFilter::Off);
        assert_eq!(AppConfigBuilder::new().get(), AppConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::read("/nonexistent/sysnum.toml").is_err());
    }
}
