//! TOML configuration file support.
//!
//! ```toml
//! # ~/.config/cbiohub/config.toml
//! [paths]
//! processed_path = "~/cbiohub"
//!
//! [combine]
//! compression_level = 9
//! row_group_size = 100000
//! ```
//!
//! The processed root resolves as `--processed-path` flag, then the
//! `CBIOHUB_PROCESSED_PATH` environment variable, then `paths.processed_path`,
//! then `~/cbiohub`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use cbiohub::config::{StorePaths, PROCESSED_PATH_ENV};
use cbiohub::store::{CompressionType, StoreWriterConfig};

use super::Profile;

/// Root configuration structure for config.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Storage locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Parquet settings for ingest and combine.
    #[serde(default)]
    pub combine: CombineConfig,
}

/// Storage locations.
#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    /// Root of the processed data directory.
    pub processed_path: Option<PathBuf>,
}

/// Parquet settings for the written tables.
#[derive(Debug, Default, Deserialize)]
pub struct CombineConfig {
    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Number of rows per Parquet row group.
    pub row_group_size: Option<usize>,
}

impl Config {
    /// Default config file location (`<config_dir>/cbiohub/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cbiohub").join("config.toml"))
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Resolve the store layout; `flag` already carries the environment override.
    pub fn store_paths(&self, flag: Option<&Path>) -> StorePaths {
        match flag.or(self.paths.processed_path.as_deref()) {
            Some(root) => StorePaths::new(root),
            None => StorePaths::default(),
        }
    }

    /// Writer configuration: profile defaults with file overrides applied.
    pub fn writer_config(&self, profile: Profile) -> StoreWriterConfig {
        let mut config = profile.writer_config();
        if let Some(level) = self.combine.compression_level {
            config.compression = CompressionType::Zstd(level);
        }
        if let Some(size) = self.combine.row_group_size {
            config.row_group_size = size;
        }
        log::info!(
            "Write profile {}: {:?} compression, {} rows per row group",
            profile,
            config.compression,
            config.row_group_size
        );
        config
    }
}

/// Print the effective configuration.
pub fn show(config: &Config, paths: &StorePaths, config_path: Option<&Path>) -> Result<()> {
    println!("Current Configuration:");
    let source = config_path
        .map(Path::to_path_buf)
        .or_else(Config::default_path)
        .filter(|p| p.is_file());
    match source {
        Some(path) => println!("Config File: {}", path.display()),
        None => println!("Config File: <none>"),
    }
    println!("Processed Path: {}", paths.processed_root().display());
    println!("  Studies: {}", paths.studies_dir().display());
    println!("  Combined: {}", paths.combined_dir().display());
    if let Ok(value) = std::env::var(PROCESSED_PATH_ENV) {
        println!("  ({} = {})", PROCESSED_PATH_ENV, value);
    }
    let writer = config.writer_config(Profile::default());
    println!("Compression: {:?}", writer.compression);
    println!("Row Group Size: {}", writer.row_group_size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [paths]
            processed_path = "/data/cbiohub"

            [combine]
            compression_level = 15
            row_group_size = 200000
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.paths.processed_path,
            Some(PathBuf::from("/data/cbiohub"))
        );
        assert_eq!(config.combine.compression_level, Some(15));
        assert_eq!(config.combine.row_group_size, Some(200_000));

        let writer = config.writer_config(Profile::Fast);
        assert_eq!(writer.compression, CompressionType::Zstd(15));
        assert_eq!(writer.row_group_size, 200_000);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.paths.processed_path, None);
        assert_eq!(config.combine.compression_level, None);
    }

    #[test]
    fn test_path_resolution_order() {
        let config = Config::from_str("[paths]\nprocessed_path = \"/from/file\"").unwrap();
        assert_eq!(
            config.store_paths(Some(Path::new("/from/flag"))).processed_root(),
            Path::new("/from/flag")
        );
        assert_eq!(
            config.store_paths(None).processed_root(),
            Path::new("/from/file")
        );
        assert_eq!(
            Config::default().store_paths(None),
            StorePaths::default()
        );
    }
}
