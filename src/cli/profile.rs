//! Write profiles for ingest and combine.
//!
//! Profiles provide sensible defaults for compression and row group sizing,
//! hiding low-level Parquet settings from end users.

use std::fmt;

use cbiohub::store::{CompressionType, StoreWriterConfig};

/// Write profiles for common use cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Prioritize speed over compression.
    ///
    /// - Compression: Snappy
    /// - Row group size: 50,000 rows
    Fast,

    /// Balance between speed and compression (default).
    ///
    /// - Compression: ZSTD level 9
    /// - Row group size: 100,000 rows
    #[default]
    Balanced,

    /// Maximum compression, slower writes.
    ///
    /// - Compression: ZSTD level 19
    /// - Row group size: 250,000 rows
    MaxCompression,
}

impl Profile {
    /// Returns the compression for this profile.
    pub fn compression(&self) -> CompressionType {
        match self {
            Profile::Fast => CompressionType::Snappy,
            Profile::Balanced => CompressionType::Zstd(9),
            Profile::MaxCompression => CompressionType::Zstd(19),
        }
    }

    /// Returns the number of rows per row group for this profile.
    pub fn row_group_size(&self) -> usize {
        match self {
            Profile::Fast => 50_000,
            Profile::Balanced => 100_000,
            Profile::MaxCompression => 250_000,
        }
    }

    /// Build a writer configuration from this profile.
    pub fn writer_config(&self) -> StoreWriterConfig {
        match self {
            Profile::Fast => StoreWriterConfig::fast_write(),
            _ => StoreWriterConfig {
                compression: self.compression(),
                row_group_size: self.row_group_size(),
                ..StoreWriterConfig::default()
            },
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Fast => write!(f, "fast"),
            Profile::Balanced => write!(f, "balanced"),
            Profile::MaxCompression => write!(f, "max-compression"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_display() {
        assert_eq!(Profile::Fast.to_string(), "fast");
        assert_eq!(Profile::default().to_string(), "balanced");
        assert_eq!(Profile::MaxCompression.to_string(), "max-compression");
    }

    #[test]
    fn test_writer_config() {
        let config = Profile::MaxCompression.writer_config();
        assert_eq!(config.compression, CompressionType::Zstd(19));
        assert_eq!(config.row_group_size, 250_000);
        assert_eq!(
            Profile::Fast.writer_config().compression,
            CompressionType::Snappy
        );
    }
}
