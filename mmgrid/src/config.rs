//! Storage configuration for persistent grids

use std::path::{Path, PathBuf};

/// Environment variable overriding the scratch directory
pub const SCRATCH_DIR_ENV: &str = "MMGRID_SCRATCH_DIR";

/// Configuration for creating backing files
///
/// Every file a persistent grid creates (on construction, on growth beyond
/// capacity, on deep copy) lands in `scratch_dir` under a generated unique
/// name of the form `{file_prefix}XXXXXX{file_suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageConfig {
    /// Directory that receives new backing files
    pub scratch_dir: PathBuf,
    /// Prefix of generated file names
    pub file_prefix: String,
    /// Suffix of generated file names
    pub file_suffix: String,
    /// Cell count at which fills and copies run on the rayon pool
    pub parallel_fill_threshold: usize,
}

impl StorageConfig {
    /// Create config writing into `scratch_dir`
    pub fn with_scratch_dir<P: AsRef<Path>>(scratch_dir: P) -> Self {
        Self {
            scratch_dir: scratch_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Default config, with the scratch directory taken from
    /// `MMGRID_SCRATCH_DIR` when set
    pub fn from_env() -> Self {
        match std::env::var_os(SCRATCH_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::with_scratch_dir(dir),
            _ => Self::default(),
        }
    }

    /// Set the file name prefix
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Set the file name suffix
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Set the parallel fill threshold in cells
    pub fn with_parallel_fill_threshold(mut self, cells: usize) -> Self {
        self.parallel_fill_threshold = cells;
        self
    }

    /// Whether a fill or copy of `cells` cells should run in parallel
    pub fn parallel_for(&self, cells: usize) -> bool {
        cells >= self.parallel_fill_threshold
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            file_prefix: "mmgrid-".to_string(),
            file_suffix: ".grid".to_string(),
            parallel_fill_threshold: 1 << 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = StorageConfig::with_scratch_dir("/tmp/grids")
            .with_prefix("t-")
            .with_suffix(".bin")
            .with_parallel_fill_threshold(10);

        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/grids"));
        assert_eq!(config.file_prefix, "t-");
        assert_eq!(config.file_suffix, ".bin");
        assert!(config.parallel_for(10));
        assert!(!config.parallel_for(9));
    }

    #[test]
    fn test_default_uses_temp_dir() {
        let config = StorageConfig::default();
        assert_eq!(config.scratch_dir, std::env::temp_dir());
        assert_eq!(config.file_prefix, "mmgrid-");
    }
}
