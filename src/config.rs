//! Service configuration.
//!
//! All knobs live in one [`ServiceConfig`] built via its
//! [`ServiceConfigBuilder`], so every entry point (CLI, batch, HTTP) reads
//! the same defaults and a config can be logged or diffed as a unit.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration shared by the driving adapters.
///
/// Built via [`ServiceConfig::builder()`] or [`ServiceConfig::default()`].
///
/// # Example
/// ```rust
/// use mdpress::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .input_dir("content/drafts")
///     .max_file_size_bytes(2 * 1024 * 1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory scanned by batch and bulk conversion. Default: `data/input`.
    pub input_dir: PathBuf,

    /// Directory batch and bulk conversion write PDFs to. Default: `data/output`.
    pub output_dir: PathBuf,

    /// Root of the metadata archive; records land in
    /// `<archive_dir>/metadata/<date>.jsonl`. Default: `data/archive`.
    pub archive_dir: PathBuf,

    /// Per-file upload limit in bytes. Default: 10 MB.
    ///
    /// Applied to single and multi-file uploads alike; oversize single
    /// uploads are rejected with HTTP 413, oversize files in a multi-upload
    /// become in-band `skipped` entries.
    pub max_file_size_bytes: u64,

    /// Maximum files accepted by one multi-file upload. Default: 20.
    pub max_files_per_request: usize,

    /// Aggregate size limit for one multi-file upload. Default: 50 MB.
    pub max_total_size_bytes: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/input"),
            output_dir: PathBuf::from("data/output"),
            archive_dir: PathBuf::from("data/archive"),
            max_file_size_bytes: 10 * 1024 * 1024,
            max_files_per_request: 20,
            max_total_size_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.archive_dir = dir.into();
        self
    }

    pub fn max_file_size_bytes(mut self, n: u64) -> Self {
        self.config.max_file_size_bytes = n;
        self
    }

    pub fn max_files_per_request(mut self, n: usize) -> Self {
        self.config.max_files_per_request = n.max(1);
        self
    }

    pub fn max_total_size_bytes(mut self, n: u64) -> Self {
        self.config.max_total_size_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, ConvertError> {
        let c = &self.config;
        if c.max_file_size_bytes == 0 {
            return Err(ConvertError::InvalidConfig(
                "max_file_size_bytes must be positive".into(),
            ));
        }
        if c.max_total_size_bytes < c.max_file_size_bytes {
            return Err(ConvertError::InvalidConfig(format!(
                "max_total_size_bytes ({}) must be at least max_file_size_bytes ({})",
                c.max_total_size_bytes, c.max_file_size_bytes
            )));
        }
        Ok(self.config)
    }
}
