//! Debug dumps
//!
//! Optional side-channel that writes chain artifacts (rendered prompts,
//! output histories) to delimiter-separated text files for inspection.
//! Purely observational - the engine never reads these back.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::DumpConfig;
use crate::error::ChainError;
use crate::output::OutputEntry;

/// Separator written between consecutive records in a dump file
pub const DUMP_DELIMITER: &str = "\n\n----------------------------------------\n\n";

/// Anything that can be dumped as one record
pub trait DumpRecord {
    fn record(&self) -> String;
}

impl DumpRecord for OutputEntry {
    fn record(&self) -> String {
        self.render()
    }
}

impl DumpRecord for String {
    fn record(&self) -> String {
        self.clone()
    }
}

impl DumpRecord for &str {
    fn record(&self) -> String {
        (*self).to_string()
    }
}

/// Writes named record lists to text files under a configured directory
#[derive(Debug, Clone)]
pub struct DumpWriter {
    dir: PathBuf,
}

impl DumpWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build a writer from config, or `None` when dumping is disabled
    pub fn from_config(config: &DumpConfig) -> Option<Self> {
        if config.enabled {
            Some(Self::new(&config.dir))
        } else {
            None
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `records` to `<dir>/<key>.txt`, one record per entry separated
    /// by [`DUMP_DELIMITER`]
    ///
    /// The key is sanitized to a safe filename. Creates the directory if
    /// needed and overwrites any previous dump for the same key. Returns
    /// the path written.
    pub fn write<R: DumpRecord>(&self, key: &str, records: &[R]) -> Result<PathBuf, ChainError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.txt", sanitize_key(key)));
        let body = records.iter().map(DumpRecord::record).collect::<Vec<_>>().join(DUMP_DELIMITER);
        fs::write(&path, body)?;

        debug!(path = %path.display(), records = records.len(), "DumpWriter::write: dump written");
        Ok(path)
    }
}

/// Reduce a dump key to filename-safe characters
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}
