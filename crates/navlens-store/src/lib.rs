//! # Navlens Store
//!
//! Durable per-fund NAV cache.
//!
//! ## Layout
//!
//! One pair of files per fund code under the cache directory:
//!
//! | File | Content |
//! |------|---------|
//! | `{code}.csv` | NAV rows, header `date,nav,acc_nav` |
//! | `{code}_meta.json` | `last_update`, `fund_code`, `data_count`, `date_range` |
//!
//! ## Semantics
//!
//! - `write` is a full overwrite of both files; callers merge old and new
//!   rows before writing.
//! - `read` treats an unreadable or corrupt pair as absent and deletes both
//!   files (self-healing). Corruption is logged, never surfaced.
//! - [`CacheMeta::is_same_day_fresh`] drives the orchestrator's reuse /
//!   incremental-update decision.
//!
//! ## Known limitation
//!
//! Files are written without locking under a single-writer assumption.
//! Concurrent processes updating the same fund code may race; that matches
//! the upstream design and is out of scope here.

mod error;
mod models;

use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::{debug, warn};

pub use error::StoreError;
pub use models::{CacheEntry, CacheMeta, CacheRow, DateRange, LAST_UPDATE_FORMAT};

/// File-backed cache of NAV series, one entry per fund code.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn data_path(&self, fund_code: &str) -> PathBuf {
        self.dir.join(format!("{fund_code}.csv"))
    }

    fn meta_path(&self, fund_code: &str) -> PathBuf {
        self.dir.join(format!("{fund_code}_meta.json"))
    }

    /// Read the cached entry for a fund code.
    ///
    /// Returns `Ok(None)` when no entry exists or the persisted pair is
    /// corrupt; in the corrupt case both files are removed so the next fetch
    /// rebuilds from scratch.
    pub fn read(&self, fund_code: &str) -> Result<Option<CacheEntry>, StoreError> {
        let data_path = self.data_path(fund_code);
        let meta_path = self.meta_path(fund_code);
        if !data_path.exists() || !meta_path.exists() {
            return Ok(None);
        }

        match Self::load_entry(&data_path, &meta_path) {
            Ok(entry) => {
                debug!(
                    fund_code,
                    rows = entry.rows.len(),
                    last_update = %entry.meta.last_update,
                    "cache hit"
                );
                Ok(Some(entry))
            }
            Err(reason) => {
                warn!(fund_code, %reason, "corrupt cache entry, removing");
                self.invalidate(fund_code);
                Ok(None)
            }
        }
    }

    /// Overwrite the cached entry for a fund code with `rows`.
    ///
    /// Both the data file and the sidecar are fully rewritten; `last_update`
    /// is set to the current UTC time and the meta fields are derived from
    /// the rows. Writing an empty series is refused.
    pub fn write(&self, fund_code: &str, rows: &[CacheRow]) -> Result<CacheMeta, StoreError> {
        if rows.is_empty() {
            return Err(StoreError::EmptyWrite {
                fund_code: fund_code.to_owned(),
            });
        }

        fs::create_dir_all(&self.dir)?;

        let mut writer = csv::Writer::from_path(self.data_path(fund_code))?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(StoreError::Io)?;

        let meta = CacheMeta::build(fund_code, rows, OffsetDateTime::now_utc());
        fs::write(
            self.meta_path(fund_code),
            serde_json::to_string_pretty(&meta)?,
        )?;

        debug!(fund_code, rows = rows.len(), "cache written");
        Ok(meta)
    }

    /// Remove a fund's cache pair. Missing files are fine; removal failures
    /// are logged and swallowed, since the reader treats the entry as absent
    /// either way.
    pub fn invalidate(&self, fund_code: &str) {
        for path in [self.data_path(fund_code), self.meta_path(fund_code)] {
            if let Err(error) = fs::remove_file(&path) {
                if error.kind() != std::io::ErrorKind::NotFound {
                    warn!(fund_code, path = %path.display(), %error, "failed to remove cache file");
                }
            }
        }
    }

    fn load_entry(data_path: &Path, meta_path: &Path) -> Result<CacheEntry, String> {
        let meta: CacheMeta = serde_json::from_str(
            &fs::read_to_string(meta_path).map_err(|e| e.to_string())?,
        )
        .map_err(|e| e.to_string())?;

        let mut reader = csv::Reader::from_path(data_path).map_err(|e| e.to_string())?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<CacheRow>() {
            rows.push(row.map_err(|e| e.to_string())?);
        }

        if rows.is_empty() {
            return Err(String::from("data file holds no rows"));
        }

        Ok(CacheEntry { rows, meta })
    }
}
