use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marker_set::MarkerSet;
use crate::settings::DEFAULT_STORE_EXTENSION;
use crate::util::{append_extension, write_atomic};

/// Current on-disk format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Errors raised while reading or writing the bookmark store.
/// 書籤儲存區讀寫時可能發生的錯誤。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read bookmarks {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt bookmark store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize bookmarks {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write bookmarks {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Serialized shape of the store file.
/// 儲存檔的序列化結構。
#[derive(Debug, Serialize, Deserialize)]
struct StoredMarkers<M> {
    #[serde(default)]
    format_version: u32,
    #[serde(default)]
    files: M,
}

/// Persists a [`MarkerSet`] next to the workspace identity it belongs to.
/// 依工作區識別保存書籤集合。
///
/// A store without an identity is inert: loads are empty and saves write
/// nothing.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: Option<PathBuf>,
}

impl MarkerStore {
    /// Store for `identity` using the default `.bookmarks` extension.
    pub fn new(identity: Option<&Path>) -> Self {
        Self::with_extension(identity, DEFAULT_STORE_EXTENSION)
    }

    /// Store for `identity` with `.<extension>` appended to it.
    pub fn with_extension(identity: Option<&Path>, extension: &str) -> Self {
        Self {
            path: identity.map(|identity| append_extension(identity, extension)),
        }
    }

    /// Store that never touches the disk.
    pub fn detached() -> Self {
        Self { path: None }
    }

    /// Path of the store file, if the workspace has an identity.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the persisted markers. Missing files and detached stores yield
    /// `Ok(None)`.
    /// 載入儲存的書籤；檔案不存在時回傳 `Ok(None)`。
    pub fn try_load(&self) -> Result<Option<MarkerSet>, StoreError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(None);
        };
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no bookmark store at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };

        let stored: StoredMarkers<MarkerSet> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        if stored.format_version > STORE_FORMAT_VERSION {
            log::warn!(
                "bookmark store {} uses format {} (newer than {}); loading known fields only",
                path.display(),
                stored.format_version,
                STORE_FORMAT_VERSION
            );
        }

        let mut markers = stored.files;
        let pruned = markers.prune_empty();
        if pruned > 0 {
            log::debug!("dropped {pruned} empty file entries from {}", path.display());
        }
        log::info!(
            "loaded {} bookmarks in {} files from {}",
            markers.marker_count(),
            markers.len(),
            path.display()
        );
        Ok(Some(markers))
    }

    /// Loads the persisted markers, starting empty when the store is missing,
    /// unreadable, or corrupt.
    /// 載入書籤；遇到缺檔或毀損時以空集合開始。
    pub fn load(&self) -> MarkerSet {
        match self.try_load() {
            Ok(markers) => markers.unwrap_or_default(),
            Err(err) => {
                log::warn!("{err}; starting with no bookmarks");
                MarkerSet::new()
            }
        }
    }

    /// Writes the whole set, replacing previous contents atomically.
    /// 以原子寫入覆蓋整份書籤。
    pub fn save(&self, markers: &MarkerSet) -> Result<(), StoreError> {
        let Some(path) = self.path.as_ref() else {
            log::debug!("workspace has no identity; bookmarks are not persisted");
            return Ok(());
        };
        let stored = StoredMarkers {
            format_version: STORE_FORMAT_VERSION,
            files: markers,
        };
        let payload = serde_json::to_vec_pretty(&stored).map_err(|source| {
            StoreError::Serialize {
                path: path.clone(),
                source,
            }
        })?;
        write_atomic(path, &payload).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!(
            "saved {} bookmarks in {} files to {}",
            markers.marker_count(),
            markers.len(),
            path.display()
        );
        Ok(())
    }
}
