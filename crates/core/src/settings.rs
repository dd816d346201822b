use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default name of the marker layer drawn by the host.
pub const DEFAULT_MARKER_LAYER: &str = "bookmarks";
/// Default extension appended to the workspace identity for the store file.
pub const DEFAULT_STORE_EXTENSION: &str = "bookmarks";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 書籤設定；未知欄位會被忽略。 / Bookmark settings read from JSON. Unknown
/// fields are ignored and missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Host layer that holds the rendered markers.
    #[serde(default = "default_marker_layer")]
    pub marker_layer: String,
    /// Extension appended to the workspace identity, without the leading dot.
    #[serde(default = "default_store_extension")]
    pub store_extension: String,
}

fn default_marker_layer() -> String {
    DEFAULT_MARKER_LAYER.to_string()
}

fn default_store_extension() -> String {
    DEFAULT_STORE_EXTENSION.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker_layer: default_marker_layer(),
            store_extension: default_store_extension(),
        }
    }
}

impl Settings {
    /// Replaces blank values with defaults and strips a leading dot from the
    /// store extension.
    pub fn sanitize(&mut self) {
        if self.marker_layer.trim().is_empty() {
            self.marker_layer = default_marker_layer();
        }
        let extension = self.store_extension.trim().trim_start_matches('.');
        self.store_extension = if extension.is_empty() {
            default_store_extension()
        } else {
            extension.to_string()
        };
    }
}

/// 從檔案載入的設定。 / Settings loaded from a JSON file.
#[derive(Debug)]
pub struct SettingsStore {
    data: Settings,
}

impl SettingsStore {
    /// 載入設定；檔案不存在時使用預設值。 / Loads settings, falling back to the
    /// defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("settings file {} missing, using defaults", path.display());
            return Ok(Self {
                data: Settings::default(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut data: Settings =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        data.sanitize();
        Ok(Self { data })
    }

    pub fn into_settings(self) -> Settings {
        self.data
    }
}
