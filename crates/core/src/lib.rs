//! Sticky bookmarks: per-line markers that survive closing a file and edits
//! that shift line numbers.
//! 可跨工作階段保存、並在行號位移後重新定位的書籤。

pub mod command;
pub mod host;
pub mod listing;
pub mod marker_set;
pub mod memory_host;
pub mod rebind;
pub mod settings;
pub mod store;
pub mod sync;
pub mod text;
mod util;

pub use command::{Command, CommandError};
pub use host::{live_markers, EditorHost, LiveMarker, ViewId};
pub use listing::{
    build_listing, clean_line_text, list_and_navigate, navigate, ListingEntry, NavigationTarget,
    NO_BOOKMARKS_MESSAGE,
};
pub use marker_set::{FileMarkers, MarkerSet};
pub use memory_host::MemoryHost;
pub use rebind::{rebind, Rebinder, Rebound};
pub use settings::{
    Settings, SettingsError, SettingsStore, DEFAULT_MARKER_LAYER, DEFAULT_STORE_EXTENSION,
};
pub use store::{MarkerStore, StoreError, STORE_FORMAT_VERSION};
pub use sync::{EditorEvents, Synchronizer};
pub use text::TextBuffer;
