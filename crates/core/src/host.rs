//! Editor-facing seam: everything the bookmark engine needs from the editor
//! that hosts it. Real editors adapt their view and panel APIs to
//! [`EditorHost`]; [`crate::MemoryHost`] is the in-memory implementation.

use std::fmt;
use std::path::PathBuf;

use crate::text::TextBuffer;

/// 編輯器視圖的識別碼。 / Handle of an editor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Operations the host editor provides to the bookmark engine.
pub trait EditorHost {
    /// Project file or directory identifying the workspace, if any.
    fn workspace_identity(&self) -> Option<PathBuf>;

    /// Open views in the host's iteration order.
    fn views(&self) -> Vec<ViewId>;

    fn active_view(&self) -> Option<ViewId>;

    /// Absolute path of the file shown in `view`; `None` for unsaved buffers.
    fn file_name(&self, view: ViewId) -> Option<String>;

    /// Explicit display name given to `view`, if any.
    fn view_name(&self, view: ViewId) -> Option<String>;

    /// Finds the view currently showing `path`.
    fn find_open_file(&self, path: &str) -> Option<ViewId>;

    /// Snapshot of the full text of `view`.
    fn text(&self, view: ViewId) -> Option<TextBuffer>;

    /// Offsets of the regions drawn on `layer`, in layer order.
    fn regions(&self, view: ViewId, layer: &str) -> Vec<usize>;

    /// Replaces the regions drawn on `layer` with zero-length regions at `offsets`.
    fn add_regions(&mut self, view: ViewId, layer: &str, offsets: Vec<usize>);

    fn erase_regions(&mut self, view: ViewId, layer: &str);

    fn focus_view(&mut self, view: ViewId);

    /// Selects `offset` in `view` and scrolls it to the center.
    fn show_at(&mut self, view: ViewId, offset: usize);

    /// Opens `path` with the caret on the 1-based `line`.
    fn open_file_at(&mut self, path: &str, line: usize);

    /// Presents `items` for selection; `None` means the user cancelled.
    fn choose(&mut self, items: &[String]) -> Option<usize>;

    fn status_message(&mut self, message: &str);
}

/// 開啟中檔案的即時書籤。 / A marker as currently rendered in an open view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMarker {
    pub offset: usize,
    pub line: usize,
    /// Text of the line right now, not when the marker was created.
    pub text: String,
}

/// 讀取視圖上的即時書籤。 / Reads the live markers of `view` from `layer`.
///
/// Returns `None` when the host cannot provide the view's text, which is
/// different from a view that has no markers.
pub fn live_markers<H>(host: &H, view: ViewId, layer: &str) -> Option<Vec<LiveMarker>>
where
    H: EditorHost + ?Sized,
{
    let buffer = host.text(view)?;
    let markers = host
        .regions(view, layer)
        .into_iter()
        .map(|offset| {
            let (line, _) = buffer.row_col(offset);
            LiveMarker {
                offset,
                line,
                text: buffer.line(line).unwrap_or_default().to_string(),
            }
        })
        .collect();
    Some(markers)
}
