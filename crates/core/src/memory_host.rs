use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::host::{EditorHost, ViewId};
use crate::text::TextBuffer;

/// 記憶體中的視圖。 / One view held by [`MemoryHost`].
#[derive(Debug, Clone)]
struct MemoryView {
    id: ViewId,
    path: Option<String>,
    name: Option<String>,
    buffer: TextBuffer,
    layers: HashMap<String, Vec<usize>>,
    selection: Option<usize>,
}

/// 在記憶體中模擬編輯器。 / Editor host kept entirely in memory.
///
/// Views are listed in the order they were opened. Status messages, open
/// requests, and presented lists are recorded for inspection, and the answer
/// to the next list prompt is scripted with [`MemoryHost::answer_next_choice`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    identity: Option<PathBuf>,
    views: Vec<MemoryView>,
    active: Option<ViewId>,
    next_id: u64,
    statuses: Vec<String>,
    open_requests: Vec<(String, usize)>,
    presented: Vec<Vec<String>>,
    next_choice: Option<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定工作區識別。 / Host whose workspace is identified by `identity`.
    pub fn with_identity(identity: impl Into<PathBuf>) -> Self {
        Self {
            identity: Some(identity.into()),
            ..Self::default()
        }
    }

    /// 開啟檔案並設為作用中視圖。 / Opens a file-backed view and makes it active.
    ///
    /// No lifecycle event is fired; callers dispatch the load event themselves.
    pub fn open_file(&mut self, path: impl AsRef<Path>, text: impl Into<String>) -> ViewId {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.push_view(Some(path), None, text.into())
    }

    /// 開啟未存檔的具名緩衝區。 / Opens an unsaved buffer with a display name.
    pub fn open_scratch(&mut self, name: impl Into<String>, text: impl Into<String>) -> ViewId {
        self.push_view(None, Some(name.into()), text.into())
    }

    fn push_view(&mut self, path: Option<String>, name: Option<String>, text: String) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        self.views.push(MemoryView {
            id,
            path,
            name,
            buffer: TextBuffer::new(text),
            layers: HashMap::new(),
            selection: None,
        });
        self.active = Some(id);
        id
    }

    /// 關閉視圖。 / Closes a view, returning whether it existed.
    pub fn close_view(&mut self, view: ViewId) -> bool {
        let before = self.views.len();
        self.views.retain(|entry| entry.id != view);
        if self.active == Some(view) {
            self.active = self.views.last().map(|entry| entry.id);
        }
        before != self.views.len()
    }

    pub fn set_active(&mut self, view: ViewId) {
        if self.view(view).is_some() {
            self.active = Some(view);
        }
    }

    pub fn set_view_name(&mut self, view: ViewId, name: impl Into<String>) {
        if let Some(entry) = self.view_mut(view) {
            entry.name = Some(name.into());
        }
    }

    /// 切換指定行的書籤；回傳新狀態。 / Toggles a marker at the start of `line`
    /// on `layer`, returning whether the line is now marked.
    pub fn toggle_marker(&mut self, view: ViewId, layer: &str, line: usize) -> bool {
        let Some(entry) = self.view_mut(view) else {
            return false;
        };
        let Some(start) = entry.buffer.line_start(line) else {
            return false;
        };
        let regions = entry.layers.entry(layer.to_string()).or_default();
        if let Some(pos) = regions.iter().position(|offset| *offset == start) {
            regions.remove(pos);
            false
        } else {
            regions.push(start);
            true
        }
    }

    /// 取得圖層上書籤所在的行號。 / Line indices of the regions on `layer`.
    pub fn marked_lines(&self, view: ViewId, layer: &str) -> Vec<usize> {
        let Some(entry) = self.view(view) else {
            return Vec::new();
        };
        entry
            .layers
            .get(layer)
            .map(|offsets| {
                offsets
                    .iter()
                    .map(|offset| entry.buffer.row_col(*offset).0)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 取代視圖內容；書籤位移維持不變。 / Replaces the view's text. Region offsets
    /// are kept as-is and clamped on read.
    pub fn set_text(&mut self, view: ViewId, text: impl Into<String>) {
        if let Some(entry) = self.view_mut(view) {
            entry.buffer = TextBuffer::new(text);
        }
    }

    pub fn selection(&self, view: ViewId) -> Option<usize> {
        self.view(view).and_then(|entry| entry.selection)
    }

    /// 設定下一次清單選擇的回應。 / Scripts the answer to the next list prompt.
    pub fn answer_next_choice(&mut self, choice: Option<usize>) {
        self.next_choice = choice;
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// 以 (路徑, 1 起算行號) 記錄的開檔要求。 / Open requests as `(path, 1-based line)`.
    pub fn open_requests(&self) -> &[(String, usize)] {
        &self.open_requests
    }

    /// 曾顯示過的清單。 / Every list presented through [`EditorHost::choose`].
    pub fn presented(&self) -> &[Vec<String>] {
        &self.presented
    }

    fn view(&self, view: ViewId) -> Option<&MemoryView> {
        self.views.iter().find(|entry| entry.id == view)
    }

    fn view_mut(&mut self, view: ViewId) -> Option<&mut MemoryView> {
        self.views.iter_mut().find(|entry| entry.id == view)
    }
}

impl EditorHost for MemoryHost {
    fn workspace_identity(&self) -> Option<PathBuf> {
        self.identity.clone()
    }

    fn views(&self) -> Vec<ViewId> {
        self.views.iter().map(|entry| entry.id).collect()
    }

    fn active_view(&self) -> Option<ViewId> {
        self.active
    }

    fn file_name(&self, view: ViewId) -> Option<String> {
        self.view(view).and_then(|entry| entry.path.clone())
    }

    fn view_name(&self, view: ViewId) -> Option<String> {
        self.view(view).and_then(|entry| entry.name.clone())
    }

    fn find_open_file(&self, path: &str) -> Option<ViewId> {
        self.views
            .iter()
            .find(|entry| entry.path.as_deref() == Some(path))
            .map(|entry| entry.id)
    }

    fn text(&self, view: ViewId) -> Option<TextBuffer> {
        self.view(view).map(|entry| entry.buffer.clone())
    }

    fn regions(&self, view: ViewId, layer: &str) -> Vec<usize> {
        self.view(view)
            .and_then(|entry| entry.layers.get(layer).cloned())
            .unwrap_or_default()
    }

    fn add_regions(&mut self, view: ViewId, layer: &str, offsets: Vec<usize>) {
        if let Some(entry) = self.view_mut(view) {
            entry.layers.insert(layer.to_string(), offsets);
        }
    }

    fn erase_regions(&mut self, view: ViewId, layer: &str) {
        if let Some(entry) = self.view_mut(view) {
            entry.layers.remove(layer);
        }
    }

    fn focus_view(&mut self, view: ViewId) {
        self.set_active(view);
    }

    fn show_at(&mut self, view: ViewId, offset: usize) {
        if let Some(entry) = self.view_mut(view) {
            entry.selection = Some(offset);
        }
    }

    fn open_file_at(&mut self, path: &str, line: usize) {
        self.open_requests.push((path.to_string(), line));
    }

    fn choose(&mut self, items: &[String]) -> Option<usize> {
        self.presented.push(items.to_vec());
        self.next_choice.take()
    }

    fn status_message(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }
}
