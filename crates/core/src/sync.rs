use crate::host::{live_markers, EditorHost, ViewId};
use crate::listing::{self, NavigationTarget};
use crate::marker_set::{FileMarkers, MarkerSet};
use crate::rebind::Rebinder;
use crate::settings::Settings;
use crate::store::{MarkerStore, StoreError};
use crate::text::TextBuffer;

/// 編輯器生命週期事件。 / Lifecycle events delivered by the host editor.
pub trait EditorEvents {
    /// 檔案即將關閉。 / The file in `view` is about to close.
    fn on_close<H: EditorHost + ?Sized>(&mut self, host: &mut H, view: ViewId);
    /// 檔案已載入完成。 / The file in `view` finished loading.
    fn on_open<H: EditorHost + ?Sized>(&mut self, host: &mut H, view: ViewId);
}

/// 單一工作階段的書籤同步器。 / Keeps one workspace session's markers in step
/// with the host and the on-disk store.
///
/// Every mutation of the [`MarkerSet`] is followed by a save. A failed save is
/// logged and reported through the host status line; the in-memory set is
/// kept as-is so the next save can still write it.
#[derive(Debug)]
pub struct Synchronizer {
    markers: MarkerSet,
    store: MarkerStore,
    layer: String,
    last_save_error: Option<StoreError>,
}

impl Synchronizer {
    /// 載入儲存區並開始工作階段。 / Starts a session, loading the store.
    pub fn start(store: MarkerStore, settings: &Settings) -> Self {
        let markers = store.load();
        Self {
            markers,
            store,
            layer: settings.marker_layer.clone(),
            last_save_error: None,
        }
    }

    /// 依主機提供的工作區識別開始工作階段。 / Starts a session for the host's workspace.
    pub fn for_host<H>(host: &H, settings: &Settings) -> Self
    where
        H: EditorHost + ?Sized,
    {
        let identity = host.workspace_identity();
        if identity.is_none() {
            log::debug!("host has no workspace identity; bookmarks stay in memory");
        }
        let store = MarkerStore::with_extension(identity.as_deref(), &settings.store_extension);
        Self::start(store, settings)
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// 書籤圖層名稱。 / Name of the host layer holding rendered markers.
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// 最近一次儲存失敗的原因。 / Error of the most recent failed save, cleared by
    /// the next successful one.
    pub fn last_save_error(&self) -> Option<&StoreError> {
        self.last_save_error.as_ref()
    }

    /// 清除作用中檔案的書籤。 / Clears markers of the active file.
    pub fn clear_file<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(view) = host.active_view() {
            host.erase_regions(view, &self.layer);
            if let Some(path) = host.file_name(view) {
                if self.markers.remove_file(&path).is_some() {
                    log::debug!("cleared bookmarks of {path}");
                }
            }
        }
        self.persist(host);
    }

    /// 清除整個工作區的書籤。 / Clears every marker in the workspace.
    pub fn clear_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        for view in host.views() {
            host.erase_regions(view, &self.layer);
        }
        self.markers.clear();
        self.persist(host);
    }

    /// 列出書籤並跳至選取項目。 / Lists markers and navigates to the chosen one.
    pub fn list<H: EditorHost + ?Sized>(&self, host: &mut H) -> Option<NavigationTarget> {
        listing::list_and_navigate(host, &self.markers, &self.layer)
    }

    /// 結束工作階段並做最後一次儲存。 / Ends the session with a final save and
    /// hands back the markers.
    pub fn finish(self) -> Result<MarkerSet, StoreError> {
        self.store.save(&self.markers)?;
        Ok(self.markers)
    }

    fn persist<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        match self.store.save(&self.markers) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                log::warn!("{err}");
                host.status_message(&format!("Failed to save bookmarks: {err}"));
                self.last_save_error = Some(err);
            }
        }
    }

    fn render<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        view: ViewId,
        path: &str,
        file_markers: &FileMarkers,
        buffer: &TextBuffer,
    ) {
        let rebinder = Rebinder::new(buffer);
        let mut offsets = Vec::with_capacity(file_markers.len());
        for (line, text) in file_markers.iter() {
            match rebinder.rebind(line, text) {
                Some(rebound) => {
                    if rebound.line != line {
                        log::debug!("{path}: bookmark moved from line {line} to {}", rebound.line);
                    }
                    offsets.push(rebound.offset);
                }
                None => log::debug!(
                    "{path}: dropped bookmark at line {line}; text not found in {} lines",
                    rebinder.line_count()
                ),
            }
        }
        offsets.sort_unstable();
        offsets.dedup();
        host.add_regions(view, &self.layer, offsets);
    }
}

impl EditorEvents for Synchronizer {
    fn on_close<H: EditorHost + ?Sized>(&mut self, host: &mut H, view: ViewId) {
        let Some(path) = host.file_name(view) else {
            return;
        };
        let Some(live) = live_markers(host, view, &self.layer) else {
            log::debug!("{path}: text unavailable on close; keeping stored bookmarks");
            return;
        };
        let captured: FileMarkers = live
            .into_iter()
            .map(|marker| (marker.line, marker.text))
            .collect();
        if captured.is_empty() {
            self.markers.remove_file(&path);
        } else {
            log::debug!("{path}: captured {} bookmarks on close", captured.len());
            self.markers.set_file_markers(path, captured);
        }
        self.persist(host);
    }

    fn on_open<H: EditorHost + ?Sized>(&mut self, host: &mut H, view: ViewId) {
        let Some(path) = host.file_name(view) else {
            return;
        };
        let Some(file_markers) = self.markers.file_markers(&path) else {
            return;
        };
        let Some(buffer) = host.text(view) else {
            return;
        };
        host.erase_regions(view, &self.layer);
        self.render(host, view, &path, file_markers, &buffer);
    }
}
