use std::fs;

use stickymarks_core::{
    rebind, Command, EditorEvents, EditorHost, FileMarkers, MarkerSet, MarkerStore, MemoryHost,
    Settings, Synchronizer, TextBuffer,
};
use tempfile::tempdir;

const LAYER: &str = "bookmarks";

fn lines(total: usize, overrides: &[(usize, &str)]) -> String {
    let mut out: Vec<String> = (0..total).map(|idx| format!("line {idx}")).collect();
    for (idx, text) in overrides {
        out[*idx] = (*text).to_string();
    }
    out.join("\n")
}

#[test]
fn store_round_trips_every_file_and_line() {
    let dir = tempdir().expect("temp dir");
    let identity = dir.path().join("notes.project");
    let store = MarkerStore::new(Some(identity.as_path()));

    let mut markers = MarkerSet::new();
    markers.set_file_markers(
        "/home/ユーザー/メモ.md",
        FileMarkers::from_iter([(0, "# 見出し"), (17, "\t- 項目 ✓")]),
    );
    markers.set_file_markers("/srv/app/main.rs", FileMarkers::from_iter([(3, "fn main() {")]));

    store.save(&markers).expect("save");
    assert!(dir.path().join("notes.project.bookmarks").is_file());
    assert_eq!(MarkerStore::new(Some(identity.as_path())).load(), markers);
}

#[test]
fn rebind_follows_drift_and_prefers_nearest() {
    let shifted = TextBuffer::new(lines(20, &[(13, "foo")]));
    assert_eq!(rebind(&shifted, 10, "foo").map(|r| r.line), Some(13));

    let ambiguous = TextBuffer::new(lines(25, &[(8, "foo"), (20, "foo")]));
    assert_eq!(rebind(&ambiguous, 10, "foo").map(|r| r.line), Some(8));

    let missing = TextBuffer::new(lines(25, &[]));
    assert!(rebind(&missing, 10, "foo").is_none());
}

#[test]
fn missed_markers_are_not_rendered() {
    let mut host = MemoryHost::new();
    let mut sync = Synchronizer::for_host(&host, &Settings::default());

    let view = host.open_file("/src/a.rs", lines(10, &[(2, "keep"), (6, "gone")]));
    host.toggle_marker(view, LAYER, 2);
    host.toggle_marker(view, LAYER, 6);
    sync.on_close(&mut host, view);
    host.close_view(view);

    let view = host.open_file("/src/a.rs", lines(10, &[(4, "keep")]));
    sync.on_open(&mut host, view);
    assert_eq!(host.marked_lines(view, LAYER), vec![4]);
}

#[test]
fn close_then_reopen_restores_same_lines() {
    let dir = tempdir().expect("temp dir");
    let identity = dir.path().join("ws.project");
    let text = lines(12, &[]);

    {
        let mut host = MemoryHost::with_identity(&identity);
        let mut sync = Synchronizer::for_host(&host, &Settings::default());
        let view = host.open_file("/src/a.rs", text.clone());
        for line in [2, 5, 9] {
            host.toggle_marker(view, LAYER, line);
        }
        sync.dispatch(&mut host, Command::FileClosed(view));
        sync.finish().expect("final save");
    }

    let mut host = MemoryHost::with_identity(&identity);
    let mut sync = Synchronizer::for_host(&host, &Settings::default());
    let view = host.open_file("/src/a.rs", text);
    sync.dispatch(&mut host, Command::FileLoaded(view));
    assert_eq!(host.marked_lines(view, LAYER), vec![2, 5, 9]);
}

#[test]
fn closing_with_no_markers_forgets_the_file() {
    let mut host = MemoryHost::new();
    let mut sync = Synchronizer::for_host(&host, &Settings::default());

    let view = host.open_file("/src/a.rs", "a\nb\n");
    host.toggle_marker(view, LAYER, 0);
    sync.on_close(&mut host, view);
    assert!(sync.markers().file_markers("/src/a.rs").is_some());

    host.erase_regions(view, LAYER);
    sync.on_close(&mut host, view);
    assert!(sync.markers().file_markers("/src/a.rs").is_none());
}

#[test]
fn clear_all_empties_memory_views_and_disk() {
    let dir = tempdir().expect("temp dir");
    let identity = dir.path().join("ws.project");
    let mut host = MemoryHost::with_identity(&identity);
    let mut sync = Synchronizer::for_host(&host, &Settings::default());

    let a = host.open_file("/src/a.rs", "a\n");
    host.toggle_marker(a, LAYER, 0);
    sync.on_close(&mut host, a);
    let b = host.open_file("/src/b.rs", "b\n");
    host.toggle_marker(b, LAYER, 0);

    sync.dispatch(&mut host, Command::ClearAll);
    assert!(sync.markers().is_empty());
    assert!(host.marked_lines(a, LAYER).is_empty());
    assert!(host.marked_lines(b, LAYER).is_empty());
    assert!(sync.store().load().is_empty());

    let on_disk = fs::read_to_string(dir.path().join("ws.project.bookmarks")).expect("store");
    assert!(on_disk.contains("\"files\": {}"));
}

#[test]
fn listing_orders_open_views_before_closed_files() {
    let mut host = MemoryHost::new();
    let mut sync = Synchronizer::for_host(&host, &Settings::default());

    let b = host.open_file("/src/b.rs", lines(10, &[(2, "b two"), (7, "b seven")]));
    host.toggle_marker(b, LAYER, 7);
    host.toggle_marker(b, LAYER, 2);
    sync.on_close(&mut host, b);
    host.close_view(b);

    let a = host.open_file("/src/a.rs", lines(5, &[(1, "a one"), (3, "a three")]));
    host.toggle_marker(a, LAYER, 3);
    host.toggle_marker(a, LAYER, 1);

    host.answer_next_choice(None);
    assert!(sync.dispatch(&mut host, Command::List).is_none());
    assert_eq!(
        host.presented()[0],
        vec![
            "a.rs:4: a three".to_string(),
            "a.rs:2: a one".to_string(),
            "b.rs:3: b two".to_string(),
            "b.rs:8: b seven".to_string(),
        ]
    );
}

#[test]
fn corrupt_store_starts_empty_and_is_overwritten() {
    let dir = tempdir().expect("temp dir");
    let identity = dir.path().join("ws.project");
    fs::write(dir.path().join("ws.project.bookmarks"), "}}} not json").expect("write");

    let mut host = MemoryHost::with_identity(&identity);
    let mut sync = Synchronizer::for_host(&host, &Settings::default());
    assert!(sync.markers().is_empty());

    let view = host.open_file("/src/a.rs", "x\n");
    host.toggle_marker(view, LAYER, 0);
    sync.on_close(&mut host, view);
    assert_eq!(sync.store().load().marker_count(), 1);
}

#[test]
fn workspace_without_identity_never_writes() {
    let mut host = MemoryHost::new();
    let mut sync = Synchronizer::for_host(&host, &Settings::default());
    assert!(sync.store().path().is_none());

    let view = host.open_file("/src/a.rs", "x\n");
    host.toggle_marker(view, LAYER, 0);
    sync.on_close(&mut host, view);
    assert!(sync.last_save_error().is_none());
    assert_eq!(sync.markers().marker_count(), 1);
    assert!(sync.finish().expect("no-op save").contains("/src/a.rs"));
}

#[test]
fn custom_layer_and_extension_come_from_settings() {
    let dir = tempdir().expect("temp dir");
    let settings = Settings {
        marker_layer: "sticky".into(),
        store_extension: "marks".into(),
    };
    let mut host = MemoryHost::with_identity(dir.path().join("ws"));
    let mut sync = Synchronizer::for_host(&host, &settings);

    let view = host.open_file("/src/a.rs", "x\n");
    host.toggle_marker(view, "sticky", 0);
    host.toggle_marker(view, LAYER, 0);
    sync.on_close(&mut host, view);

    assert!(dir.path().join("ws.marks").is_file());
    assert_eq!(sync.markers().marker_count(), 1);
    assert_eq!(host.regions(view, "sticky").len(), 1);
}
