use std::path::Path;

use crate::host::{live_markers, EditorHost, ViewId};
use crate::marker_set::MarkerSet;

/// Status shown when there is nothing to list.
pub const NO_BOOKMARKS_MESSAGE: &str = "No bookmarks found";

/// Where selecting a listing entry takes the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Marker in an open view, at its current offset.
    OpenView { view: ViewId, offset: usize },
    /// Remembered marker of a closed file, at its zero-based line index.
    ClosedFile { path: String, line: usize },
}

/// One row of the bookmark listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub label: String,
    pub target: NavigationTarget,
}

/// Builds the listing: live markers of every open view first (view order, then
/// marker order), followed by remembered markers of files that are not open,
/// sorted by line.
pub fn build_listing<H>(host: &H, markers: &MarkerSet, layer: &str) -> Vec<ListingEntry>
where
    H: EditorHost + ?Sized,
{
    let mut entries = Vec::new();

    for view in host.views() {
        let prefix = view_prefix(host, view);
        for marker in live_markers(host, view, layer).unwrap_or_default() {
            entries.push(ListingEntry {
                label: format_label(&prefix, marker.line, &marker.text),
                target: NavigationTarget::OpenView {
                    view,
                    offset: marker.offset,
                },
            });
        }
    }

    for (path, file_markers) in markers.files() {
        if host.find_open_file(path).is_some() {
            continue;
        }
        let prefix = base_name(path).map(|name| format!("{name}:")).unwrap_or_default();
        for (line, text) in file_markers.iter() {
            entries.push(ListingEntry {
                label: format_label(&prefix, line, text),
                target: NavigationTarget::ClosedFile {
                    path: path.to_string(),
                    line,
                },
            });
        }
    }

    entries
}

/// Moves the host to `target`.
pub fn navigate<H>(host: &mut H, target: &NavigationTarget)
where
    H: EditorHost + ?Sized,
{
    match target {
        NavigationTarget::OpenView { view, offset } => {
            host.focus_view(*view);
            host.show_at(*view, *offset);
        }
        NavigationTarget::ClosedFile { path, line } => {
            host.open_file_at(path, line + 1);
        }
    }
}

/// Presents the listing and navigates to the chosen entry. Returns the target
/// that was navigated to, if any.
pub fn list_and_navigate<H>(
    host: &mut H,
    markers: &MarkerSet,
    layer: &str,
) -> Option<NavigationTarget>
where
    H: EditorHost + ?Sized,
{
    let entries = build_listing(host, markers, layer);
    if entries.is_empty() {
        host.status_message(NO_BOOKMARKS_MESSAGE);
        return None;
    }

    let labels: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();
    let chosen = host.choose(&labels)?;
    let entry = entries.into_iter().nth(chosen)?;
    navigate(host, &entry.target);
    Some(entry.target)
}

/// Collapses whitespace runs into single spaces and trims the ends.
pub fn clean_line_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_label(prefix: &str, line: usize, text: &str) -> String {
    format!("{prefix}{}: {}", line + 1, clean_line_text(text))
}

fn view_prefix<H>(host: &H, view: ViewId) -> String
where
    H: EditorHost + ?Sized,
{
    let name = host
        .view_name(view)
        .filter(|name| !name.is_empty())
        .or_else(|| host.file_name(view).and_then(|path| base_name(&path)));
    name.map(|name| format!("{name}:")).unwrap_or_default()
}

fn base_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker_set::FileMarkers;
    use crate::memory_host::MemoryHost;

    const LAYER: &str = "bookmarks";

    #[test]
    fn cleans_whitespace() {
        assert_eq!(clean_line_text("  let\t x =\n  1;  "), "let x = 1;");
        assert_eq!(clean_line_text(" \t "), "");
    }

    #[test]
    fn open_views_then_closed_files_sorted() {
        let mut host = MemoryHost::new();
        let a = host.open_file("/src/a.rs", "a0\na1\na2\na3\n");
        host.toggle_marker(a, LAYER, 3);
        host.toggle_marker(a, LAYER, 1);

        let mut markers = MarkerSet::new();
        markers.set_file_markers("/src/b.rs", FileMarkers::from_iter([(7, "b7"), (2, "b2")]));
        markers.set_file_markers("/src/a.rs", FileMarkers::from_iter([(0, "stale")]));

        let labels: Vec<_> = build_listing(&host, &markers, LAYER)
            .into_iter()
            .map(|entry| entry.label)
            .collect();
        assert_eq!(labels, vec!["a.rs:4: a3", "a.rs:2: a1", "b.rs:3: b2", "b.rs:8: b7"]);
    }

    #[test]
    fn view_name_overrides_file_name() {
        let mut host = MemoryHost::new();
        let scratch = host.open_scratch("Notes", "first\n   spaced    out\n");
        host.toggle_marker(scratch, LAYER, 1);
        let untitled = host.open_scratch("", "x");
        host.toggle_marker(untitled, LAYER, 0);
        let renamed = host.open_file("/src/very/long/module.rs", "y");
        host.set_view_name(renamed, "Main");
        host.toggle_marker(renamed, LAYER, 0);

        let entries = build_listing(&host, &MarkerSet::new(), LAYER);
        assert_eq!(entries[0].label, "Notes:2: spaced out");
        assert_eq!(
            entries[0].target,
            NavigationTarget::OpenView {
                view: scratch,
                offset: 6
            }
        );
        assert_eq!(entries[1].label, "1: x");
        assert_eq!(entries[2].label, "Main:1: y");
    }

    #[test]
    fn empty_listing_reports_status() {
        let mut host = MemoryHost::new();
        assert!(list_and_navigate(&mut host, &MarkerSet::new(), LAYER).is_none());
        assert_eq!(host.statuses(), [NO_BOOKMARKS_MESSAGE.to_string()]);
        assert!(host.presented().is_empty());
    }

    #[test]
    fn choosing_closed_file_opens_it_at_one_based_line() {
        let mut host = MemoryHost::new();
        let mut markers = MarkerSet::new();
        markers.set_file_markers("/src/b.rs", FileMarkers::from_iter([(9, "ten")]));

        host.answer_next_choice(Some(0));
        let target = list_and_navigate(&mut host, &markers, LAYER);
        assert_eq!(
            target,
            Some(NavigationTarget::ClosedFile {
                path: "/src/b.rs".into(),
                line: 9
            })
        );
        assert_eq!(host.open_requests(), [("/src/b.rs".to_string(), 10)]);
    }

    #[test]
    fn choosing_open_view_focuses_and_selects() {
        let mut host = MemoryHost::new();
        let a = host.open_file("/src/a.rs", "zero\none\n");
        host.toggle_marker(a, LAYER, 1);
        let other = host.open_file("/src/c.rs", "c");
        assert_eq!(host.active_view(), Some(other));

        host.answer_next_choice(Some(0));
        list_and_navigate(&mut host, &MarkerSet::new(), LAYER);
        assert_eq!(host.active_view(), Some(a));
        assert_eq!(host.selection(a), Some(5));
    }

    #[test]
    fn cancel_or_out_of_range_does_nothing() {
        let mut host = MemoryHost::new();
        let mut markers = MarkerSet::new();
        markers.set_file_markers("/src/b.rs", FileMarkers::from_iter([(1, "x")]));

        assert!(list_and_navigate(&mut host, &markers, LAYER).is_none());
        host.answer_next_choice(Some(5));
        assert!(list_and_navigate(&mut host, &markers, LAYER).is_none());
        assert!(host.open_requests().is_empty());
    }
}
