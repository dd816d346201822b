use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 單一檔案的書籤：行號對應擷取時的行內容。 / Markers of one file: line index to the
/// line text captured when the file was closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMarkers {
    lines: BTreeMap<usize, String>,
}

impl FileMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記錄一行；同一行僅保留最後一次的內容。 / Records a line, replacing any text
    /// previously stored for the same index.
    pub fn insert(&mut self, line: usize, text: impl Into<String>) -> Option<String> {
        self.lines.insert(line, text.into())
    }

    pub fn remove(&mut self, line: usize) -> Option<String> {
        self.lines.remove(&line)
    }

    pub fn get(&self, line: usize) -> Option<&str> {
        self.lines.get(&line).map(String::as_str)
    }

    /// 依行號遞增列舉。 / Iterates markers by ascending line index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines.iter().map(|(line, text)| (*line, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for FileMarkers {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        let mut markers = FileMarkers::new();
        for (line, text) in iter {
            markers.insert(line, text);
        }
        markers
    }
}

/// 所有已知檔案的書籤集合。 / Markers for every known file, keyed by absolute path.
///
/// A file present in the set always has at least one marker; storing an empty
/// [`FileMarkers`] removes the entry instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerSet {
    files: BTreeMap<String, FileMarkers>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 整批取代檔案的書籤；空集合會移除該檔案。 / Replaces a file's markers wholesale;
    /// an empty set removes the file.
    pub fn set_file_markers(&mut self, file: impl Into<String>, markers: FileMarkers) {
        let file = file.into();
        if markers.is_empty() {
            self.files.remove(&file);
        } else {
            self.files.insert(file, markers);
        }
    }

    pub fn file_markers(&self, file: &str) -> Option<&FileMarkers> {
        self.files.get(file)
    }

    /// 移除檔案並回傳原有書籤。 / Removes a file, returning its markers if present.
    pub fn remove_file(&mut self, file: &str) -> Option<FileMarkers> {
        self.files.remove(file)
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    /// 依路徑排序列舉所有檔案。 / Iterates files in path order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileMarkers)> + '_ {
        self.files.iter().map(|(file, markers)| (file.as_str(), markers))
    }

    /// 已記錄的檔案數。 / Number of files with markers.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 所有檔案的書籤總數。 / Total number of markers across files.
    pub fn marker_count(&self) -> usize {
        self.files.values().map(FileMarkers::len).sum()
    }

    /// 移除外部資料中留下的空項目。 / Drops empty entries left by external data.
    pub(crate) fn prune_empty(&mut self) -> usize {
        let before = self.files.len();
        self.files.retain(|_, markers| !markers.is_empty());
        before - self.files.len()
    }
}
