use std::collections::HashMap;

use crate::text::TextBuffer;

/// 重新定位後的書籤位置。 / Where a remembered marker landed in the current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebound {
    /// 目前的行號（從 0 起算）。 / Current zero-based line index.
    pub line: usize,
    /// 該行起點的位移。 / Zero-length insertion point at the start of that line.
    pub offset: usize,
}

/// 依行內容將書籤重新對應到目前文字。 / Re-attaches remembered markers to the
/// current text by exact line content.
///
/// The buffer is indexed by line content once, so rebinding every marker of a
/// file costs one pass over the text plus one lookup per marker.
#[derive(Debug)]
pub struct Rebinder<'a> {
    buffer: &'a TextBuffer,
    by_content: HashMap<&'a str, Vec<usize>>,
}

impl<'a> Rebinder<'a> {
    /// 建立行內容索引。 / Indexes every line of the buffer by its content.
    pub fn new(buffer: &'a TextBuffer) -> Self {
        let mut by_content: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, line) in buffer.lines().enumerate() {
            by_content.entry(line).or_default().push(idx);
        }
        Self { buffer, by_content }
    }

    /// 找出內容完全相同且距離原行號最近的行。 / Finds the line whose content equals
    /// `text` and whose index is closest to `line`.
    ///
    /// Candidates are visited in ascending line order and only a strictly
    /// smaller distance replaces the current best, so the first-found candidate
    /// wins ties. Returns `None` when no line matches.
    pub fn rebind(&self, line: usize, text: &str) -> Option<Rebound> {
        let best = self
            .by_content
            .get(text)?
            .iter()
            .copied()
            .min_by_key(|candidate| candidate.abs_diff(line))?;
        let offset = self.buffer.line_start(best)?;
        Some(Rebound { line: best, offset })
    }

    /// 目前文字的行數。 / Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }
}

/// 單次重新定位的便捷函式。 / One-shot helper for rebinding a single marker.
pub fn rebind(buffer: &TextBuffer, line: usize, text: &str) -> Option<Rebound> {
    Rebinder::new(buffer).rebind(line, text)
}
