/// 文字快照，提供行號與位移換算。 / Immutable text snapshot with line/offset lookups.
///
/// Lines are split on `\n`; a trailing `\r` is not part of the line text. An
/// empty buffer has zero lines, while text ending in a newline has a final
/// empty line, matching how editors number the line after the last break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    line_starts: Vec<usize>,
}

impl TextBuffer {
    /// 建立快照並計算每行起點。 / Creates a snapshot and indexes line starts.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = Vec::new();
        if !text.is_empty() {
            line_starts.push(0);
            line_starts.extend(
                text.bytes()
                    .enumerate()
                    .filter(|(_, byte)| *byte == b'\n')
                    .map(|(idx, _)| idx + 1),
            );
        }
        Self { text, line_starts }
    }

    /// 行數。 / Number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 指定行的起始位移。 / Byte offset at which the given line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// 取得不含行尾字元的行內容。 / Text of the given line without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let slice = &self.text[start..end];
        Some(slice.strip_suffix('\r').unwrap_or(slice))
    }

    /// 依序列舉所有行。 / Iterates all lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.line_count()).filter_map(move |idx| self.line(idx))
    }

    /// 將位移換算為 (行, 欄)；超出範圍時夾在文字結尾。 / Converts a byte offset into
    /// `(line, column)`, clamping offsets past the end of the text.
    pub fn row_col(&self, offset: usize) -> (usize, usize) {
        if self.line_starts.is_empty() {
            return (0, 0);
        }
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at - 1,
        };
        (line, offset - self.line_starts[line])
    }
}
