use crate::ast::Range;
use bstr::ByteSlice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Maps byte offsets to line/column pairs. Lines end at `\n`, `\r\n`, or a lone `\r`.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    line_starts: Vec<usize>,
}

impl SourceLocator {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, &ch) in source.iter().enumerate() {
            if ch == b'\n' || (ch == b'\r' && source.get(i + 1) != Some(&b'\n')) {
                line_starts.push(i + 1);
            }
        }
        SourceLocator { line_starts }
    }

    pub fn line_of(&self, index: usize) -> u32 {
        (self.line_starts.partition_point(|&start| start <= index) - 1) as u32
    }

    /// Byte range of `line`, excluding its terminator.
    pub fn line_range(&self, source: &[u8], line: u32) -> Range {
        let line = line as usize;
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(source.len());
        if end > start && source[end - 1] == b'\n' {
            end -= 1;
        }
        if end > start && source[end - 1] == b'\r' {
            end -= 1;
        }
        Range(start, end)
    }

    pub fn position_general<F>(&self, source: &[u8], index: usize, counter: F) -> Position
    where
        F: FnOnce(&[u8]) -> u32,
    {
        let line = self.line_of(index);
        let line_beginning = self.line_starts[line as usize];
        let character = counter(&source[line_beginning..index]);
        Position { line, character }
    }

    pub fn position_chars(&self, source: &[u8], index: usize) -> Position {
        self.position_general(source, index, |line| line.chars().count() as u32)
    }
}
