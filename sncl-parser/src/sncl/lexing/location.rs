//! Source locations
//!
//! Tokens keep the byte range logos reports, plus the 1-based line and column
//! computed from it. Lines are what every diagnostic reports.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub span: Range<usize>,
    pub line: usize,
    pub column: usize,
}

/// Byte offset of every line start, for offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line of a byte offset.
    pub fn line(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(exact) => exact + 1,
            Err(next) => next,
        }
    }

    /// 1-based (line, column) of a byte offset.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line(offset);
        let column = offset - self.starts[line - 1] + 1;
        (line, column)
    }

    pub fn locate(&self, span: Range<usize>) -> Location {
        let (line, column) = self.position(span.start);
        Location { span, line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_is_one() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(2), (1, 3));
    }

    #[test]
    fn offsets_after_newlines() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.position(3), (2, 1));
        assert_eq!(index.position(4), (2, 2));
        assert_eq!(index.position(6), (3, 1));
        assert_eq!(index.position(7), (4, 1));
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.line(2), 1);
    }
}
