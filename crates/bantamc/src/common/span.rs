//! Source locations

use std::fmt;

/// Identifier of a source file registered with the [`DiagnosticReporter`](super::DiagnosticReporter)
pub type FileId = usize;

/// File id used for declarations that have no source text (built-in classes)
pub const BUILTIN_FILE: FileId = usize::MAX;

/// A byte range within one source file, tagged with the 1-based line it starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32) -> Self {
        Self { start, end, line }
    }

    /// Span covering `self` through `other`; keeps the starting line
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.start),
            line: self.line,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_to_keeps_first_line() {
        let a = Span::new(4, 9, 2);
        let b = Span::new(20, 25, 5);
        let joined = a.to(b);
        assert_eq!(joined, Span::new(4, 25, 2));
        assert_eq!(joined.len(), 21);
    }
}
