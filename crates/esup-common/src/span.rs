//! Byte-offset spans into the original source text.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into the original source.
///
/// Every syntax node records the span of the slot it occupies in the
/// original document. Synthesized nodes keep the slot of the node they
/// replaced, or an empty span at their insertion point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    /// An empty span positioned at `pos`.
    #[inline]
    pub const fn at(pos: u32) -> Span {
        Span { start: pos, end: pos }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` lies entirely within this span.
    #[inline]
    pub const fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub const fn contains_pos(self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Smallest span covering both.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slice the span out of `source`, returning an empty string when the
    /// span is out of bounds.
    pub fn text(self, source: &str) -> &str {
        let start = self.start as usize;
        let end = self.end as usize;
        source.get(start..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_and_contains() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert_eq!(a.cover(b), Span::new(2, 9));
        assert!(a.cover(b).contains(a));
        assert!(!a.contains(b));
        assert!(a.contains_pos(4));
        assert!(!a.contains_pos(5));
    }

    #[test]
    fn text_out_of_bounds_is_empty() {
        assert_eq!(Span::new(1, 3).text("abcd"), "bc");
        assert_eq!(Span::new(3, 10).text("abcd"), "");
        assert!(Span::at(7).is_empty());
    }
}
