//! Line/column positions for diagnostics.

use serde::Serialize;

/// Zero-based line and column (column counted in characters).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Precomputed line start offsets for fast offset → position lookups.
#[derive(Clone, Debug)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(source: &str) -> LineMap {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i as u32 + 1));
        LineMap { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line] as usize;
        let end = (offset as usize).min(source.len());
        let character = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        Position {
            line: line as u32,
            character: character as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_across_lines() {
        let source = "ab\ncd\n\nef";
        let map = LineMap::build(source);
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.offset_to_position(0, source), Position { line: 0, character: 0 });
        assert_eq!(map.offset_to_position(4, source), Position { line: 1, character: 1 });
        assert_eq!(map.offset_to_position(7, source), Position { line: 3, character: 0 });
    }
}
