use serde::{Deserialize, Serialize};

/// A raw source position as the tree builder captures it: 1-based line,
/// 0-based column in UTF-16 code units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

/// Maps byte offsets (as stored in oxc spans) to line/column positions.
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<u32>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            let next = match c {
                '\r' => match chars.peek() {
                    Some(&(lf, '\n')) => {
                        chars.next();
                        lf + 1
                    }
                    _ => offset + 1,
                },
                '\n' | '\u{2028}' | '\u{2029}' => offset + c.len_utf8(),
                _ => continue,
            };
            line_starts.push(next as u32);
        }
        LineIndex {
            source,
            line_starts,
        }
    }

    pub fn locate(&self, offset: u32) -> Option<SourcePosition> {
        let at = offset as usize;
        if at > self.source.len() || !self.source.is_char_boundary(at) {
            return None;
        }
        // partition_point is at least 1 because line_starts[0] == 0
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1] as usize;
        let column = self.source[line_start..at].encode_utf16().count();
        Some(SourcePosition {
            line: line as u32,
            column: column as u32,
        })
    }
}
