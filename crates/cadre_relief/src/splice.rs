//! Non-destructive text splicing.
//!
//! The [`Splicer`] collects insertions and overwrites expressed against the
//! original text and renders them in one pass. Offsets are never re-derived
//! after an edit, and every untouched segment is mapped back to its original
//! position when a source map is requested.

use sourcemap::{SourceMap, SourceMapBuilder};

use crate::error::RewriteError;
use crate::plan::{Anchor, InjectionPlan};

/// Result of a rewrite.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// Rewritten (or original) code
    pub code: String,

    /// Source map from `code` back to the original text
    pub map: Option<SourceMap>,

    /// Whether any edit was requested
    pub changed: bool,
}

impl RewriteResult {
    /// Pass `source` through untouched.
    pub fn unchanged(source: &str) -> Self {
        Self {
            code: source.to_string(),
            map: None,
            changed: false,
        }
    }

    /// Serialize the source map as JSON.
    pub fn map_json(&self) -> Result<Option<String>, RewriteError> {
        let Some(map) = &self.map else {
            return Ok(None);
        };
        let mut buf = Vec::new();
        map.to_writer(&mut buf)?;
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Overwrite of an original range.
#[derive(Debug, Clone)]
struct Replacement {
    start: usize,
    end: usize,
    text: String,
}

/// Collects edits against an original text and renders them.
#[derive(Debug)]
pub struct Splicer<'s> {
    source: &'s str,
    /// Insertions in application order
    insertions: Vec<(usize, Anchor, String)>,
    replacements: Vec<Replacement>,
    requested: bool,
}

impl<'s> Splicer<'s> {
    /// Create a splicer over `source`.
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            insertions: Vec::new(),
            replacements: Vec::new(),
            requested: false,
        }
    }

    /// Record every insertion of `plan`. Plans applied earlier render first
    /// when they share an offset and anchor with a later plan.
    pub fn apply(&mut self, plan: &InjectionPlan) -> Result<&mut Self, RewriteError> {
        for insertion in plan {
            self.check_offset(insertion.offset)?;
        }
        for insertion in plan {
            self.insertions
                .push((insertion.offset, insertion.anchor, insertion.text.clone()));
            self.requested = true;
        }
        Ok(self)
    }

    /// Replace the original range `start..end` with `text`. Ranges must not
    /// overlap each other.
    pub fn overwrite(
        &mut self,
        start: usize,
        end: usize,
        text: impl Into<String>,
    ) -> Result<&mut Self, RewriteError> {
        self.check_offset(start)?;
        self.check_offset(end)?;
        if start >= end {
            return Err(RewriteError::Splice {
                offset: start,
                message: "empty overwrite range".into(),
            });
        }
        if let Some(other) = self
            .replacements
            .iter()
            .find(|r| start < r.end && r.start < end)
        {
            return Err(RewriteError::Splice {
                offset: start,
                message: format!(
                    "overwrite {}..{} overlaps {}..{}",
                    start, end, other.start, other.end
                ),
            });
        }
        self.replacements.push(Replacement {
            start,
            end,
            text: text.into(),
        });
        self.requested = true;
        Ok(self)
    }

    /// Whether any edit was requested. A splicer without requests renders the
    /// original text byte for byte.
    #[inline]
    pub fn has_changed(&self) -> bool {
        self.requested
    }

    /// Render the edits. `file` names the source in the generated map.
    pub fn finish(self, file: &str, source_map: bool) -> RewriteResult {
        if !self.requested {
            return RewriteResult::unchanged(self.source);
        }

        let mut ops: Vec<Op<'_>> =
            Vec::with_capacity(self.insertions.len() + self.replacements.len());
        for (seq, (offset, anchor, text)) in self.insertions.iter().enumerate() {
            let rank = match anchor {
                Anchor::Before => 0,
                Anchor::After => 1,
            };
            ops.push(Op {
                pos: *offset,
                rank,
                seq,
                kind: OpKind::Insert(text),
            });
        }
        for (seq, r) in self.replacements.iter().enumerate() {
            ops.push(Op {
                pos: r.start,
                rank: 2,
                seq,
                kind: OpKind::Replace {
                    end: r.end,
                    text: &r.text,
                },
            });
        }
        ops.sort_by_key(|op| (op.pos, op.rank, op.seq));

        let extra: usize = ops.iter().map(|op| op.kind.text().len()).sum();
        let mut out = Output::new(self.source, source_map, self.source.len() + extra);
        let mut cursor = 0;

        for op in &ops {
            if op.pos < cursor {
                tracing::debug!(offset = op.pos, "dropping edit inside an overwritten range");
                continue;
            }
            out.push_original(cursor, op.pos);
            cursor = op.pos;
            match op.kind {
                OpKind::Insert(text) => out.push_inserted(text),
                OpKind::Replace { end, text } => {
                    out.push_replacement(text, op.pos);
                    cursor = end;
                }
            }
        }
        out.push_original(cursor, self.source.len());

        let map = source_map.then(|| out.build_map(file));
        RewriteResult {
            code: out.code,
            map,
            changed: true,
        }
    }

    fn check_offset(&self, offset: usize) -> Result<(), RewriteError> {
        if offset > self.source.len() {
            return Err(RewriteError::Splice {
                offset,
                message: format!("out of bounds (length {})", self.source.len()),
            });
        }
        if !self.source.is_char_boundary(offset) {
            return Err(RewriteError::Splice {
                offset,
                message: "not on a character boundary".into(),
            });
        }
        Ok(())
    }
}

struct Op<'p> {
    pos: usize,
    rank: u8,
    seq: usize,
    kind: OpKind<'p>,
}

enum OpKind<'p> {
    Insert(&'p str),
    Replace { end: usize, text: &'p str },
}

impl OpKind<'_> {
    fn text(&self) -> &str {
        match self {
            OpKind::Insert(text) | OpKind::Replace { text, .. } => text,
        }
    }
}

/// Output buffer tracking generated line/column for the source map.
struct Output<'s> {
    source: &'s str,
    code: String,
    line: u32,
    column: u32,
    mapped: bool,
    line_starts: Vec<usize>,
    /// (dst_line, dst_col, src_line, src_col)
    tokens: Vec<(u32, u32, u32, u32)>,
}

impl<'s> Output<'s> {
    fn new(source: &'s str, mapped: bool, capacity: usize) -> Self {
        let line_starts = if mapped {
            std::iter::once(0)
                .chain(newline_offsets(source).map(|i| i + 1))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            source,
            code: String::with_capacity(capacity),
            line: 0,
            column: 0,
            mapped,
            line_starts,
            tokens: Vec::new(),
        }
    }

    /// Line and UTF-16 column of an original offset.
    fn original_position(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let column = self.source[self.line_starts[line]..offset]
            .encode_utf16()
            .count();
        (line as u32, column as u32)
    }

    fn mark(&mut self, offset: usize) {
        if self.mapped {
            let (src_line, src_col) = self.original_position(offset);
            self.tokens.push((self.line, self.column, src_line, src_col));
        }
    }

    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += ch.len_utf16() as u32;
            }
        }
    }

    fn push_original(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let segment = &self.source[start..end];
        self.mark(start);
        let mut line_start = 0;
        for (i, _) in segment.match_indices('\n') {
            let piece = &segment[line_start..=i];
            self.code.push_str(piece);
            self.line += 1;
            self.column = 0;
            line_start = i + 1;
            if line_start < segment.len() {
                self.mark(start + line_start);
            }
        }
        let rest = &segment[line_start..];
        self.code.push_str(rest);
        self.column += rest.encode_utf16().count() as u32;
    }

    fn push_inserted(&mut self, text: &str) {
        self.code.push_str(text);
        self.advance(text);
    }

    fn push_replacement(&mut self, text: &str, origin: usize) {
        if !text.is_empty() {
            self.mark(origin);
        }
        self.push_inserted(text);
    }

    fn build_map(&self, file: &str) -> SourceMap {
        let mut builder = SourceMapBuilder::new(Some(file));
        let src_id = builder.add_source(file);
        builder.set_source_contents(src_id, Some(self.source));
        for &(dst_line, dst_col, src_line, src_col) in &self.tokens {
            builder.add_raw(dst_line, dst_col, src_line, src_col, Some(src_id), None, false);
        }
        builder.into_sourcemap()
    }
}

fn newline_offsets(source: &str) -> impl Iterator<Item = usize> + '_ {
    source.match_indices('\n').map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(edits: &[(usize, Anchor, &str)]) -> InjectionPlan {
        let mut plan = InjectionPlan::new();
        for (offset, anchor, text) in edits {
            match anchor {
                Anchor::Before => plan.insert_before(*offset, *text),
                Anchor::After => plan.insert_after(*offset, *text),
            };
        }
        plan
    }

    #[test]
    fn test_no_edits_is_identity() {
        let source = "<template>\r\n  <div/>\n</template>";
        let splicer = Splicer::new(source);
        assert!(!splicer.has_changed());
        let result = splicer.finish("a.vue", true);
        assert_eq!(result.code, source);
        assert!(!result.changed);
        assert!(result.map.is_none());
    }

    #[test]
    fn test_empty_plan_is_not_a_request() {
        let mut splicer = Splicer::new("abc");
        splicer.apply(&InjectionPlan::new()).unwrap();
        assert!(!splicer.has_changed());
    }

    #[test]
    fn test_edits_use_original_offsets() {
        let source = "0123456789";
        let mut splicer = Splicer::new(source);
        splicer
            .apply(&plan(&[(2, Anchor::After, "<"), (5, Anchor::Before, ">")]))
            .unwrap();
        splicer.apply(&plan(&[(0, Anchor::After, "#")])).unwrap();
        let result = splicer.finish("x", false);
        assert_eq!(result.code, "#01<234>56789");
        assert!(result.changed);
    }

    #[test]
    fn test_same_offset_order() {
        let mut splicer = Splicer::new("ab");
        splicer
            .apply(&plan(&[(1, Anchor::After, "[open]")]))
            .unwrap()
            .apply(&plan(&[(1, Anchor::Before, "[close]")]))
            .unwrap()
            .apply(&plan(&[(1, Anchor::After, "[late]")]))
            .unwrap();
        let result = splicer.finish("x", false);
        assert_eq!(result.code, "a[close][open][late]b");
    }

    #[test]
    fn test_wrap_and_prepend() {
        let source = "<template>\n  <p>hi</p>\n</template>\n";
        let mut splicer = Splicer::new(source);
        splicer
            .apply(&plan(&[(13, Anchor::After, "<x>"), (22, Anchor::Before, "</x>")]))
            .unwrap()
            .apply(&plan(&[(0, Anchor::Before, "<script setup>\n</script>\n")]))
            .unwrap();
        let result = splicer.finish("a.vue", false);

        insta::assert_snapshot!(result.code, @r#"
<script setup>
</script>
<template>
  <x><p>hi</p></x>
</template>
"#);
    }

    #[test]
    fn test_overwrite() {
        let mut splicer = Splicer::new("load(/* marker */ './x')");
        splicer.overwrite(5, 24, "\"/abs/x.ts\")").unwrap();
        let result = splicer.finish("x", false);
        assert_eq!(result.code, "load(\"/abs/x.ts\")");
    }

    #[test]
    fn test_overwrite_rejects_overlap() {
        let mut splicer = Splicer::new("0123456789");
        splicer.overwrite(2, 6, "x").unwrap();
        assert!(splicer.overwrite(4, 8, "y").is_err());
        assert!(splicer.overwrite(6, 8, "y").is_ok());
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut splicer = Splicer::new("abc");
        let err = splicer
            .apply(&plan(&[(4, Anchor::After, "x")]))
            .unwrap_err();
        assert!(matches!(err, RewriteError::Splice { offset: 4, .. }));
        assert!(!splicer.has_changed());
    }

    #[test]
    fn test_rejects_non_char_boundary() {
        let mut splicer = Splicer::new("é");
        assert!(splicer.apply(&plan(&[(1, Anchor::After, "x")])).is_err());
    }

    #[test]
    fn test_source_map_tracks_shifted_lines() {
        let source = "line one\nline two\n";
        let mut splicer = Splicer::new(source);
        splicer
            .apply(&plan(&[(0, Anchor::After, "inserted\n")]))
            .unwrap();
        let result = splicer.finish("doc.vue", true);
        assert_eq!(result.code, "inserted\nline one\nline two\n");

        let map = result.map.as_ref().expect("map requested");
        // "line two" is generated on line 2 and comes from line 1
        let token = map.lookup_token(2, 0).expect("token on line 2");
        assert_eq!(token.get_src_line(), 1);
        assert_eq!(token.get_src_col(), 0);
        assert_eq!(token.get_source(), Some("doc.vue"));

        let json = result.map_json().unwrap().unwrap();
        assert!(json.contains("\"sources\":[\"doc.vue\"]"));
    }

    #[test]
    fn test_source_map_column_after_insertion() {
        let mut splicer = Splicer::new("<a></a>");
        splicer.apply(&plan(&[(3, Anchor::After, "xyz")])).unwrap();
        let result = splicer.finish("doc", true);
        let map = result.map.unwrap();
        let token = map.lookup_token(0, 6).unwrap();
        assert_eq!(token.get_dst_col(), 6);
        assert_eq!(token.get_src_col(), 3);
    }
}
