//! Template tree parsing.
//!
//! A small stack-based HTML scanner that turns the content of the
//! `<template>` block into [`TemplateNode`]s. It records tags, nesting and
//! offsets only; attributes are skipped (quote-aware) and interpolations are
//! kept inside text. Offsets are absolute positions in the SFC source.

use crate::parse::{is_tag_name_char_fast, is_whitespace_fast, starts_with_bytes};
use crate::types::*;
use memchr::memmem;
use phf::phf_set;

/// Elements that never have children
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr"
};

/// Elements whose content is raw text
static RAW_TEXT_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "script", "style", "textarea", "title"
};

fn is_void_tag(tag: &str) -> bool {
    tag.len() <= 6 && VOID_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

fn is_raw_text_tag(tag: &str) -> bool {
    tag.len() <= 8 && RAW_TEXT_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

/// Parse `source[start..end]` into its top-level template nodes.
///
/// Whitespace-only text is dropped and remaining text is trimmed, so the
/// first and last node of any child list start and end on visible markup.
pub fn parse_template(
    source: &str,
    start: usize,
    end: usize,
) -> Result<Vec<TemplateNode<'_>>, SfcError> {
    TemplateParser::new(source, start, end).parse()
}

struct StackEntry<'a> {
    element: ElementNode<'a>,
}

struct TemplateParser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    stack: Vec<StackEntry<'a>>,
    root: Vec<TemplateNode<'a>>,
}

impl<'a> TemplateParser<'a> {
    fn new(source: &'a str, start: usize, end: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: start,
            end,
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<TemplateNode<'a>>, SfcError> {
        while self.pos < self.end {
            if self.at(b"<!--") {
                self.parse_comment()?;
            } else if self.at(b"</") && self.peek(2).is_some_and(|b| b.is_ascii_alphabetic()) {
                self.parse_close_tag()?;
            } else if self.at(b"<") && self.peek(1).is_some_and(|b| b.is_ascii_alphabetic()) {
                self.parse_open_tag()?;
            } else {
                self.parse_text();
            }
        }

        if let Some(entry) = self.stack.last() {
            return Err(SfcError::new(
                "UNCLOSED_ELEMENT",
                format!("element <{}> is missing its end tag", entry.element.tag),
                Some(entry.element.loc.start),
            ));
        }

        Ok(self.root)
    }

    #[inline]
    fn at(&self, needle: &[u8]) -> bool {
        starts_with_bytes(&self.bytes[self.pos..self.end], needle)
    }

    #[inline]
    fn peek(&self, ahead: usize) -> Option<u8> {
        let i = self.pos + ahead;
        (i < self.end).then(|| self.bytes[i])
    }

    fn add_child(&mut self, child: TemplateNode<'a>) {
        if let Some(entry) = self.stack.last_mut() {
            entry.element.children.push(child);
        } else {
            self.root.push(child);
        }
    }

    fn parse_comment(&mut self) -> Result<(), SfcError> {
        let start = self.pos;
        let body = start + 4;
        let Some(close) = memmem::find(&self.bytes[body..self.end], b"-->") else {
            return Err(SfcError::new(
                "UNCLOSED_COMMENT",
                "comment is missing its closing -->",
                Some(start),
            ));
        };
        let end = body + close + 3;
        self.add_child(TemplateNode::Comment(CommentNode {
            content: &self.source[body..body + close],
            loc: NodeLocation { start, end },
        }));
        self.pos = end;
        Ok(())
    }

    /// Text up to the next tag or comment, with `{{ }}` treated as opaque.
    fn parse_text(&mut self) {
        let start = self.pos;
        let mut pos = self.pos;
        while pos < self.end {
            let rest = &self.bytes[pos..self.end];
            if rest.starts_with(b"{{") {
                pos = memmem::find(&rest[2..], b"}}")
                    .map(|i| pos + 2 + i + 2)
                    .unwrap_or(self.end);
                continue;
            }
            if rest[0] == b'<'
                && rest
                    .get(1)
                    .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'/' || b == b'!')
                && pos > start
            {
                break;
            }
            pos += 1;
        }
        self.pos = pos;
        self.push_text(start, pos);
    }

    fn push_text(&mut self, start: usize, end: usize) {
        let raw = &self.source[start..end];
        let content = raw.trim();
        if content.is_empty() {
            return;
        }
        let leading = raw.len() - raw.trim_start().len();
        let start = start + leading;
        self.add_child(TemplateNode::Text(TextNode {
            content,
            loc: NodeLocation {
                start,
                end: start + content.len(),
            },
        }));
    }

    fn parse_open_tag(&mut self) -> Result<(), SfcError> {
        let start = self.pos;
        let name_start = start + 1;
        let mut pos = name_start;
        while pos < self.end && is_tag_name_char_fast(self.bytes[pos]) {
            pos += 1;
        }
        let tag = &self.source[name_start..pos];

        let Some(tag_end) = self.skip_attributes(pos) else {
            return Err(SfcError::new(
                "UNCLOSED_TAG",
                format!("opening tag <{}> is never closed with >", tag),
                Some(start),
            ));
        };
        let self_closing = self.bytes[tag_end - 1] == b'/';
        let after = tag_end + 1;

        let mut element = ElementNode {
            tag,
            loc: NodeLocation { start, end: after },
            self_closing,
            children: Vec::new(),
        };

        if self_closing || is_void_tag(tag) {
            self.add_child(TemplateNode::Element(element));
            self.pos = after;
            return Ok(());
        }

        if is_raw_text_tag(tag) {
            let close = self.find_raw_close(after, tag).ok_or_else(|| {
                SfcError::new(
                    "UNCLOSED_ELEMENT",
                    format!("element <{}> is missing its end tag", tag),
                    Some(start),
                )
            })?;
            self.push_raw_text(&mut element, after, close);
            let close_end = self.skip_to_gt(close).unwrap_or(self.end - 1) + 1;
            element.loc.end = close_end;
            self.add_child(TemplateNode::Element(element));
            self.pos = close_end;
            return Ok(());
        }

        self.stack.push(StackEntry { element });
        self.pos = after;
        Ok(())
    }

    fn push_raw_text(&self, element: &mut ElementNode<'a>, start: usize, end: usize) {
        let raw = &self.source[start..end];
        let content = raw.trim();
        if content.is_empty() {
            return;
        }
        let start = start + (raw.len() - raw.trim_start().len());
        element.children.push(TemplateNode::Text(TextNode {
            content,
            loc: NodeLocation {
                start,
                end: start + content.len(),
            },
        }));
    }

    /// Position of the `>` ending the tag whose attributes start at `pos`.
    fn skip_attributes(&self, mut pos: usize) -> Option<usize> {
        while pos < self.end {
            match self.bytes[pos] {
                b'>' => return Some(pos),
                quote @ (b'"' | b'\'') => {
                    let close = memchr::memchr(quote, &self.bytes[pos + 1..self.end])?;
                    pos += close + 2;
                }
                _ => pos += 1,
            }
        }
        None
    }

    fn skip_to_gt(&self, pos: usize) -> Option<usize> {
        memchr::memchr(b'>', &self.bytes[pos..self.end]).map(|i| pos + i)
    }

    /// Start of `</tag` closing a raw text element.
    fn find_raw_close(&self, from: usize, tag: &str) -> Option<usize> {
        let mut pos = from;
        while pos < self.end {
            let i = memmem::find(&self.bytes[pos..self.end], b"</")?;
            let candidate = pos + i;
            let name_start = candidate + 2;
            let name_end = name_start + tag.len();
            if name_end <= self.end
                && self.bytes[name_start..name_end].eq_ignore_ascii_case(tag.as_bytes())
                && (name_end == self.end
                    || self.bytes[name_end] == b'>'
                    || is_whitespace_fast(self.bytes[name_end]))
            {
                return Some(candidate);
            }
            pos = candidate + 2;
        }
        None
    }

    fn parse_close_tag(&mut self) -> Result<(), SfcError> {
        let start = self.pos;
        let name_start = start + 2;
        let mut pos = name_start;
        while pos < self.end && is_tag_name_char_fast(self.bytes[pos]) {
            pos += 1;
        }
        let tag = &self.source[name_start..pos];
        let Some(gt) = self.skip_to_gt(pos) else {
            return Err(SfcError::new(
                "UNCLOSED_TAG",
                format!("closing tag </{}> is never closed with >", tag),
                Some(start),
            ));
        };
        let end = gt + 1;

        let Some(index) = self
            .stack
            .iter()
            .rposition(|entry| entry.element.tag.eq_ignore_ascii_case(tag))
        else {
            return Err(SfcError::new(
                "INVALID_END_TAG",
                format!("end tag </{}> has no matching start tag", tag),
                Some(start),
            ));
        };

        if index + 1 != self.stack.len() {
            let unclosed = &self.stack[self.stack.len() - 1].element;
            return Err(SfcError::new(
                "UNCLOSED_ELEMENT",
                format!("element <{}> is missing its end tag", unclosed.tag),
                Some(unclosed.loc.start),
            ));
        }

        if let Some(StackEntry { mut element }) = self.stack.pop() {
            element.loc.end = end;
            self.add_child(TemplateNode::Element(element));
        }
        self.pos = end;
        Ok(())
    }
}
