//! SFC parsing implementation.
//!
//! Byte-level scanner for the top-level blocks of a single-file component.
//! Block contents and attributes borrow from the source; the template block
//! is further parsed into a node tree by [`crate::template`].

use crate::template::parse_template;
use crate::types::*;
use cadre_carton::FxHashMap;
use memchr::memchr;
use memchr::memmem;
use std::borrow::Cow;

// Static closing tags for fast comparison (avoid format!)
const CLOSING_TEMPLATE: &[u8] = b"</template>";
const CLOSING_SCRIPT: &[u8] = b"</script>";
const CLOSING_STYLE: &[u8] = b"</style>";

// Tag name bytes for fast comparison
const TAG_TEMPLATE: &[u8] = b"template";
const TAG_SCRIPT: &[u8] = b"script";
const TAG_STYLE: &[u8] = b"style";

type Attrs<'a> = FxHashMap<Cow<'a, str>, Cow<'a, str>>;

/// A top-level block as found by the scanner.
struct RawBlock<'a> {
    tag_name: &'a [u8],
    attrs: Attrs<'a>,
    content: Cow<'a, str>,
    content_start: usize,
    content_end: usize,
    end_pos: usize,
    end_line: usize,
    end_column: usize,
}

/// Parse a Vue SFC into a descriptor with zero-copy strings.
///
/// The first block of each kind is authoritative; later duplicates are
/// recorded in [`SfcDescriptor::warnings`] and otherwise ignored. An
/// unterminated `<template>` or a malformed template tree is an error.
pub fn parse_sfc<'a>(
    source: &'a str,
    options: SfcParseOptions,
) -> Result<SfcDescriptor<'a>, SfcError> {
    let mut descriptor = SfcDescriptor {
        filename: Cow::Owned(options.filename),
        source: Cow::Borrowed(source),
        ..Default::default()
    };

    let bytes = source.as_bytes();
    let len = bytes.len();

    let mut pos = 0;
    let mut line = 1;
    let mut column = 1;

    while pos < len {
        // Skip whitespace using byte comparison
        while pos < len {
            let c = bytes[pos];
            if c == b' ' || c == b'\t' || c == b'\r' {
                pos += 1;
                column += 1;
            } else if c == b'\n' {
                pos += 1;
                line += 1;
                column = 1;
            } else {
                break;
            }
        }

        if pos >= len {
            break;
        }

        // Use memchr to find next '<' quickly
        if bytes[pos] != b'<' {
            if let Some(next_lt) = memchr(b'<', &bytes[pos..]) {
                advance_position(&bytes[pos..pos + next_lt], &mut line, &mut column);
                pos += next_lt;
            } else {
                break;
            }
        }

        // Top-level comments never open a block
        if bytes[pos..].starts_with(b"<!--") {
            let end = memmem::find(&bytes[pos + 4..], b"-->")
                .map(|i| pos + 4 + i + 3)
                .unwrap_or(len);
            advance_position(&bytes[pos..end], &mut line, &mut column);
            pos = end;
            continue;
        }

        let Some(block) = parse_block_fast(bytes, source, pos, line) else {
            if opens_tag(bytes, pos, TAG_TEMPLATE) {
                return Err(SfcError::new(
                    "UNTERMINATED_TEMPLATE",
                    "<template> block is never closed",
                    Some(pos),
                ));
            }
            pos += 1;
            column += 1;
            continue;
        };

        let loc = BlockLocation {
            start: block.content_start,
            end: block.content_end,
            start_line: line,
            start_column: column,
            end_line: block.end_line,
            end_column: block.end_column,
        };
        let attrs = block.attrs;

        // Match tag name using byte comparison
        if tag_name_eq(block.tag_name, TAG_TEMPLATE) {
            if descriptor.template.is_some() {
                descriptor.warnings.push(SfcError::new(
                    "DUPLICATE_TEMPLATE",
                    "SFC can only contain one <template> block; ignoring the later one",
                    Some(loc.start),
                ));
            } else {
                let lang = attrs.get("lang").cloned();
                let children = if lang.as_deref().is_none_or(|l| l == "html") {
                    parse_template(source, loc.start, loc.end)?
                } else {
                    descriptor.warnings.push(SfcError::new(
                        "TEMPLATE_LANG",
                        "template language is not html; its nodes are not parsed",
                        Some(loc.start),
                    ));
                    Vec::new()
                };
                descriptor.template = Some(SfcTemplateBlock {
                    content: block.content,
                    loc,
                    lang,
                    src: attrs.get("src").cloned(),
                    attrs,
                    children,
                });
            }
        } else if tag_name_eq(block.tag_name, TAG_SCRIPT) {
            let is_setup = attrs.contains_key("setup");
            let script_block = SfcScriptBlock {
                content: block.content,
                loc,
                lang: attrs.get("lang").cloned(),
                src: attrs.get("src").cloned(),
                setup: is_setup,
                attrs,
            };

            let (slot, code, message) = if is_setup {
                (
                    &mut descriptor.script_setup,
                    "DUPLICATE_SCRIPT_SETUP",
                    "SFC can only contain one <script setup> block; ignoring the later one",
                )
            } else {
                (
                    &mut descriptor.script,
                    "DUPLICATE_SCRIPT",
                    "SFC can only contain one <script> block; ignoring the later one",
                )
            };
            if slot.is_some() {
                let offset = script_block.loc.start;
                descriptor
                    .warnings
                    .push(SfcError::new(code, message, Some(offset)));
            } else {
                *slot = Some(script_block);
            }
        } else if tag_name_eq(block.tag_name, TAG_STYLE) {
            descriptor.styles.push(SfcStyleBlock {
                content: block.content,
                loc,
                lang: attrs.get("lang").cloned(),
                scoped: attrs.contains_key("scoped"),
                attrs,
            });
        } else {
            // Tag names only contain ASCII bytes (see `is_tag_name_char_fast`)
            let tag_str = std::str::from_utf8(block.tag_name).unwrap_or_default();
            descriptor.custom_blocks.push(SfcCustomBlock {
                block_type: Cow::Borrowed(tag_str),
                content: block.content,
                loc,
                attrs,
            });
        }

        pos = block.end_pos;
        line = block.end_line;
        column = block.end_column;
    }

    Ok(descriptor)
}

/// Advance line/column over skipped bytes.
#[inline]
fn advance_position(skipped: &[u8], line: &mut usize, column: &mut usize) {
    for &b in skipped {
        if b == b'\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

/// Fast tag name comparison using byte slices
#[inline(always)]
fn tag_name_eq(name: &[u8], expected: &[u8]) -> bool {
    name.len() == expected.len() && name.eq_ignore_ascii_case(expected)
}

/// Check whether `<name` starts at `pos` followed by a tag boundary.
fn opens_tag(bytes: &[u8], pos: usize, name: &[u8]) -> bool {
    let after = pos + 1 + name.len();
    bytes.get(pos) == Some(&b'<')
        && starts_with_bytes(&bytes[pos + 1..], name)
        && bytes
            .get(after)
            .is_none_or(|&b| is_whitespace_fast(b) || b == b'>' || b == b'/')
}

/// Parse a single block from the source using byte operations
fn parse_block_fast<'a>(
    bytes: &[u8],
    source: &'a str,
    start: usize,
    start_line: usize,
) -> Option<RawBlock<'a>> {
    let len = bytes.len();

    // Skip '<'
    let mut pos = start + 1;
    if pos >= len {
        return None;
    }

    // Parse tag name - find end of tag name
    let tag_start = pos;
    while pos < len && is_tag_name_char_fast(bytes[pos]) {
        pos += 1;
    }

    if pos == tag_start {
        return None;
    }

    let tag_name = &source.as_bytes()[tag_start..pos];
    let (attrs, after_attrs) = parse_attributes(bytes, source, pos);
    pos = after_attrs;

    // Handle self-closing tag
    if pos > 0 && pos < len && bytes[pos - 1] == b'/' {
        pos += 1;
        return Some(RawBlock {
            tag_name,
            attrs,
            content: Cow::Borrowed(""),
            content_start: pos,
            content_end: pos,
            end_pos: pos,
            end_line: start_line,
            end_column: pos - start,
        });
    }

    // Skip '>'
    if pos < len && bytes[pos] == b'>' {
        pos += 1;
    } else {
        return None;
    }

    let content_start = pos;

    if tag_name.eq_ignore_ascii_case(TAG_TEMPLATE) {
        return find_template_end(bytes, source, tag_name, attrs, content_start, start_line);
    }

    let closing_tag = if tag_name.eq_ignore_ascii_case(TAG_SCRIPT) {
        CLOSING_SCRIPT
    } else if tag_name.eq_ignore_ascii_case(TAG_STYLE) {
        CLOSING_STYLE
    } else {
        return find_custom_block_end(bytes, source, tag_name, attrs, content_start, start_line);
    };

    let mut line = start_line;
    let mut last_newline = start;

    // Fast path for script/style using memchr
    while pos < len {
        let lt_offset = memchr(b'<', &bytes[pos..])?;
        for (i, &b) in bytes[pos..pos + lt_offset].iter().enumerate() {
            if b == b'\n' {
                line += 1;
                last_newline = pos + i;
            }
        }
        pos += lt_offset;

        if starts_with_bytes(&bytes[pos..], closing_tag) {
            let end_pos = pos + closing_tag.len();
            return Some(RawBlock {
                tag_name,
                attrs,
                content: Cow::Borrowed(&source[content_start..pos]),
                content_start,
                content_end: pos,
                end_pos,
                end_line: line,
                end_column: end_pos - last_newline,
            });
        }
        pos += 1;
    }

    None
}

/// Parse attributes of an opening tag starting right after its name.
///
/// Returns the attributes and the position of the terminating `>`, or `len`
/// when the tag is never closed.
fn parse_attributes<'a>(bytes: &[u8], source: &'a str, mut pos: usize) -> (Attrs<'a>, usize) {
    let len = bytes.len();
    let mut attrs: Attrs<'a> = FxHashMap::default();

    while pos < len && bytes[pos] != b'>' {
        // Skip whitespace
        while pos < len && is_whitespace_fast(bytes[pos]) {
            pos += 1;
        }

        if pos >= len || bytes[pos] == b'>' {
            break;
        }
        if bytes[pos] == b'/' {
            if bytes.get(pos + 1) == Some(&b'>') {
                pos += 1;
                break;
            }
            pos += 1;
            continue;
        }

        // Parse attribute name
        let attr_start = pos;
        while pos < len && !matches!(bytes[pos], b'=' | b'>' | b'/') && !is_whitespace_fast(bytes[pos])
        {
            pos += 1;
        }

        if pos == attr_start {
            pos += 1;
            continue;
        }

        let attr_name: Cow<'a, str> = Cow::Borrowed(&source[attr_start..pos]);

        // Skip whitespace
        while pos < len && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }

        let attr_value: Cow<'a, str> = if pos < len && bytes[pos] == b'=' {
            pos += 1;

            while pos < len && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
                pos += 1;
            }

            if pos < len && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote_char = bytes[pos];
                pos += 1;
                let value_start = pos;
                let value_end = memchr(quote_char, &bytes[pos..])
                    .map(|i| pos + i)
                    .unwrap_or(len);
                pos = (value_end + 1).min(len);
                Cow::Borrowed(&source[value_start..value_end])
            } else {
                // Unquoted value
                let value_start = pos;
                while pos < len && !matches!(bytes[pos], b'>' | b'/') && !is_whitespace_fast(bytes[pos])
                {
                    pos += 1;
                }
                Cow::Borrowed(&source[value_start..pos])
            }
        } else {
            // Boolean attribute
            Cow::Borrowed("")
        };

        attrs.entry(attr_name).or_insert(attr_value);
    }

    (attrs, pos)
}

/// Find the end of a template block, tracking nested `<template>` tags.
fn find_template_end<'a>(
    bytes: &[u8],
    source: &'a str,
    tag_name: &'a [u8],
    attrs: Attrs<'a>,
    content_start: usize,
    start_line: usize,
) -> Option<RawBlock<'a>> {
    let len = bytes.len();
    let mut pos = content_start;
    let mut depth = 1;
    let mut line = start_line;
    let mut last_newline = content_start;

    while pos < len {
        if bytes[pos] == b'\n' {
            line += 1;
            last_newline = pos;
        }

        if bytes[pos] == b'<' {
            // Tags inside comments do not count
            if bytes[pos..].starts_with(b"<!--") {
                let end = memmem::find(&bytes[pos + 4..], b"-->")
                    .map(|i| pos + 4 + i + 3)
                    .unwrap_or(len);
                for (i, &b) in bytes[pos..end].iter().enumerate() {
                    if b == b'\n' {
                        line += 1;
                        last_newline = pos + i;
                    }
                }
                pos = end;
                continue;
            }

            if starts_with_bytes(&bytes[pos..], CLOSING_TEMPLATE) {
                depth -= 1;
                if depth == 0 {
                    let end_pos = pos + CLOSING_TEMPLATE.len();
                    return Some(RawBlock {
                        tag_name,
                        attrs,
                        content: Cow::Borrowed(&source[content_start..pos]),
                        content_start,
                        content_end: pos,
                        end_pos,
                        end_line: line,
                        end_column: end_pos - last_newline,
                    });
                }
                pos += CLOSING_TEMPLATE.len();
                continue;
            }

            // Nested opening tag, unless self-closing
            if opens_tag(bytes, pos, TAG_TEMPLATE) {
                let tag_end = memchr(b'>', &bytes[pos..]).map(|i| pos + i);
                let self_closing = tag_end.is_some_and(|end| bytes[end - 1] == b'/');
                if !self_closing {
                    depth += 1;
                }
            }
        }

        pos += 1;
    }

    None
}

/// Find the end of a custom block (non-template/script/style)
fn find_custom_block_end<'a>(
    bytes: &[u8],
    source: &'a str,
    tag_name: &'a [u8],
    attrs: Attrs<'a>,
    content_start: usize,
    start_line: usize,
) -> Option<RawBlock<'a>> {
    let len = bytes.len();
    let mut pos = content_start;
    let mut line = start_line;
    let mut last_newline = content_start;

    while pos < len {
        let lt_offset = memchr(b'<', &bytes[pos..])?;
        for (i, &b) in bytes[pos..pos + lt_offset].iter().enumerate() {
            if b == b'\n' {
                line += 1;
                last_newline = pos + i;
            }
        }
        pos += lt_offset;

        // Check for </name>
        if pos + 2 < len && bytes[pos + 1] == b'/' {
            let close_tag_start = pos + 2;
            let after_name = close_tag_start + tag_name.len();
            if after_name < len
                && bytes[close_tag_start..after_name].eq_ignore_ascii_case(tag_name)
                && bytes[after_name] == b'>'
            {
                let end_pos = after_name + 1;
                return Some(RawBlock {
                    tag_name,
                    attrs,
                    content: Cow::Borrowed(&source[content_start..pos]),
                    content_start,
                    content_end: pos,
                    end_pos,
                    end_line: line,
                    end_column: end_pos - last_newline,
                });
            }
        }
        pos += 1;
    }

    None
}

/// Fast byte slice prefix check
#[inline(always)]
pub(crate) fn starts_with_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// Fast tag name character check
#[inline(always)]
pub(crate) fn is_tag_name_char_fast(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b':')
}

/// Fast whitespace check
#[inline(always)]
pub(crate) fn is_whitespace_fast(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}
