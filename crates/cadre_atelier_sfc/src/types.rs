//! SFC type definitions.
//!
//! Zero-copy design: block contents, attributes and template tags borrow from
//! the original source. Every offset is relative to the untouched source.

use cadre_carton::FxHashMap;
use serde::Serialize;
use std::borrow::Cow;

/// SFC Descriptor - parsed result of a .vue file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcDescriptor<'a> {
    /// Filename
    pub filename: Cow<'a, str>,

    /// Source code
    #[serde(skip)]
    pub source: Cow<'a, str>,

    /// Template block
    pub template: Option<SfcTemplateBlock<'a>>,

    /// Script block (options API or <script> without setup)
    pub script: Option<SfcScriptBlock<'a>>,

    /// Script setup block
    pub script_setup: Option<SfcScriptBlock<'a>>,

    /// Style blocks
    pub styles: Vec<SfcStyleBlock<'a>>,

    /// Custom blocks
    pub custom_blocks: Vec<SfcCustomBlock<'a>>,

    /// Non-fatal findings (ignored duplicate blocks, unparsed templates)
    pub warnings: Vec<SfcError>,
}

impl<'a> Default for SfcDescriptor<'a> {
    fn default() -> Self {
        Self {
            filename: Cow::Borrowed(""),
            source: Cow::Borrowed(""),
            template: None,
            script: None,
            script_setup: None,
            styles: Vec::new(),
            custom_blocks: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Template block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcTemplateBlock<'a> {
    /// Block content
    pub content: Cow<'a, str>,

    /// Block location in source
    pub loc: BlockLocation,

    /// Template language (default: html)
    pub lang: Option<Cow<'a, str>>,

    /// Source attribute for external template
    pub src: Option<Cow<'a, str>>,

    /// Additional attributes
    pub attrs: FxHashMap<Cow<'a, str>, Cow<'a, str>>,

    /// Parsed top-level template nodes
    pub children: Vec<TemplateNode<'a>>,
}

/// Script block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcScriptBlock<'a> {
    /// Block content
    pub content: Cow<'a, str>,

    /// Block location in source
    pub loc: BlockLocation,

    /// Script language (js/ts)
    pub lang: Option<Cow<'a, str>>,

    /// Source attribute for external script
    pub src: Option<Cow<'a, str>>,

    /// Whether this is script setup
    pub setup: bool,

    /// Additional attributes
    pub attrs: FxHashMap<Cow<'a, str>, Cow<'a, str>>,
}

/// Style block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcStyleBlock<'a> {
    /// Block content
    pub content: Cow<'a, str>,

    /// Block location in source
    pub loc: BlockLocation,

    /// Style language (css/scss/less/etc)
    pub lang: Option<Cow<'a, str>>,

    /// Whether the style is scoped
    pub scoped: bool,

    /// Additional attributes
    pub attrs: FxHashMap<Cow<'a, str>, Cow<'a, str>>,
}

/// Custom block (e.g., <i18n>, <docs>)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcCustomBlock<'a> {
    /// Block type/tag name
    #[serde(rename = "type")]
    pub block_type: Cow<'a, str>,

    /// Block content
    pub content: Cow<'a, str>,

    /// Block location in source
    pub loc: BlockLocation,

    /// Additional attributes
    pub attrs: FxHashMap<Cow<'a, str>, Cow<'a, str>>,
}

/// Location information for a block's content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLocation {
    /// Start offset of the content in source
    pub start: usize,

    /// End offset of the content in source
    pub end: usize,

    /// Start line (1-based)
    pub start_line: usize,

    /// Start column (1-based)
    pub start_column: usize,

    /// End line (1-based)
    pub end_line: usize,

    /// End column (1-based)
    pub end_column: usize,
}

/// Span of a template node: from its first byte to just past its last byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeLocation {
    pub start: usize,
    pub end: usize,
}

/// Template node, as far as provider placement cares about it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TemplateNode<'a> {
    Element(ElementNode<'a>),
    Text(TextNode<'a>),
    Comment(CommentNode<'a>),
}

impl<'a> TemplateNode<'a> {
    /// Location of the node.
    pub fn loc(&self) -> NodeLocation {
        match self {
            TemplateNode::Element(el) => el.loc,
            TemplateNode::Text(text) => text.loc,
            TemplateNode::Comment(comment) => comment.loc,
        }
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&ElementNode<'a>> {
        match self {
            TemplateNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Element node
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode<'a> {
    /// Tag name as written
    pub tag: &'a str,

    /// From `<` of the opening tag to past `>` of the closing tag
    pub loc: NodeLocation,

    /// Written as `<tag ... />`
    pub self_closing: bool,

    /// Child nodes (whitespace-only text removed)
    pub children: Vec<TemplateNode<'a>>,
}

/// Text node, trimmed of surrounding whitespace.
#[derive(Debug, Clone, Serialize)]
pub struct TextNode<'a> {
    pub content: &'a str,
    pub loc: NodeLocation,
}

/// Comment node, `<!--` and `-->` included in `loc`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode<'a> {
    pub content: &'a str,
    pub loc: NodeLocation,
}

/// Parse options for SFC
#[derive(Debug, Clone, Default)]
pub struct SfcParseOptions {
    /// Filename
    pub filename: String,
}

/// SFC error/warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct SfcError {
    /// Error message
    pub message: String,

    /// Error code
    pub code: Option<String>,

    /// Offset in source the error points at
    pub offset: Option<usize>,
}

impl SfcError {
    pub(crate) fn new(code: &str, message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.to_string()),
            offset,
        }
    }

    /// The error code, or an empty string.
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }
}
