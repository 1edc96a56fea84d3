//! Relief - Source text and span handling for Cadre.
//!
//! Every Cadre pipeline ends in the same place: a list of insertions (and the
//! occasional overwrite) expressed in the coordinates of the untouched input,
//! rendered once by the [`Splicer`]. This crate holds that shared layer:
//!
//! - [`SourceDocument`]: the file being rewritten
//! - [`InjectionPlan`] / [`Insertion`] / [`Anchor`]: planned edits
//! - [`Splicer`]: renders edits and the optional source map
//! - [`Rewriter`] / [`RewriteResult`] / [`RewriteError`]: the contract both
//!   rewriters implement

pub mod document;
pub mod error;
pub mod plan;
pub mod splice;

pub use document::SourceDocument;
pub use error::RewriteError;
pub use plan::{Anchor, InjectionPlan, Insertion};
pub use splice::{RewriteResult, Splicer};

/// A rewriter turns one source document into a [`RewriteResult`].
///
/// Implemented by the source-level SFC rewriter and by the compiled-output
/// rewriter, so callers (and tests) can drive either behind one contract.
pub trait Rewriter {
    /// Rewrite `document`. Returning a result with `changed == false` means
    /// the original text is passed through untouched.
    fn rewrite(&self, document: &SourceDocument<'_>) -> Result<RewriteResult, RewriteError>;
}
