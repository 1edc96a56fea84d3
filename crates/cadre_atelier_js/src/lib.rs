//! # cadre_atelier_js
//!
//! Atelier JS - provider injection into JavaScript compiled from Vue
//! components.
//!
//! The module is parsed with oxc, read only:
//!
//! 1. [`ImportBindings`] records what the top-level imports bind, including
//!    the local names of the runtime's block initializers.
//! 2. [`CallCollector`] walks the program and picks the initializer calls
//!    that sit directly inside a sequence expression.
//! 3. [`JsRewriter`] splices the wrapper and the imports it needs around
//!    those spans, leaving every other byte of the module as it was.

pub mod imports;
pub mod marker;
mod rewrite;
pub mod walker;

pub use imports::ImportBindings;
pub use marker::{has_config_marker, substitute_config_marker};
pub use rewrite::{JsRewriteOptions, JsRewriter};
pub use walker::{CallCollector, Descend};
