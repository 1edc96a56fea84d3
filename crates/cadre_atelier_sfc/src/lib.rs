//! # cadre_atelier_sfc
//!
//! Atelier SFC - source-level provider injection for Vue single-file
//! components.
//!
//! ```text
//! source ──parse_sfc──▶ SfcDescriptor ──plan_wrapper──▶ InjectionPlan ─┐
//!                            │                                          ├─▶ Splicer
//!                            └──────────plan_import───▶ InjectionPlan ─┘
//! ```
//!
//! [`parse_sfc`] locates the top-level blocks and parses the template into a
//! tree of offsets. The planners decide where the provider tags and imports
//! go, and [`SfcRewriter`] renders both plans against the original text.

pub mod parse;
pub mod plan;
mod rewrite;
pub mod template;
pub mod types;

pub use parse::parse_sfc;
pub use plan::{plan_import, plan_wrapper, resolve_wrap_target};
pub use rewrite::{SfcRewriteOptions, SfcRewriter};
pub use template::parse_template;
pub use types::*;
