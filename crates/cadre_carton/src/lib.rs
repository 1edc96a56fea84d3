//! Carton - The shared toolbox for Cadre.
//!
//! This crate holds the names every Cadre pipeline agrees on (runtime module,
//! provider component, virtual configuration module, block-initializer
//! helpers) together with the small collection types used across crates.
//!
//! # Modules
//!
//! - **names**: Fixed identifiers of the injected constructs
//! - **general**: Tag classification and alias helpers
//!
//! # Example
//!
//! ```
//! use cadre_carton::{is_block_initializer, is_framework_tag, PROVIDER_COMPONENT};
//!
//! assert!(is_block_initializer("createElementBlock"));
//! assert!(is_framework_tag("FormKit"));
//! assert_eq!(PROVIDER_COMPONENT, "FormKitLazyProvider");
//! ```

pub mod general;
pub mod names;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export shared utilities
pub use general::*;
pub use names::*;
