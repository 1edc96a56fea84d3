//! # Cadre
//!
//! Build-time injection of FormKit's lazy provider into Vue components.
//!
//! **Cadre** is the frame around a picture: every component that renders
//! FormKit inputs gets wrapped in `FormKitLazyProvider`, which holds the
//! subtree back until the shared FormKit configuration has loaded.
//!
//! ## Crates
//!
//! - [`carton`] - Shared names and collection helpers
//! - [`relief`] - Source documents, injection plans and the text splicer
//! - [`atelier_sfc`] - SFC parsing and source-level injection
//! - [`atelier_js`] - Injection into compiled render code
//!
//! ## Example
//!
//! ```
//! use cadre::{Cadre, CadreOptions};
//!
//! let cadre = Cadre::with_root(CadreOptions::default(), std::env::temp_dir());
//! let out = cadre
//!     .transform("<template><FormKit /></template>", "/src/App.vue")
//!     .unwrap()
//!     .unwrap();
//! assert!(out.code.contains("<FormKitLazyProvider :config=\"__formkitConfig\"><FormKit /></FormKitLazyProvider>"));
//! ```

pub mod detect;
mod error;
pub mod options;
mod plugin;
pub mod resolve;

pub use detect::{is_candidate, transform_include};
pub use error::{CadreError, CadreResult};
pub use options::{load_options, CadreOptions, RewriteMode};
pub use plugin::{Cadre, TransformOutput};
pub use resolve::{build_virtual_module, resolve_config};

/// Shared names and collection helpers.
pub use cadre_carton as carton;

/// Source documents, injection plans and the text splicer.
pub use cadre_relief as relief;

/// SFC parsing and source-level injection.
pub use cadre_atelier_sfc as atelier_sfc;

/// Injection into compiled render code.
pub use cadre_atelier_js as atelier_js;
