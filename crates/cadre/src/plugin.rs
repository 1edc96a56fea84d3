//! Plugin facade.
//!
//! Mirrors the hooks a bundler plugin exposes (`transformInclude`,
//! `resolveId`, `load`, `transform`) as plain methods, so a host binding or
//! the CLI can drive the rewriters the same way.

use std::path::{Path, PathBuf};

use cadre_atelier_js::{has_config_marker, JsRewriteOptions, JsRewriter};
use cadre_atelier_sfc::{SfcRewriteOptions, SfcRewriter};
use cadre_carton::{RESOLVED_VIRTUAL_CONFIG_ID, VIRTUAL_CONFIG_ID};
use cadre_relief::{Rewriter, SourceDocument};

use crate::detect::{is_candidate, transform_include};
use crate::error::CadreResult;
use crate::options::{CadreOptions, RewriteMode};
use crate::resolve::{build_virtual_module, resolve_config};

/// Rewritten module handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Rewritten code
    pub code: String,

    /// Source map as JSON, when enabled
    pub map: Option<String>,
}

/// One plugin instance, created once per build.
#[derive(Debug, Clone)]
pub struct Cadre {
    options: CadreOptions,
    root: PathBuf,
}

impl Cadre {
    /// Create an instance rooted at the current working directory.
    pub fn new(options: CadreOptions) -> Self {
        let root = std::env::current_dir().unwrap_or_default();
        Self::with_root(options, root)
    }

    /// Create an instance resolving relative paths against `root`.
    pub fn with_root(options: CadreOptions, root: impl Into<PathBuf>) -> Self {
        Self {
            options,
            root: root.into(),
        }
    }

    pub fn options(&self) -> &CadreOptions {
        &self.options
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the configuration module. Never cached: the file may appear or
    /// disappear during a watch session.
    pub fn resolved_config(&self) -> Option<PathBuf> {
        let config_file = self.options.config_file.as_deref()?;
        resolve_config(config_file, &self.root)
    }

    /// Whether `id` should be transformed at all.
    pub fn transform_include(&self, id: &str) -> bool {
        transform_include(id)
    }

    /// Claim the virtual configuration module.
    pub fn resolve_id(&self, id: &str) -> Option<&'static str> {
        (id == VIRTUAL_CONFIG_ID).then_some(RESOLVED_VIRTUAL_CONFIG_ID)
    }

    /// Serve the virtual configuration module.
    pub fn load(&self, id: &str) -> Option<String> {
        if id != RESOLVED_VIRTUAL_CONFIG_ID {
            return None;
        }
        let resolved = self.resolved_config();
        Some(build_virtual_module(
            resolved.as_deref(),
            self.options.default_config,
        ))
    }

    /// Rewrite `code`. `Ok(None)` means the module is left as it is.
    pub fn transform(&self, code: &str, id: &str) -> CadreResult<Option<TransformOutput>> {
        let candidate = is_candidate(code);
        let config = self.resolved_config();
        let has_marker = config.is_some() && has_config_marker(code);
        if !candidate && !has_marker {
            tracing::trace!(id, "not a candidate");
            return Ok(None);
        }

        let mode = self.mode_for(code);
        let rewriter: Box<dyn Rewriter> = if mode == RewriteMode::Source {
            if !candidate {
                return Ok(None);
            }
            Box::new(SfcRewriter::new(SfcRewriteOptions {
                source_map: self.options.sourcemap,
            }))
        } else {
            Box::new(JsRewriter::new(JsRewriteOptions {
                config_file: config.map(|path| path.to_string_lossy().into_owned()),
                source_map: self.options.sourcemap,
                inject_provider: candidate,
            }))
        };
        tracing::debug!(id, ?mode, "transforming");

        let result = rewriter.rewrite(&SourceDocument::new(id, code))?;
        if !result.changed {
            return Ok(None);
        }
        let map = result.map_json()?;
        Ok(Some(TransformOutput {
            code: result.code,
            map,
        }))
    }

    /// The representation to assume for `code`: never [`RewriteMode::Auto`].
    pub fn mode_for(&self, code: &str) -> RewriteMode {
        match self.options.mode {
            RewriteMode::Auto => {
                let text = code.trim_start_matches(|c: char| c == '\u{feff}' || c.is_whitespace());
                if text.starts_with('<') {
                    RewriteMode::Source
                } else {
                    RewriteMode::Compiled
                }
            }
            mode => mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(root: &Path) -> Cadre {
        Cadre::with_root(CadreOptions::default(), root)
    }

    #[test]
    fn test_mode_detection() {
        let dir = tempfile::tempdir().unwrap();
        let cadre = plugin(dir.path());
        assert_eq!(cadre.mode_for("\n  <template></template>"), RewriteMode::Source);
        assert_eq!(cadre.mode_for("import { h } from 'vue'"), RewriteMode::Compiled);

        let forced = Cadre::with_root(
            CadreOptions {
                mode: RewriteMode::Compiled,
                ..Default::default()
            },
            dir.path(),
        );
        assert_eq!(forced.mode_for("<template></template>"), RewriteMode::Compiled);
    }

    #[test]
    fn test_byte_order_mark_is_source() {
        let dir = tempfile::tempdir().unwrap();
        let cadre = plugin(dir.path());
        assert_eq!(
            cadre.mode_for("\u{feff}<template></template>"),
            RewriteMode::Source
        );

        let source = "\u{feff}<template>\n  <FormKit />\n</template>\n";
        let out = cadre.transform(source, "/src/A.vue").unwrap().unwrap();
        assert!(out.code.starts_with("\u{feff}<script setup>\n"));
        assert!(out
            .code
            .contains("<FormKitLazyProvider :config=\"__formkitConfig\"><FormKit /></FormKitLazyProvider>"));
    }

    #[test]
    fn test_non_candidate_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let out = plugin(dir.path())
            .transform("<template><div /></template>", "/src/A.vue")
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_virtual_module_hooks() {
        let dir = tempfile::tempdir().unwrap();
        let cadre = plugin(dir.path());

        assert_eq!(
            cadre.resolve_id("virtual:formkit/config"),
            Some("\0virtual:formkit/config")
        );
        assert_eq!(cadre.resolve_id("./formkit.config"), None);
        assert!(cadre.load("virtual:formkit/config").is_none());

        let module = cadre.load("\0virtual:formkit/config").unwrap();
        assert!(module.contains("export default defaultConfig();"));

        // Resolution is not cached
        std::fs::write(dir.path().join("formkit.config.ts"), "export default {}").unwrap();
        let module = cadre.load("\0virtual:formkit/config").unwrap();
        assert!(module.contains("import userConfig from"));
    }

    #[test]
    fn test_disabled_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("formkit.config.ts"), "").unwrap();
        let cadre = Cadre::with_root(
            CadreOptions {
                config_file: None,
                default_config: false,
                ..Default::default()
            },
            dir.path(),
        );
        assert!(cadre.resolved_config().is_none());
        assert_eq!(
            cadre.load("\0virtual:formkit/config").as_deref(),
            Some("export default {};\n")
        );
    }

    #[test]
    fn test_marker_only_module() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("formkit.config.ts");
        std::fs::write(&config, "").unwrap();

        let code = "import { createVNode } from 'vue';\nconst c = load(/* @__formkit.config.ts__ */ './x');\nconst a = (0, createVNode(A));";
        let out = plugin(dir.path())
            .transform(code, "/node_modules/@formkit/vue/dist/index.mjs")
            .unwrap()
            .unwrap();

        assert!(out
            .code
            .contains(&format!("load({})", serde_json::to_string(&config.to_string_lossy()).unwrap())));
        assert!(!out.code.contains("FormKitLazyProvider"));
    }

    #[test]
    fn test_compiled_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = plugin(dir.path())
            .transform("import { FormKit } from '@formkit/vue'; (", "/src/A.vue")
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse /src/A.vue"));
    }
}
