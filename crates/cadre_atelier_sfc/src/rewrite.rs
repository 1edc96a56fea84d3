//! Source-level provider injection.

use crate::parse::parse_sfc;
use crate::plan::{plan_import, plan_wrapper};
use crate::types::SfcParseOptions;
use cadre_relief::{RewriteError, RewriteResult, Rewriter, SourceDocument, Splicer};

/// Options for [`SfcRewriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SfcRewriteOptions {
    /// Emit a source map for rewritten files
    pub source_map: bool,
}

/// Wraps the rendered output of an SFC in the provider component.
///
/// Files that cannot be parsed, have no template, or need no wrapping are
/// passed through untouched; only a broken edit is reported as an error.
#[derive(Debug, Clone, Default)]
pub struct SfcRewriter {
    options: SfcRewriteOptions,
}

impl SfcRewriter {
    pub fn new(options: SfcRewriteOptions) -> Self {
        Self { options }
    }
}

impl Rewriter for SfcRewriter {
    fn rewrite(&self, document: &SourceDocument<'_>) -> Result<RewriteResult, RewriteError> {
        let options = SfcParseOptions {
            filename: document.path().to_string(),
        };
        let descriptor = match parse_sfc(document.source, options) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                tracing::warn!(
                    id = document.id,
                    code = err.code(),
                    offset = ?err.offset,
                    "skipping component: {}",
                    err
                );
                return Ok(RewriteResult::unchanged(document.source));
            }
        };

        for warning in &descriptor.warnings {
            tracing::debug!(id = document.id, code = warning.code(), "{}", warning);
        }

        let wrapper = match plan_wrapper(&descriptor) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(id = document.id, code = err.code(), "skipping component: {}", err);
                return Ok(RewriteResult::unchanged(document.source));
            }
        };
        if wrapper.is_empty() {
            tracing::debug!(id = document.id, "nothing to wrap");
            return Ok(RewriteResult::unchanged(document.source));
        }

        let imports = plan_import(&descriptor);
        let mut splicer = Splicer::new(document.source);
        splicer.apply(&wrapper)?.apply(&imports)?;
        tracing::debug!(
            id = document.id,
            insertions = wrapper.len() + imports.len(),
            "injected provider"
        );

        Ok(splicer.finish(document.path(), self.options.source_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(source: &str) -> RewriteResult {
        SfcRewriter::default()
            .rewrite(&SourceDocument::new("/src/test.vue", source))
            .unwrap()
    }

    #[test]
    fn test_bare_template() {
        let result = rewrite("<template>\n  <FormKit />\n</template>");
        assert!(result.changed);
        insta::assert_snapshot!(result.code, @r#"
<script setup>
import { FormKitLazyProvider } from '@formkit/vue';
import __formkitConfig from 'virtual:formkit/config';
</script>
<template>
  <FormKitLazyProvider :config="__formkitConfig"><FormKit /></FormKitLazyProvider>
</template>
"#);
    }

    #[test]
    fn test_single_root_element() {
        let source = "<template>\n    <div class=\"fizzbuzz\">\n      <FormKit />\n    </div>\n  </template>";
        let result = rewrite(source);
        assert_eq!(
            result.code,
            "<script setup>\nimport { FormKitLazyProvider } from '@formkit/vue';\nimport __formkitConfig from 'virtual:formkit/config';\n</script>\n<template>\n    <div class=\"fizzbuzz\">\n      <FormKitLazyProvider :config=\"__formkitConfig\"><FormKit /></FormKitLazyProvider>\n    </div>\n  </template>"
        );
    }

    #[test]
    fn test_existing_setup_block() {
        let source = "<script setup lang=\"ts\">\nimport { ref } from 'vue'\nconst value = ref('')\n</script>\n\n<template>\n  <h1>About</h1>\n  <FormKit v-model=\"value\" />\n</template>\n";
        let result = rewrite(source);
        insta::assert_snapshot!(result.code, @r#"
<script setup lang="ts">
import { FormKitLazyProvider } from '@formkit/vue';
import __formkitConfig from 'virtual:formkit/config';
import { ref } from 'vue'
const value = ref('')
</script>

<template>
  <FormKitLazyProvider :config="__formkitConfig"><h1>About</h1>
  <FormKit v-model="value" /></FormKitLazyProvider>
</template>
"#);
    }

    #[test]
    fn test_options_api_component() {
        let source = "<script lang=\"ts\">\nexport default { name: 'Contact' }\n</script>\n<template><FormKit type=\"form\" /></template>";
        let result = rewrite(source);
        assert!(result
            .code
            .starts_with("<script setup lang=\"ts\">\nimport { FormKitLazyProvider }"));
        assert!(result.code.contains("</script>\n<script lang=\"ts\">\nexport default"));
        assert!(result.code.ends_with(
            "<template><FormKitLazyProvider :config=\"__formkitConfig\"><FormKit type=\"form\" /></FormKitLazyProvider></template>"
        ));
    }

    #[test]
    fn test_idempotent() {
        let once = rewrite("<template>\n  <div>\n    <FormKit />\n  </div>\n</template>");
        let twice = rewrite(&once.code);
        assert!(!twice.changed);
        assert_eq!(twice.code, once.code);
    }

    #[test]
    fn test_passes_through_without_template() {
        let source = "<script setup>\nconst a = 1\n</script>";
        let result = rewrite(source);
        assert!(!result.changed);
        assert_eq!(result.code, source);
    }

    #[test]
    fn test_passes_through_parse_error() {
        let source = "<template><div><FormKit /></template>";
        let result = rewrite(source);
        assert!(!result.changed);
        assert_eq!(result.code, source);
    }

    #[test]
    fn test_source_map() {
        let rewriter = SfcRewriter::new(SfcRewriteOptions { source_map: true });
        let result = rewriter
            .rewrite(&SourceDocument::new(
                "/src/test.vue?vue",
                "<template>\n  <FormKit />\n</template>",
            ))
            .unwrap();

        let map = result.map.as_ref().expect("source map");
        // `<template>` moved from line 0 to line 4
        let token = map.lookup_token(4, 0).unwrap();
        assert_eq!(token.get_src_line(), 0);
        assert_eq!(token.get_source(), Some("/src/test.vue"));
    }
}
