//! Detection gate.
//!
//! Cheap textual checks run before any parsing. False positives only cost a
//! parse; false negatives would leave a component unwrapped.

use cadre_carton::PROVIDER_MODULE;
use once_cell::sync::Lazy;
use regex::Regex;

/// FormKit tags in source templates, resolved FormKit components in compiled
/// output, or an import from the FormKit Vue package.
static CANDIDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<FormKit|<form-kit|resolveComponent\(\s*["'](?:FormKit|form-kit)["']\s*\)|from\s*["']@formkit/vue["']"#,
    )
    .expect("candidate pattern")
});

static VUE_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.vue(?:\?.+)?$").expect("vue file pattern"));

/// Whether `code` likely uses FormKit.
pub fn is_candidate(code: &str) -> bool {
    CANDIDATE_RE.is_match(code)
}

/// Whether a module id should be handed to the transform at all: Vue
/// components (with or without a query) and the FormKit Vue package itself.
pub fn transform_include(id: &str) -> bool {
    VUE_FILE_RE.is_match(id) || id.contains(PROVIDER_MODULE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_source() {
        assert!(is_candidate("<template><FormKit type=\"text\" /></template>"));
        assert!(is_candidate("<template><form-kit /></template>"));
        assert!(!is_candidate("<template><div>FormKit</div></template>"));
    }

    #[test]
    fn test_candidate_compiled() {
        assert!(is_candidate(r#"const _component_FormKit = _resolveComponent("FormKit")"#));
        assert!(is_candidate("resolveComponent('form-kit')"));
        assert!(is_candidate("import { FormKit } from '@formkit/vue'"));
        assert!(is_candidate(r#"import{FormKit}from"@formkit/vue""#));
        assert!(!is_candidate(r#"_resolveComponent("RouterView")"#));
        assert!(!is_candidate("import { ref } from 'vue'"));
    }

    #[test]
    fn test_transform_include() {
        assert!(transform_include("/src/App.vue"));
        assert!(transform_include("/src/App.VUE"));
        assert!(transform_include("/src/App.vue?vue&type=script&setup=true&lang.ts"));
        assert!(transform_include("/node_modules/@formkit/vue/dist/index.mjs"));
        assert!(!transform_include("/src/main.ts"));
        assert!(!transform_include("/src/App.vue.ts"));
    }
}
