//! End-to-end behavior of the plugin facade against a project on disk.

use std::fs;

use cadre::{Cadre, CadreOptions, RewriteMode};

const RENDER: &str = r#"import { openBlock as _openBlock, createBlock as _createBlock } from "vue"
import { FormKit } from "@formkit/vue"

export function render() {
  return (_openBlock(), _createBlock(FormKit, { type: "text" }))
}
"#;

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("formkit.config.ts"),
        "import { defineFormKitConfig } from '@formkit/vue'\nexport default defineFormKitConfig({})\n",
    )
    .unwrap();
    dir
}

#[test]
fn compiled_render_receives_config_path() {
    let dir = project();
    let cadre = Cadre::with_root(CadreOptions::default(), dir.path());
    let config = cadre.resolved_config().unwrap();
    assert!(config.ends_with("formkit.config.ts"));

    let out = cadre.transform(RENDER, "/src/App.vue").unwrap().unwrap();
    let expected_arg = format!(
        "{{configFile: {}}}",
        serde_json::to_string(&config.to_string_lossy()).unwrap()
    );
    assert!(out.code.contains(&format!(
        "__createVNode(__FormKitLazyProvider, {}, {{ default: () => _createBlock(FormKit, {{ type: \"text\" }}) }})",
        expected_arg
    )));
    assert!(out.map.is_none());
}

#[test]
fn virtual_module_imports_user_config() {
    let dir = project();
    let cadre = Cadre::with_root(CadreOptions::default(), dir.path());

    let resolved = cadre.resolve_id("virtual:formkit/config").unwrap();
    let module = cadre.load(resolved).unwrap();
    let config = cadre.resolved_config().unwrap();

    assert!(module.starts_with("import { defaultConfig } from '@formkit/vue';\n"));
    assert!(module.contains(&format!(
        "import userConfig from {};",
        serde_json::to_string(&config.to_string_lossy()).unwrap()
    )));
    assert!(module.trim_end().ends_with("export default defaultConfig(config);"));
}

#[test]
fn explicit_extension_is_probed_exactly() {
    let dir = project();
    fs::write(dir.path().join("formkit.config.mjs"), "export default {}\n").unwrap();

    let cadre = Cadre::with_root(
        CadreOptions {
            config_file: Some("./formkit.config.mjs".to_string()),
            ..Default::default()
        },
        dir.path(),
    );
    assert!(cadre.resolved_config().unwrap().ends_with("formkit.config.mjs"));

    let missing = Cadre::with_root(
        CadreOptions {
            config_file: Some("./formkit.config.js".to_string()),
            ..Default::default()
        },
        dir.path(),
    );
    assert!(missing.resolved_config().is_none());
}

#[test]
fn source_map_points_back_to_original() {
    let dir = project();
    let cadre = Cadre::with_root(
        CadreOptions {
            sourcemap: true,
            mode: RewriteMode::Source,
            ..Default::default()
        },
        dir.path(),
    );

    let source = "<template>\n  <FormKit />\n</template>\n";
    let out = cadre.transform(source, "/src/App.vue").unwrap().unwrap();
    let map = out.map.expect("source map requested");

    let parsed = sourcemap::SourceMap::from_slice(map.as_bytes()).unwrap();
    assert_eq!(parsed.get_source(0), Some("/src/App.vue"));
    // `</template>` moved from line 2 to line 6 (0-based)
    let token = parsed.lookup_token(6, 0).unwrap();
    assert_eq!(token.get_src_line(), 2);
}

#[test]
fn only_vue_modules_are_included() {
    let dir = project();
    let cadre = Cadre::with_root(CadreOptions::default(), dir.path());
    assert!(cadre.transform_include("/src/App.vue"));
    assert!(cadre.transform_include("/src/App.vue?vue&type=script&setup=true&lang.ts"));
    assert!(!cadre.transform_include("/src/main.ts"));
}
