//! Configuration resolution and the virtual configuration module.

use std::path::{Component, Path, PathBuf};

use cadre_carton::{CONFIG_EXTENSIONS, PROVIDER_MODULE};

/// Resolve the user configuration module to an absolute path.
///
/// A `config_file` that already ends in a recognized extension is probed as
/// is; otherwise each extension is tried in priority order (`ts`, `mjs`,
/// `js`). Relative paths are resolved against `root`. A missing file is not
/// an error.
pub fn resolve_config(config_file: &str, root: &Path) -> Option<PathBuf> {
    let has_extension = Path::new(config_file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext));

    let candidates: Vec<PathBuf> = if has_extension {
        vec![absolutize(root, config_file)]
    } else {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| absolutize(root, &format!("{}.{}", config_file, ext)))
            .collect()
    };

    let found = candidates.into_iter().find(|path| path.is_file());
    match &found {
        Some(path) => tracing::debug!(path = %path.display(), "resolved config"),
        None => tracing::debug!(config_file, "no config file found"),
    }
    found
}

fn absolutize(root: &Path, path: &str) -> PathBuf {
    root.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Source of the virtual configuration module.
///
/// With `include_defaults` the user configuration (a value or a function
/// returning one) is passed through FormKit's `defaultConfig`.
pub fn build_virtual_module(resolved: Option<&Path>, include_defaults: bool) -> String {
    match (resolved, include_defaults) {
        (Some(path), true) => format!(
            "import {{ defaultConfig }} from '{module}';\n\
             import userConfig from {path};\n\
             const config = typeof userConfig === 'function' ? userConfig() : userConfig;\n\
             export default defaultConfig(config);\n",
            module = PROVIDER_MODULE,
            path = js_string(path),
        ),
        (Some(path), false) => format!(
            "import userConfig from {path};\n\
             export default userConfig;\n",
            path = js_string(path),
        ),
        (None, true) => format!(
            "import {{ defaultConfig }} from '{}';\n\
             export default defaultConfig();\n",
            PROVIDER_MODULE
        ),
        (None, false) => "export default {};\n".to_string(),
    }
}

fn js_string(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    serde_json::to_string(&path).unwrap_or_else(|_| format!("\"{}\"", path))
}
