//! Options and `cadre.config.json` loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cadre_carton::DEFAULT_CONFIG_FILE;

use crate::error::CadreResult;

/// Name of the options file looked up in the project root.
pub const OPTIONS_FILE: &str = "cadre.config.json";

/// Which representation `transform` should assume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// Decide per file: text starting with `<` is a component source
    #[default]
    Auto,
    /// Vue single-file component source
    Source,
    /// JavaScript compiled from a component
    Compiled,
}

/// Plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CadreOptions {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// User configuration module, without or with extension. `null` disables
    /// configuration lookup.
    pub config_file: Option<String>,

    /// Merge the user configuration with FormKit's defaults.
    pub default_config: bool,

    /// Emit source maps for rewritten files.
    pub sourcemap: bool,

    /// Representation of transformed files.
    pub mode: RewriteMode,
}

impl Default for CadreOptions {
    fn default() -> Self {
        Self {
            schema: None,
            config_file: Some(DEFAULT_CONFIG_FILE.to_string()),
            default_config: true,
            sourcemap: false,
            mode: RewriteMode::Auto,
        }
    }
}

impl CadreOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(content: &str) -> CadreResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Load `cadre.config.json` from `dir` (or the working directory).
///
/// A missing file yields the defaults; an unreadable or invalid one is
/// reported and also yields the defaults.
pub fn load_options(dir: Option<&Path>) -> CadreOptions {
    let base = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let options_path = base.join(OPTIONS_FILE);

    if !options_path.exists() {
        return CadreOptions::default();
    }

    match std::fs::read_to_string(&options_path) {
        Ok(content) => match CadreOptions::from_json(&content) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(path = %options_path.display(), "{}", e);
                CadreOptions::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %options_path.display(), "failed to read options: {}", e);
            CadreOptions::default()
        }
    }
}
