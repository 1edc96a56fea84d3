//! Config marker substitution.
//!
//! The FormKit runtime ships `load(/* @__formkit.config.ts__ */ fallback)`
//! placeholders; each one is pointed at the resolved configuration file.

use cadre_relief::{RewriteError, Splicer};
use once_cell::sync::Lazy;
use regex::Regex;

static CONFIG_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(/\*\s?@__formkit\.config\.ts__\s?\*/.+)\)").expect("config marker pattern")
});

/// Whether `code` contains a config marker.
pub fn has_config_marker(code: &str) -> bool {
    CONFIG_MARKER_RE.is_match(code)
}

/// Overwrite every marker (through its closing parenthesis) with the quoted
/// `config_path`. Returns the number of markers replaced.
pub fn substitute_config_marker(
    splicer: &mut Splicer<'_>,
    code: &str,
    config_path: &str,
) -> Result<usize, RewriteError> {
    let replacement = format!("{})", quote(config_path));
    let mut count = 0;
    for m in CONFIG_MARKER_RE.find_iter(code) {
        splicer.overwrite(m.start(), m.end(), replacement.as_str())?;
        count += 1;
    }
    Ok(count)
}

/// JavaScript string literal for `value`.
pub(crate) fn quote(value: &str) -> String {
    // JSON strings are valid JavaScript string literals
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
