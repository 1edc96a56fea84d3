//! General helpers shared by the rewriters.

use crate::names::{ALIAS_PREFIX, PROVIDER_COMPONENT, PROVIDER_COMPONENT_KEBAB};
use crate::{CompactString, FxHashSet};

/// Tag prefixes of FormKit's own components, in PascalCase and kebab-case.
const FRAMEWORK_TAG_PREFIXES: [&str; 2] = ["FormKit", "form-kit"];

/// Check if a template tag belongs to FormKit itself (`FormKit`,
/// `FormKitSchema`, `form-kit`, ...).
#[inline]
pub fn is_framework_tag(tag: &str) -> bool {
    FRAMEWORK_TAG_PREFIXES
        .iter()
        .any(|prefix| tag.starts_with(prefix))
}

/// Check if a template tag is the injected provider.
#[inline]
pub fn is_provider_tag(tag: &str) -> bool {
    tag == PROVIDER_COMPONENT || tag == PROVIDER_COMPONENT_KEBAB
}

/// Build the `__`-prefixed alias for `name`, appending a numeric suffix until
/// it does not collide with any name in `taken`.
pub fn unique_alias(name: &str, taken: &FxHashSet<CompactString>) -> CompactString {
    let mut alias = CompactString::with_capacity(ALIAS_PREFIX.len() + name.len());
    alias.push_str(ALIAS_PREFIX);
    alias.push_str(name);

    if !taken.contains(&alias) {
        return alias;
    }

    let mut n = 1usize;
    loop {
        let candidate = compact_str::format_compact!("{}{}", alias, n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
