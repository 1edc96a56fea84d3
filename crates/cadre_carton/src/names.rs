//! Names of the injected constructs.
//!
//! Both pipelines (source-level and compiled-output) inject the same family
//! of constructs, so the identifiers live here.

use phf::phf_set;

/// Module the Vue runtime helpers are imported from.
pub const RUNTIME_MODULE: &str = "vue";

/// Module exporting the provider component and `defaultConfig`.
pub const PROVIDER_MODULE: &str = "@formkit/vue";

/// Provider component wrapped around rendered output.
pub const PROVIDER_COMPONENT: &str = "FormKitLazyProvider";

/// Kebab-case spelling of [`PROVIDER_COMPONENT`].
pub const PROVIDER_COMPONENT_KEBAB: &str = "form-kit-lazy-provider";

/// Generic VNode creation helper used for the deferred invocation.
pub const VNODE_HELPER: &str = "createVNode";

/// Prefix of every alias Cadre introduces into a compiled module.
pub const ALIAS_PREFIX: &str = "__";

/// Local name the SFC pipeline binds the virtual configuration to.
pub const CONFIG_BINDING: &str = "__formkitConfig";

/// Public id of the virtual configuration module.
pub const VIRTUAL_CONFIG_ID: &str = "virtual:formkit/config";

/// Resolved id of the virtual configuration module (`\0`-prefixed so other
/// plugins leave it alone).
pub const RESOLVED_VIRTUAL_CONFIG_ID: &str = "\0virtual:formkit/config";

/// Conventional configuration module name, resolved against the project root.
pub const DEFAULT_CONFIG_FILE: &str = "./formkit.config";

/// Recognized configuration module extensions, in probing priority order.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["ts", "mjs", "js"];

/// Runtime helpers the Vue compiler emits to construct a renderable block.
pub static BLOCK_INITIALIZERS: phf::Set<&'static str> = phf_set! {
    "createBlock",
    "createCommentVNode",
    "createElementBlock",
    "createStaticVNode",
    "createTextVNode",
    "createVNode",
};

/// Check whether `name` is one of the [`BLOCK_INITIALIZERS`].
#[inline]
pub fn is_block_initializer(name: &str) -> bool {
    BLOCK_INITIALIZERS.contains(name)
}
