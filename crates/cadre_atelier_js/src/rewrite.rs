//! Compiled-output provider injection.

use cadre_carton::{
    unique_alias, PROVIDER_COMPONENT, PROVIDER_MODULE, RUNTIME_MODULE, VNODE_HELPER,
};
use cadre_relief::{
    InjectionPlan, RewriteError, RewriteResult, Rewriter, SourceDocument, Splicer,
};
use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::imports::ImportBindings;
use crate::marker::{quote, substitute_config_marker};
use crate::walker::CallCollector;

/// Options for [`JsRewriter`].
#[derive(Debug, Clone)]
pub struct JsRewriteOptions {
    /// Absolute path of the resolved configuration module
    pub config_file: Option<String>,

    /// Emit a source map for rewritten modules
    pub source_map: bool,

    /// Wrap block initializers in the provider. When false only config
    /// markers are substituted.
    pub inject_provider: bool,
}

impl Default for JsRewriteOptions {
    fn default() -> Self {
        Self {
            config_file: None,
            source_map: false,
            inject_provider: true,
        }
    }
}

/// Wraps the block initializers of compiled render code in the provider.
///
/// `(openBlock(), createElementBlock(...))` becomes
/// `(openBlock(), __createVNode(__FormKitLazyProvider, null, { default: () => createElementBlock(...) }))`.
/// Only the wrapper text and the imports it needs are inserted; the rest of
/// the module is copied as is.
#[derive(Debug, Clone, Default)]
pub struct JsRewriter {
    options: JsRewriteOptions,
}

impl JsRewriter {
    pub fn new(options: JsRewriteOptions) -> Self {
        Self { options }
    }

    /// Plan the provider injection for `document` into `splicer`.
    ///
    /// Returns the number of wrapped calls.
    fn inject(
        &self,
        document: &SourceDocument<'_>,
        splicer: &mut Splicer<'_>,
    ) -> Result<usize, RewriteError> {
        let allocator = Allocator::default();
        // Compiled SFC ids keep their `.vue` extension
        let source_type =
            SourceType::from_path(document.path()).unwrap_or_else(|_| SourceType::mjs());
        let ret = Parser::new(&allocator, document.source, source_type).parse();

        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .first()
                .map(|err| err.to_string())
                .unwrap_or_else(|| "parser gave up".to_string());
            return Err(RewriteError::Parse {
                id: document.id.to_string(),
                message,
            });
        }

        let bindings = ImportBindings::collect(&ret.program);
        let Some(runtime_import_end) = bindings.first_runtime_import_end else {
            tracing::debug!(id = document.id, "no runtime import");
            return Ok(0);
        };

        let mut provider_import = InjectionPlan::new();
        let provider = match &bindings.provider {
            Some(local) => local.clone(),
            None => {
                let alias = unique_alias(PROVIDER_COMPONENT, &bindings.taken);
                provider_import.insert_before(
                    runtime_import_end as usize,
                    format!(
                        "\nimport {{ {} as {} }} from {};",
                        PROVIDER_COMPONENT,
                        alias,
                        quote(PROVIDER_MODULE)
                    ),
                );
                alias
            }
        };

        let mut collector = CallCollector::new(&bindings);
        collector.visit_program(&ret.program);
        if collector.targets.is_empty() {
            tracing::debug!(id = document.id, "no block initializer to wrap");
            splicer.apply(&provider_import)?;
            return Ok(0);
        }

        let mut head = InjectionPlan::new();
        let vnode = match bindings.vnode_helper() {
            Some(local) => local.clone(),
            None => {
                let alias = unique_alias(VNODE_HELPER, &bindings.taken);
                head.insert_after(
                    0,
                    format!(
                        "import {{ {} as {} }} from {};\n",
                        VNODE_HELPER,
                        alias,
                        quote(RUNTIME_MODULE)
                    ),
                );
                alias
            }
        };

        let config = match &self.options.config_file {
            Some(path) => format!("{{configFile: {}}}", quote(path)),
            None => "null".to_string(),
        };
        let open = format!("{}({}, {}, {{ default: () => ", vnode, provider, config);

        let mut calls = InjectionPlan::new();
        for span in &collector.targets {
            calls
                .insert_after(span.start as usize, open.as_str())
                .insert_before(span.end as usize, " })");
        }

        splicer.apply(&head)?.apply(&provider_import)?.apply(&calls)?;
        Ok(collector.targets.len())
    }
}

impl Rewriter for JsRewriter {
    fn rewrite(&self, document: &SourceDocument<'_>) -> Result<RewriteResult, RewriteError> {
        let mut splicer = Splicer::new(document.source);

        if self.options.inject_provider {
            let wrapped = self.inject(document, &mut splicer)?;
            if wrapped > 0 {
                tracing::debug!(id = document.id, wrapped, "wrapped block initializers");
            }
        }

        if let Some(config) = &self.options.config_file {
            let replaced = substitute_config_marker(&mut splicer, document.source, config)?;
            if replaced > 0 {
                tracing::debug!(id = document.id, replaced, "substituted config markers");
            }
        }

        Ok(splicer.finish(document.path(), self.options.source_map))
    }
}
