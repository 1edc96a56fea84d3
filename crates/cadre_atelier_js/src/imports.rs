//! Import pass over a compiled module.

use cadre_carton::{
    is_block_initializer, CompactString, FxHashMap, FxHashSet, PROVIDER_COMPONENT,
    PROVIDER_MODULE, RUNTIME_MODULE, VNODE_HELPER,
};
use oxc_ast::ast::{ImportDeclarationSpecifier, Program, Statement};

/// What the top-level imports of one module bind.
///
/// Built fresh for every module; never shared between calls.
#[derive(Debug, Default)]
pub struct ImportBindings {
    /// Every local name bound by an import
    pub taken: FxHashSet<CompactString>,

    /// Block initializers imported from the runtime: imported name to local
    pub block_initializers: FxHashMap<CompactString, CompactString>,

    /// Local name of an existing provider import
    pub provider: Option<CompactString>,

    /// End offset of the first runtime import declaration
    pub first_runtime_import_end: Option<u32>,
}

impl ImportBindings {
    /// Collect bindings from the top-level import declarations of `program`.
    pub fn collect(program: &Program<'_>) -> Self {
        let mut bindings = Self::default();

        for stmt in &program.body {
            let Statement::ImportDeclaration(decl) = stmt else {
                continue;
            };
            let from = decl.source.value.as_str();
            let is_runtime = from == RUNTIME_MODULE && !decl.import_kind.is_type();
            if is_runtime && bindings.first_runtime_import_end.is_none() {
                bindings.first_runtime_import_end = Some(decl.span.end);
            }

            let Some(specifiers) = &decl.specifiers else {
                continue;
            };
            for specifier in specifiers {
                match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(s) => {
                        let local = s.local.name.as_str();
                        bindings.taken.insert(CompactString::from(local));
                        if decl.import_kind.is_type() || s.import_kind.is_type() {
                            continue;
                        }

                        let imported = s.imported.name();
                        if is_runtime && is_block_initializer(imported.as_str()) {
                            bindings.block_initializers.insert(
                                CompactString::from(imported.as_str()),
                                CompactString::from(local),
                            );
                        }
                        if from == PROVIDER_MODULE
                            && imported.as_str() == PROVIDER_COMPONENT
                            && bindings.provider.is_none()
                        {
                            bindings.provider = Some(CompactString::from(local));
                        }
                    }
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                        bindings.taken.insert(CompactString::from(s.local.name.as_str()));
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                        bindings.taken.insert(CompactString::from(s.local.name.as_str()));
                    }
                }
            }
        }

        bindings
    }

    /// Whether `name` is the local name of an imported block initializer.
    pub fn is_initializer_local(&self, name: &str) -> bool {
        self.block_initializers.values().any(|local| local == name)
    }

    /// Local name of the runtime's `createVNode`, if imported.
    pub fn vnode_helper(&self) -> Option<&CompactString> {
        self.block_initializers.get(VNODE_HELPER)
    }
}
