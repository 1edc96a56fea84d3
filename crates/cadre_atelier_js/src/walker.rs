//! Call pass: finds the block-initializer calls to wrap.

use oxc_ast::ast::{Argument, CallExpression, Expression, SequenceExpression};
use oxc_ast_visit::Visit;
use oxc_span::Span;

use crate::imports::ImportBindings;

/// Whether the walker should descend into a node it just handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Continue,
    Skip,
}

/// Collects the spans of block-initializer calls that are direct members of
/// a sequence expression (`(openBlock(), createElementBlock(...))`).
pub struct CallCollector<'b> {
    bindings: &'b ImportBindings,
    provider: Option<&'b str>,
    /// Spans of the calls to wrap, in source order
    pub targets: Vec<Span>,
}

impl<'b> CallCollector<'b> {
    pub fn new(bindings: &'b ImportBindings) -> Self {
        Self {
            bindings,
            provider: bindings.provider.as_deref(),
            targets: Vec::new(),
        }
    }

    fn handle_sequence_member(&mut self, expr: &Expression<'_>) -> Descend {
        let Expression::CallExpression(call) = expr else {
            return Descend::Continue;
        };
        if !self.is_initializer_call(call) {
            return Descend::Continue;
        }
        // Already wrapped on an earlier pass
        if self.is_provider_call(call) {
            return Descend::Skip;
        }
        self.targets.push(call.span);
        Descend::Skip
    }

    fn is_initializer_call(&self, call: &CallExpression<'_>) -> bool {
        matches!(
            &call.callee,
            Expression::Identifier(ident) if self.bindings.is_initializer_local(ident.name.as_str())
        )
    }

    fn is_provider_call(&self, call: &CallExpression<'_>) -> bool {
        match (call.arguments.first(), self.provider) {
            (Some(Argument::Identifier(ident)), Some(provider)) => ident.name.as_str() == provider,
            _ => false,
        }
    }
}

impl<'a> Visit<'a> for CallCollector<'_> {
    fn visit_sequence_expression(&mut self, it: &SequenceExpression<'a>) {
        for expr in &it.expressions {
            match self.handle_sequence_member(expr) {
                Descend::Continue => self.visit_expression(expr),
                Descend::Skip => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn targets(source: &str) -> Vec<&str> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty());
        let bindings = ImportBindings::collect(&ret.program);
        let mut collector = CallCollector::new(&bindings);
        collector.visit_program(&ret.program);
        collector
            .targets
            .iter()
            .map(|span| &source[span.start as usize..span.end as usize])
            .collect()
    }

    #[test]
    fn test_sequence_member_is_target() {
        let source = r#"import { openBlock as _openBlock, createElementBlock as _createElementBlock } from "vue";
export function render() {
  return (_openBlock(), _createElementBlock("div", null, "hi"))
}"#;
        assert_eq!(targets(source), vec![r#"_createElementBlock("div", null, "hi")"#]);
    }

    #[test]
    fn test_call_outside_sequence_is_ignored() {
        let source = r#"import { createVNode as _createVNode } from "vue";
const a = _createVNode("div");
function f() { return _createVNode("span") }"#;
        assert!(targets(source).is_empty());
    }

    #[test]
    fn test_unimported_callee_is_ignored() {
        let source = "const x = (openBlock(), createElementBlock('div'));";
        assert!(targets(source).is_empty());
    }

    #[test]
    fn test_nested_sequences_wrap_outermost_only() {
        let source = r#"import { openBlock, createBlock } from "vue";
const x = (openBlock(), createBlock(A, null, { default: () => (openBlock(), createBlock(B)) }));
const y = (openBlock(), createBlock(C));"#;
        let found = targets(source);
        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with("createBlock(A"));
        assert_eq!(found[1], "createBlock(C)");
    }

    #[test]
    fn test_descends_into_unmatched_members() {
        let source = r#"import { openBlock, createBlock } from "vue";
const x = (openBlock(), wrap((openBlock(), createBlock(B))));"#;
        assert_eq!(targets(source), vec!["createBlock(B)"]);
    }

    #[test]
    fn test_provider_call_is_not_rewrapped() {
        let source = r#"import { createVNode as __createVNode, openBlock } from "vue";
import { FormKitLazyProvider as __FormKitLazyProvider } from "@formkit/vue";
const x = (openBlock(), __createVNode(__FormKitLazyProvider, null, { default: () => 1 }));"#;
        assert!(targets(source).is_empty());
    }
}
