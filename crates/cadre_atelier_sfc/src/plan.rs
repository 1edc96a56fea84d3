//! Provider injection planning.
//!
//! Decides where the provider tags and their imports go in an SFC. Planning
//! only reads the descriptor; every offset refers to the untouched source.

use crate::types::*;
use cadre_carton::{
    is_framework_tag, is_provider_tag, CONFIG_BINDING, PROVIDER_COMPONENT, PROVIDER_MODULE,
    VIRTUAL_CONFIG_ID,
};
use cadre_relief::InjectionPlan;

const BOM: char = '\u{feff}';

/// Children of the template the provider should wrap.
///
/// A template whose only child is an ordinary (non-FormKit, non-self-closing)
/// element keeps that element as the component root, so its children are
/// wrapped instead.
pub fn resolve_wrap_target<'d, 'a>(
    template: &'d SfcTemplateBlock<'a>,
) -> &'d [TemplateNode<'a>] {
    match template.children.as_slice() {
        [TemplateNode::Element(root)] if !is_framework_tag(root.tag) && !root.self_closing => {
            &root.children
        }
        children => children,
    }
}

/// Plan the opening and closing provider tags.
///
/// The plan is empty when there is nothing to wrap or the target already
/// consists of a single provider element.
pub fn plan_wrapper(descriptor: &SfcDescriptor<'_>) -> Result<InjectionPlan, SfcError> {
    let Some(template) = &descriptor.template else {
        return Err(SfcError::new(
            "MISSING_TEMPLATE",
            "component has no <template> block",
            None,
        ));
    };

    let mut plan = InjectionPlan::new();
    let target = resolve_wrap_target(template);
    let (Some(first), Some(last)) = (target.first(), target.last()) else {
        return Ok(plan);
    };
    if is_already_wrapped(target) {
        return Ok(plan);
    }

    plan.insert_after(first.loc().start, opening_tag())
        .insert_before(last.loc().end, closing_tag());
    Ok(plan)
}

/// Plan the imports the provider tags need.
///
/// With a `<script setup>` block the imports open its content; otherwise a
/// new setup block is added at the start of the file, carrying the `lang` of
/// a plain `<script>` block if there is one.
pub fn plan_import(descriptor: &SfcDescriptor<'_>) -> InjectionPlan {
    let mut plan = InjectionPlan::new();
    let imports = import_statements();

    if let Some(setup) = &descriptor.script_setup {
        let text = if setup.content.starts_with(['\n', '\r']) {
            format!("\n{}", imports)
        } else {
            format!("{}\n", imports)
        };
        plan.insert_after(setup.loc.start, text);
        return plan;
    }

    let lang = descriptor
        .script
        .as_ref()
        .and_then(|script| script.lang.as_deref());
    let open = match lang {
        Some(lang) => format!("<script setup lang=\"{}\">", lang),
        None => "<script setup>".to_string(),
    };
    plan.insert_before(
        leading_bom_len(&descriptor.source),
        format!("{}\n{}\n</script>\n", open, imports),
    );
    plan
}

/// Byte length of a leading byte order mark, which must stay first.
fn leading_bom_len(source: &str) -> usize {
    if source.starts_with(BOM) {
        BOM.len_utf8()
    } else {
        0
    }
}

/// `<FormKitLazyProvider :config="__formkitConfig">`
pub fn opening_tag() -> String {
    format!("<{} :config=\"{}\">", PROVIDER_COMPONENT, CONFIG_BINDING)
}

/// `</FormKitLazyProvider>`
pub fn closing_tag() -> String {
    format!("</{}>", PROVIDER_COMPONENT)
}

fn import_statements() -> String {
    format!(
        "import {{ {} }} from '{}';\nimport {} from '{}';",
        PROVIDER_COMPONENT, PROVIDER_MODULE, CONFIG_BINDING, VIRTUAL_CONFIG_ID
    )
}

fn is_already_wrapped(target: &[TemplateNode<'_>]) -> bool {
    let mut nodes = target
        .iter()
        .filter(|node| !matches!(node, TemplateNode::Comment(_)));
    match (nodes.next(), nodes.next()) {
        (Some(TemplateNode::Element(el)), None) => is_provider_tag(el.tag),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_sfc;
    use cadre_relief::Anchor;

    fn descriptor(source: &str) -> SfcDescriptor<'_> {
        parse_sfc(source, Default::default()).unwrap()
    }

    fn offsets(plan: &InjectionPlan) -> Vec<(usize, Anchor)> {
        plan.iter().map(|i| (i.offset, i.anchor)).collect()
    }

    #[test]
    fn test_wraps_template_children() {
        let source = "<template>\n  <FormKit />\n</template>";
        let plan = plan_wrapper(&descriptor(source)).unwrap();

        assert_eq!(offsets(&plan), vec![(13, Anchor::After), (24, Anchor::Before)]);
        assert_eq!(plan.iter().next().unwrap().text, opening_tag());
    }

    #[test]
    fn test_wraps_inside_single_root() {
        let source = "<template><div class=\"x\"><h1>a</h1><FormKit/></div></template>";
        let d = descriptor(source);
        let target = resolve_wrap_target(d.template.as_ref().unwrap());
        assert_eq!(target.len(), 2);

        let plan = plan_wrapper(&d).unwrap();
        let first = plan.iter().next().unwrap().offset;
        let last = plan.iter().last().unwrap().offset;
        assert_eq!(&source[first..last], "<h1>a</h1><FormKit/>");
    }

    #[test]
    fn test_self_closing_root_is_wrapped() {
        let source = "<template><MyForm /></template>";
        let plan = plan_wrapper(&descriptor(source)).unwrap();
        assert_eq!(offsets(&plan), vec![(10, Anchor::After), (20, Anchor::Before)]);
    }

    #[test]
    fn test_framework_root_is_wrapped() {
        let source = "<template><FormKit type=\"form\"><FormKit/></FormKit></template>";
        let plan = plan_wrapper(&descriptor(source)).unwrap();
        assert_eq!(plan.iter().next().unwrap().offset, 10);
        assert_eq!(plan.iter().last().unwrap().offset, source.len() - 11);
    }

    #[test]
    fn test_multiple_roots() {
        let source = "<template><header/>\n<main></main></template>";
        let plan = plan_wrapper(&descriptor(source)).unwrap();
        assert_eq!(offsets(&plan), vec![(10, Anchor::After), (33, Anchor::Before)]);
    }

    #[test]
    fn test_empty_target() {
        assert!(plan_wrapper(&descriptor("<template>\n</template>"))
            .unwrap()
            .is_empty());
        assert!(plan_wrapper(&descriptor("<template><div>  </div></template>"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_already_wrapped() {
        let source = "<template>\n  <!-- form -->\n  <FormKitLazyProvider :config=\"__formkitConfig\"><FormKit /></FormKitLazyProvider>\n</template>";
        assert!(plan_wrapper(&descriptor(source)).unwrap().is_empty());

        let source = "<template><div><form-kit-lazy-provider><p/></form-kit-lazy-provider></div></template>";
        assert!(plan_wrapper(&descriptor(source)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_template() {
        let err = plan_wrapper(&descriptor("<script setup>let a</script>")).unwrap_err();
        assert_eq!(err.code(), "MISSING_TEMPLATE");
    }

    #[test]
    fn test_import_into_setup_block() {
        let source = "<script setup lang=\"ts\">\nimport { ref } from 'vue'\n</script>";
        let plan = plan_import(&descriptor(source));
        let insertion = plan.iter().next().unwrap();

        assert_eq!(insertion.offset, 24);
        assert_eq!(insertion.anchor, Anchor::After);
        assert!(insertion.text.starts_with("\nimport { FormKitLazyProvider }"));
        assert!(insertion.text.ends_with("'virtual:formkit/config';"));
    }

    #[test]
    fn test_import_into_inline_setup_block() {
        let source = "<script setup>const a = 1</script>";
        let plan = plan_import(&descriptor(source));
        let insertion = plan.iter().next().unwrap();
        assert_eq!(insertion.offset, 14);
        assert!(insertion.text.ends_with(";\n"));
    }

    #[test]
    fn test_new_setup_block_copies_lang() {
        let source = "<script lang=\"ts\">export default {}</script>";
        let plan = plan_import(&descriptor(source));
        let insertion = plan.iter().next().unwrap();

        assert_eq!((insertion.offset, insertion.anchor), (0, Anchor::Before));
        assert_eq!(
            insertion.text,
            "<script setup lang=\"ts\">\nimport { FormKitLazyProvider } from '@formkit/vue';\nimport __formkitConfig from 'virtual:formkit/config';\n</script>\n"
        );
    }

    #[test]
    fn test_new_setup_block_after_byte_order_mark() {
        let plan = plan_import(&descriptor("\u{feff}<template><p/></template>"));
        let insertion = plan.iter().next().unwrap();
        assert_eq!(insertion.offset, 3);
    }

    #[test]
    fn test_new_setup_block_without_script() {
        let plan = plan_import(&descriptor("<template><p/></template>"));
        assert!(plan.iter().next().unwrap().text.starts_with("<script setup>\n"));
    }
}
