//! Live node to text
//!
//! Rendering tries the configured [RenderStrategy] list in order and returns the first text
//! produced. A strategy that does not apply to the node, or that fails, hands over to the next
//! one; when none is left the node has no text form and `None` comes back.

use crate::config::{RenderSettings, RenderStrategy};
use crate::dom::serialize::{serialize_children, serialize_node};
use crate::dom::{insert_at, remove_from_parent, Dialect, Document, Handle, NodeData};
use crate::error::ConversionError;
use tracing::debug;

/// Render `node` as text in `dialect`; `None` for an absent node
pub fn render(node: Option<&Handle>, dialect: Dialect, settings: &RenderSettings) -> Option<String> {
    let node = node?;
    for strategy in &settings.strategies {
        match render_with(*strategy, node, dialect) {
            Ok(Some(text)) => return Some(text),
            Ok(None) => debug!(?strategy, "render strategy not applicable"),
            Err(err) => debug!(?strategy, error = %err, "render strategy failed"),
        }
    }
    None
}

fn render_with(
    strategy: RenderStrategy,
    node: &Handle,
    dialect: Dialect,
) -> Result<Option<String>, ConversionError> {
    match strategy {
        RenderStrategy::Standard => serialize_node(node, dialect).map(Some),
        RenderStrategy::LegacyProperty => Ok(node
            .element_state()
            .and_then(|state| state.legacy_markup.borrow().clone())
            .filter(|text| !text.is_empty())),
        RenderStrategy::OuterMarkup => {
            if node.is_element() {
                serialize_node(node, Dialect::Html).map(Some)
            } else {
                Ok(None)
            }
        }
        RenderStrategy::ScratchContainer => scratch_container(node),
    }
}

/// Move `node` into a throwaway `div`, take the div's inner markup, then put `node` back
fn scratch_container(node: &Handle) -> Result<Option<String>, ConversionError> {
    // Appending would move a fragment's children out and a document cannot be appended at all
    if matches!(node.data, NodeData::Fragment | NodeData::Document { .. }) {
        return Ok(None);
    }

    let scratch = Document::html().create_element("div")?;
    let origin = node.parent().zip(remove_from_parent(node));
    insert_at(&scratch, None, node.clone())?;
    let text = serialize_children(&scratch, Dialect::Html);
    remove_from_parent(node);
    if let Some((parent, index)) = origin {
        insert_at(&parent, Some(index), node.clone())?;
    }
    text.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::append;

    fn only(strategy: RenderStrategy) -> RenderSettings {
        RenderSettings {
            strategies: vec![strategy],
        }
    }

    #[test]
    fn absent_node_renders_nothing() {
        assert_eq!(render(None, Dialect::Html, &RenderSettings { strategies: vec![] }), None);
    }

    #[test]
    fn legacy_property_is_used_when_set() {
        let doc = Document::xml();
        let node = doc.create_element("foo").unwrap();
        if let Some(state) = node.element_state() {
            *state.legacy_markup.borrow_mut() = Some("<foo legacy=\"1\"/>".to_string());
        }
        assert_eq!(
            render(Some(&node), Dialect::Xml, &only(RenderStrategy::LegacyProperty)).as_deref(),
            Some("<foo legacy=\"1\"/>")
        );
    }

    #[test]
    fn outer_markup_only_renders_elements() {
        let doc = Document::html();
        let text = doc.create_text("x");
        assert_eq!(render(Some(&text), Dialect::Html, &only(RenderStrategy::OuterMarkup)), None);
    }

    #[test]
    fn falls_through_to_the_next_strategy() {
        let doc = Document::html();
        let node = doc.create_element("em").unwrap();
        let settings = RenderSettings {
            strategies: vec![RenderStrategy::LegacyProperty, RenderStrategy::OuterMarkup],
        };
        assert_eq!(render(Some(&node), Dialect::Html, &settings).as_deref(), Some("<em></em>"));
    }

    #[test]
    fn scratch_container_restores_position() {
        let doc = Document::html();
        let list = doc.create_element("ul").unwrap();
        let first = doc.create_element("li").unwrap();
        let second = doc.create_element("li").unwrap();
        append(&second, doc.create_text("b")).unwrap();
        append(&list, first).unwrap();
        append(&list, second.clone()).unwrap();
        append(&list, doc.create_element("li").unwrap()).unwrap();

        assert_eq!(
            render(Some(&second), Dialect::Html, &only(RenderStrategy::ScratchContainer)).as_deref(),
            Some("<li>b</li>")
        );
        let children = list.child_nodes();
        assert_eq!(children.len(), 3);
        assert!(std::rc::Rc::ptr_eq(&children[1], &second));
    }
}
