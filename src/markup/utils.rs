//! Structural helpers on markup nodes
//!
//! Shape tests and small mutators used by the reader, the codec and callers assembling markup
//! by hand. None of them touch a live tree.

use super::{AttributeValue, Attributes, Element, MarkupNode, RawMarkup};

/// Anything that can be appended to an element with [Element::append_child]
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Node(MarkupNode),
    Attributes(Attributes),
}

impl From<MarkupNode> for Slot {
    fn from(node: MarkupNode) -> Self {
        Slot::Node(node)
    }
}

impl From<Element> for Slot {
    fn from(element: Element) -> Self {
        Slot::Node(MarkupNode::Element(element))
    }
}

impl From<Attributes> for Slot {
    fn from(attributes: Attributes) -> Self {
        Slot::Attributes(attributes)
    }
}

impl From<&str> for Slot {
    fn from(text: &str) -> Self {
        Slot::Node(MarkupNode::Text(text.to_string()))
    }
}

impl From<String> for Slot {
    fn from(text: String) -> Self {
        Slot::Node(MarkupNode::Text(text))
    }
}

impl From<RawMarkup> for Slot {
    fn from(raw: RawMarkup) -> Self {
        Slot::Node(MarkupNode::Raw(raw))
    }
}

impl Slot {
    /// True for an attributes mapping
    pub fn is_attributes(&self) -> bool {
        matches!(self, Slot::Attributes(_))
    }
}

impl MarkupNode {
    /// True for an element with the empty tag
    pub fn is_fragment(&self) -> bool {
        matches!(self, MarkupNode::Element(element) if element.is_fragment())
    }

    /// Tag of an element, empty for anything else
    pub fn tag_name(&self) -> &str {
        match self {
            MarkupNode::Element(element) => &element.tag,
            _ => "",
        }
    }

    /// Elements and text literals are both valid JsonML nodes
    pub fn is_element(&self) -> bool {
        matches!(self, MarkupNode::Element(_) | MarkupNode::Text(_))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, MarkupNode::Raw(_))
    }

    pub fn has_attributes(&self) -> bool {
        self.as_element().is_some_and(Element::has_attributes)
    }

    /// Children of an element, empty for text
    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Element(element) => &element.children,
            _ => &[],
        }
    }
}

impl Element {
    /// True even when the mapping is empty
    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    /// The attribute mapping, created empty when `add_if_missing` is set
    pub fn attributes_mut(&mut self, add_if_missing: bool) -> Option<&mut Attributes> {
        if add_if_missing && self.attributes.is_none() {
            self.attributes = Some(Attributes::new());
        }
        self.attributes.as_mut()
    }

    /// Insert a mapping, or merge into the existing one (new keys win)
    pub fn add_attributes(&mut self, attributes: Attributes) {
        match &mut self.attributes {
            Some(existing) => existing.extend(attributes),
            None => self.attributes = Some(attributes),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.as_ref().and_then(|attrs| attrs.get(key))
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        if let Some(attrs) = self.attributes_mut(true) {
            attrs.insert(key.into(), value.into());
        }
    }

    /// Append with JsonML semantics
    ///
    /// Fragment children are spliced, attribute slots merge into this element, text is
    /// concatenated onto a preceding text child and empty text is dropped. `on_append` sees
    /// every element child that ends up pushed.
    pub fn append_child(
        &mut self,
        child: impl Into<Slot>,
        on_append: Option<&mut dyn FnMut(&Element, &MarkupNode)>,
    ) {
        let mut on_append = on_append;
        self.append_slot(child.into(), &mut on_append);
    }

    fn append_slot(
        &mut self,
        slot: Slot,
        on_append: &mut Option<&mut dyn FnMut(&Element, &MarkupNode)>,
    ) {
        match slot {
            Slot::Attributes(attributes) => self.add_attributes(attributes),
            Slot::Node(MarkupNode::Element(fragment)) if fragment.is_fragment() => {
                for child in fragment.children {
                    self.append_slot(Slot::Node(child), on_append);
                }
            }
            Slot::Node(MarkupNode::Text(text)) => {
                if text.is_empty() {
                    return;
                }
                match self.children.last_mut() {
                    Some(MarkupNode::Text(previous)) => previous.push_str(&text),
                    _ => self.children.push(MarkupNode::Text(text)),
                }
            }
            Slot::Node(node) => {
                if matches!(node, MarkupNode::Element(_)) {
                    if let Some(callback) = on_append.as_deref_mut() {
                        callback(self, &node);
                    }
                }
                self.children.push(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_children_are_spliced() {
        let mut parent = Element::new("div");
        parent.append_child(
            MarkupNode::fragment(vec![
                MarkupNode::text("a"),
                Element::new("b").into(),
            ]),
            None,
        );
        assert_eq!(
            parent.children,
            vec![MarkupNode::text("a"), Element::new("b").into()]
        );
    }

    #[test]
    fn adjacent_text_is_coalesced() {
        let mut parent = Element::new("p");
        parent.append_child("foo", None);
        parent.append_child("", None);
        parent.append_child(" bar", None);
        assert_eq!(parent.children, vec![MarkupNode::text("foo bar")]);
    }

    #[test]
    fn attribute_slots_merge() {
        let mut parent = Element::new("p").attr("id", "x");
        let mut extra = Attributes::new();
        extra.insert("class".to_string(), "c".into());
        parent.append_child(extra, None);
        assert_eq!(parent.attribute("id"), Some(&AttributeValue::from("x")));
        assert_eq!(parent.attribute("class"), Some(&AttributeValue::from("c")));
        assert!(parent.children.is_empty());
    }

    #[test]
    fn on_append_sees_element_children() {
        let mut seen = Vec::new();
        let mut record = |parent: &Element, child: &MarkupNode| {
            seen.push(format!("{}>{}", parent.tag, child.tag_name()));
        };
        let mut parent = Element::new("ul");
        parent.append_child(
            Element::new("li"),
            Some(&mut record as &mut dyn FnMut(&Element, &MarkupNode)),
        );
        parent.append_child(
            "text",
            Some(&mut record as &mut dyn FnMut(&Element, &MarkupNode)),
        );
        assert_eq!(seen, vec!["ul>li"]);
    }

    #[test]
    fn attributes_are_created_on_demand() {
        let mut element = Element::new("input");
        assert!(!element.has_attributes());
        assert!(element.attributes_mut(false).is_none());
        element.set_attribute("value", "v");
        assert!(element.has_attributes());
        assert_eq!(element.attribute("value"), Some(&AttributeValue::from("v")));
    }

    #[test]
    fn shape_tests() {
        assert!(MarkupNode::fragment(vec![]).is_fragment());
        assert!(MarkupNode::text("x").is_element());
        assert!(!MarkupNode::Raw(RawMarkup::new("x")).is_element());
        assert_eq!(MarkupNode::element("td").tag_name(), "td");
        assert!(Slot::from(Attributes::new()).is_attributes());
    }
}
