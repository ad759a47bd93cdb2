//! Text to live tree
//!
//! html5ever and xml5ever build `markup5ever_rcdom` trees; those are imported node by node into
//! our own tree so the result carries live element state and supports fragments.

use super::document::Document;
use super::node::{append, attribute_name, ElementState, Handle, Node, NodeData};
use super::Dialect;
use crate::error::ConversionError;
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, Namespace, ParseOpts, Prefix, QualName};
use markup5ever_rcdom::{Handle as RcHandle, NodeData as RcNodeData, RcDom};
use std::cell::RefCell;
use std::collections::HashMap;
use xml5ever::driver::{parse_document as parse_xml_document, XmlParseOpts};

/// Parse a complete HTML document
pub fn parse_html(text: &str) -> Result<Document, ConversionError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(text);
    let document = Document::html();
    import_children(&dom.document, document.node(), None)?;
    Ok(document)
}

/// Parse `text` as the contents of `container`, the way `innerHTML` assignment does
///
/// The text is parsed as the body of a throwaway document, so head-level markup such as
/// `style` stays where it was written.
pub fn parse_html_into(container: &Handle, text: &str) -> Result<(), ConversionError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .one(format!("<body>{}", text));
    match find_rc_element(&dom.document, "body") {
        Some(body) => import_children(&body, container, None),
        None => Ok(()),
    }
}

/// Parse an XML document
pub fn parse_xml(text: &str) -> Result<Document, ConversionError> {
    let dom = parse_xml_document(RcDom::default(), XmlParseOpts::default()).one(text);
    let document = Document::new(Dialect::Xml);
    import_children(&dom.document, document.node(), Some(&root_bindings()))?;
    Ok(document)
}

fn find_rc_element(node: &RcHandle, local: &str) -> Option<RcHandle> {
    for child in node.children.borrow().iter() {
        if let RcNodeData::Element { name, .. } = &child.data {
            if &*name.local == local {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_rc_element(child, local) {
            return Some(found);
        }
    }
    None
}

/// Namespace bindings in scope at some point of an XML tree
type Bindings = HashMap<Option<Prefix>, Namespace>;

fn root_bindings() -> Bindings {
    HashMap::from([
        (None, ns!()),
        (Some(Prefix::from("xml")), ns!(xml)),
        (Some(Prefix::from("xmlns")), ns!(xmlns)),
    ])
}

fn import_children(
    source: &RcHandle,
    target: &Handle,
    bindings: Option<&Bindings>,
) -> Result<(), ConversionError> {
    for child in source.children.borrow().iter() {
        if let Some(node) = import(child, bindings)? {
            append(target, node)?;
        }
    }
    Ok(())
}

/// Import one rcdom node; `bindings` is `None` for HTML, which has no namespace declarations
fn import(
    source: &RcHandle,
    bindings: Option<&Bindings>,
) -> Result<Option<Handle>, ConversionError> {
    let mut element_bindings = None;
    let node = match &source.data {
        RcNodeData::Document => return Ok(None),
        RcNodeData::Doctype {
            name,
            public_id,
            system_id,
        } => Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }),
        RcNodeData::Text { contents } => Node::new(NodeData::Text {
            contents: RefCell::new(contents.borrow().to_string()),
        }),
        RcNodeData::Comment { contents } => Node::new(NodeData::Comment {
            contents: RefCell::new(contents.to_string()),
        }),
        RcNodeData::ProcessingInstruction { target, contents } => {
            Node::new(NodeData::ProcessingInstruction {
                target: target.to_string(),
                contents: contents.to_string(),
            })
        }
        RcNodeData::Element { name, attrs, .. } => {
            let attrs = attrs.borrow();
            let mut imported = Vec::with_capacity(attrs.len());
            if let Some(bindings) = bindings {
                let mut scope = bindings.clone();
                declare_bindings(&mut scope, name, &attrs, &mut imported);
                element_bindings = Some(scope);
            }
            imported.extend(attrs.iter().cloned());
            Node::new(NodeData::Element {
                name: name.clone(),
                attrs: RefCell::new(imported),
                state: ElementState::default(),
            })
        }
    };
    import_children(source, &node, element_bindings.as_ref().or(bindings))?;
    Ok(Some(node))
}

/// xml5ever turns `xmlns` attributes into namespaces on names and drops them from the list.
/// Push back a declaration for every binding the element uses that `scope` does not hold yet.
fn declare_bindings(
    scope: &mut Bindings,
    name: &QualName,
    attrs: &[Attribute],
    declarations: &mut Vec<Attribute>,
) {
    let used = std::iter::once(name).chain(
        attrs
            .iter()
            .map(|attr| &attr.name)
            .filter(|attr_name| attr_name.prefix.is_some()),
    );
    for qual_name in used {
        if scope.get(&qual_name.prefix) == Some(&qual_name.ns) {
            continue;
        }
        let declared = match &qual_name.prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        declarations.push(Attribute {
            name: attribute_name(&declared),
            value: qual_name.ns.to_string().into(),
        });
        scope.insert(qual_name.prefix.clone(), qual_name.ns.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeData;

    #[test]
    fn html_document_has_html_root() {
        let doc = parse_html("<!DOCTYPE html><p>hi</p>").unwrap();
        let root = doc.document_element().unwrap();
        assert!(root.is_html_element("html"));
        assert!(doc.find_element("p").is_some());
    }

    #[test]
    fn fragment_keeps_style_in_place() {
        let doc = Document::html();
        let div = doc.create_element("div").unwrap();
        parse_html_into(&div, "<style>p {}</style>text").unwrap();
        let children = div.child_nodes();
        assert_eq!(children.len(), 2);
        assert!(children[0].is_html_element("style"));
        assert_eq!(children[1].node_value().as_deref(), Some("text"));
    }

    #[test]
    fn xml_keeps_doctype_identifiers() {
        let doc = parse_xml(
            r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd"><svg/>"#,
        )
        .unwrap();
        let doctype = doc.node().child_nodes()[0].clone();
        match &doctype.data {
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                assert_eq!(name, "svg");
                assert_eq!(public_id, "-//W3C//DTD SVG 1.1//EN");
                assert_eq!(system_id, "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd");
            }
            _ => panic!("expected a doctype, got {:?}", doctype),
        }
        assert_eq!(
            doc.document_element().and_then(|root| root.tag_name()).as_deref(),
            Some("svg")
        );
    }

    #[test]
    fn xml_declarations_come_back_where_bindings_change() {
        let doc = parse_xml(
            r#"<a:foo xmlns:a="urn:x" a:id="1"><a:bar/><baz xmlns="urn:y"><a:qux/></baz></a:foo>"#,
        )
        .unwrap();
        let root = doc.document_element().unwrap();
        assert_eq!(
            root.attributes(),
            vec![
                ("xmlns:a".to_string(), "urn:x".to_string()),
                ("a:id".to_string(), "1".to_string()),
            ]
        );
        let children = root.child_nodes();
        assert!(children[0].attributes().is_empty());
        assert_eq!(children[1].get_attribute("xmlns").as_deref(), Some("urn:y"));
        assert!(children[1].child_nodes()[0].attributes().is_empty());
    }

    #[test]
    fn html_import_adds_no_declarations() {
        let doc = parse_html("<svg><circle r=\"1\"/></svg>").unwrap();
        let circle = doc.find_element("circle").unwrap();
        assert_eq!(circle.attributes(), vec![("r".to_string(), "1".to_string())]);
    }
}
