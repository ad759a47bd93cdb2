//! Live tree to text through the html5ever and xml5ever serializers

use super::node::{qualified_name, Handle, NodeData};
use super::Dialect;
use crate::error::ConversionError;
use html5ever::serialize::{Serialize, Serializer, TraversalScope};
use html5ever::{ns, LocalName, QualName};
use std::collections::VecDeque;
use std::io;

/// A [Handle] the markup5ever serializers accept
///
/// Documents and fragments have no markup of their own and serialize as their children.
#[derive(Clone)]
pub struct SerializableHandle(pub Handle);

impl From<Handle> for SerializableHandle {
    fn from(handle: Handle) -> Self {
        SerializableHandle(handle)
    }
}

enum SerializeOp {
    Open(Handle),
    Close(QualName),
}

impl Serialize for SerializableHandle {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        serialize_tree(&self.0, serializer, traversal_scope, QualName::clone)
    }
}

/// XML view of a tree: every name goes out as written, `prefix:local` in the null namespace
///
/// xml5ever declares a namespace for any prefixed or namespaced name it has not seen bound,
/// so resolved names would gain `xmlns` attributes the tree never had. Declarations come only
/// from the tree's own `xmlns` attributes.
struct XmlNames(Handle);

impl Serialize for XmlNames {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        serialize_tree(&self.0, serializer, traversal_scope, |name| {
            QualName::new(None, ns!(), LocalName::from(qualified_name(name)))
        })
    }
}

fn serialize_tree<S>(
    root: &Handle,
    serializer: &mut S,
    traversal_scope: TraversalScope,
    rename: fn(&QualName) -> QualName,
) -> io::Result<()>
where
    S: Serializer,
{
    let mut ops = VecDeque::new();
    match traversal_scope {
        TraversalScope::IncludeNode => ops.push_back(SerializeOp::Open(root.clone())),
        TraversalScope::ChildrenOnly(_) => ops.extend(
            root.children
                .borrow()
                .iter()
                .map(|h| SerializeOp::Open(h.clone())),
        ),
    }

    while let Some(op) = ops.pop_front() {
        match op {
            SerializeOp::Open(handle) => match &handle.data {
                NodeData::Element { name, attrs, .. } => {
                    let name = rename(name);
                    let attrs: Vec<(QualName, String)> = attrs
                        .borrow()
                        .iter()
                        .map(|at| (rename(&at.name), at.value.to_string()))
                        .collect();
                    serializer.start_elem(
                        name.clone(),
                        attrs.iter().map(|(name, value)| (name, value.as_str())),
                    )?;

                    ops.reserve(1 + handle.children.borrow().len());
                    ops.push_front(SerializeOp::Close(name));

                    for child in handle.children.borrow().iter().rev() {
                        ops.push_front(SerializeOp::Open(child.clone()));
                    }
                }
                NodeData::Document { .. } | NodeData::Fragment => {
                    for child in handle.children.borrow().iter().rev() {
                        ops.push_front(SerializeOp::Open(child.clone()));
                    }
                }
                NodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
                NodeData::Text { contents } | NodeData::CData { contents } => {
                    serializer.write_text(&contents.borrow())?
                }
                NodeData::Comment { contents } => serializer.write_comment(&contents.borrow())?,
                NodeData::ProcessingInstruction { target, contents } => {
                    serializer.write_processing_instruction(target, contents)?
                }
            },
            SerializeOp::Close(name) => {
                serializer.end_elem(name)?;
            }
        }
    }

    Ok(())
}

/// Serialize `node` (and its subtree) as HTML or XML text
pub fn serialize_node(node: &Handle, dialect: Dialect) -> Result<String, ConversionError> {
    let mut output = Vec::new();
    match dialect {
        Dialect::Html => {
            let opts = html5ever::serialize::SerializeOpts {
                traversal_scope: TraversalScope::IncludeNode,
                ..Default::default()
            };
            let serializable = SerializableHandle::from(node.clone());
            html5ever::serialize::serialize(&mut output, &serializable, opts)
        }
        Dialect::Xml => {
            let opts = xml5ever::serialize::SerializeOpts {
                traversal_scope: TraversalScope::IncludeNode,
            };
            xml5ever::serialize::serialize(&mut output, &XmlNames(node.clone()), opts)
        }
    }
    .map_err(|e| ConversionError::Serialization(format!("failed to serialize: {}", e)))?;

    String::from_utf8(output)
        .map_err(|e| ConversionError::Serialization(format!("invalid UTF-8 in output: {}", e)))
}

/// Serialize only the children of `node`, like `innerHTML`
pub fn serialize_children(node: &Handle, dialect: Dialect) -> Result<String, ConversionError> {
    let mut text = String::new();
    for child in node.children.borrow().iter() {
        text.push_str(&serialize_node(child, dialect)?);
    }
    Ok(text)
}
