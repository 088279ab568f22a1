use std::fmt::Write;

use crate::value::JSONLike;

pub type Location<'v> = Vec<PathElement<'v>>;
pub type NodeList<'v, V> = Vec<Node<'v, V>>;

/// A value selected by a query, and where it was found.
#[derive(Debug)]
pub struct Node<'v, V> {
    pub value: &'v V,
    pub location: Location<'v>,
}

// Derived Clone would require V: Clone.
impl<'v, V> Clone for Node<'v, V> {
    fn clone(&self) -> Self {
        Node {
            value: self.value,
            location: self.location.clone(),
        }
    }
}

impl<'v, V> PartialEq for Node<'v, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.value, other.value) && self.location == other.location
    }
}

/// Helpers for the results of a query.
pub trait NodeListExt<'v, V> {
    /// The selected values, in node order.
    fn values(&self) -> Vec<&'v V>;

    /// Normalized paths to the selected values, in node order.
    fn paths(&self) -> Vec<String>;
}

impl<'v, V: JSONLike> NodeListExt<'v, V> for NodeList<'v, V> {
    fn values(&self) -> Vec<&'v V> {
        self.iter().map(|node| node.value).collect()
    }

    fn paths(&self) -> Vec<String> {
        self.iter().map(Node::path).collect()
    }
}

/// An array element index or object member name in a Node's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElement<'v> {
    Index(usize),
    Name(&'v str),
}

impl<'v, V: JSONLike> Node<'v, V> {
    pub fn new(value: &'v V, location: Location<'v>) -> Self {
        Node { value, location }
    }

    /// A node for the root of a JSON document.
    pub fn root(value: &'v V) -> Self {
        Node {
            value,
            location: Vec::new(),
        }
    }

    pub fn new_array_element(value: &'v V, location: &Location<'v>, index: usize) -> Self {
        let mut location = location.clone();
        location.push(PathElement::Index(index));
        Node { value, location }
    }

    pub fn new_object_member(value: &'v V, location: &Location<'v>, name: &'v str) -> Self {
        let mut location = location.clone();
        location.push(PathElement::Name(name));
        Node { value, location }
    }

    /// The location of this node's value in the query argument as a normalized path.
    pub fn path(&self) -> String {
        let mut path = String::from("$");
        for element in self.location.iter() {
            match element {
                PathElement::Index(i) => {
                    let _ = write!(path, "[{}]", i);
                }
                PathElement::Name(name) => {
                    path.push_str("['");
                    write_normalized_name(&mut path, name);
                    path.push_str("']");
                }
            }
        }
        path
    }
}

/// Write `name` with normalized path escaping, without surrounding quotes.
pub(crate) fn write_normalized_name(buf: &mut String, name: &str) {
    for ch in name.chars() {
        match ch {
            '\x08' => buf.push_str("\\b"),
            '\x0C' => buf.push_str("\\f"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\'' => buf.push_str("\\'"),
            '\\' => buf.push_str("\\\\"),
            ch if (ch as u32) <= 0x1F => {
                let _ = write!(buf, "\\u{:04x}", ch as u32);
            }
            ch => buf.push(ch),
        }
    }
}
