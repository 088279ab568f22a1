//! The capabilities the evaluator needs from a JSON-like value.
//!
//! Queries are evaluated against any type implementing [`JSONLike`]. An
//! implementation for [`serde_json::Value`] is included.
use std::fmt::Debug;

use serde_json::Value;

/// A borrowed view of a JSON-like value's type and, for scalars, its data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JSONKind<'v> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(&'v str),
    Array,
    Object,
}

/// A JSON-like value: an object with ordered, string-keyed members, an array
/// of ordered elements, or a scalar.
pub trait JSONLike: Debug + Sized {
    fn kind(&self) -> JSONKind<'_>;

    /// The value of the member called `name`, if this is an object.
    fn member(&self, name: &str) -> Option<&Self>;

    /// The key and value of the member called `name`, if this is an object.
    fn member_entry(&self, name: &str) -> Option<(&str, &Self)> {
        self.members().find(|(k, _)| *k == name)
    }

    /// Object members in insertion order. Empty for non-objects.
    fn members(&self) -> Box<dyn Iterator<Item = (&str, &Self)> + '_>;

    /// The element at `index`, if this is an array.
    fn element(&self, index: usize) -> Option<&Self>;

    /// Array elements in order. Empty for non-arrays.
    fn elements(&self) -> Box<dyn Iterator<Item = &Self> + '_>;

    /// The number of members or elements in a container. Zero for scalars.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_array(&self) -> bool {
        matches!(self.kind(), JSONKind::Array)
    }

    fn is_object(&self) -> bool {
        matches!(self.kind(), JSONKind::Object)
    }
}

impl JSONLike for Value {
    fn kind(&self) -> JSONKind<'_> {
        match self {
            Value::Null => JSONKind::Null,
            Value::Bool(b) => JSONKind::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => JSONKind::Int(i),
                // u64 values beyond i64::MAX and non-integers
                None => JSONKind::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => JSONKind::String(s),
            Value::Array(_) => JSONKind::Array,
            Value::Object(_) => JSONKind::Object,
        }
    }

    fn member(&self, name: &str) -> Option<&Self> {
        self.as_object().and_then(|obj| obj.get(name))
    }

    fn member_entry(&self, name: &str) -> Option<(&str, &Self)> {
        self.as_object()
            .and_then(|obj| obj.get_key_value(name))
            .map(|(k, v)| (k.as_str(), v))
    }

    fn members(&self) -> Box<dyn Iterator<Item = (&str, &Self)> + '_> {
        match self {
            Value::Object(obj) => Box::new(obj.iter().map(|(k, v)| (k.as_str(), v))),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn element(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|arr| arr.get(index))
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        match self {
            Value::Array(arr) => Box::new(arr.iter()),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Value::Array(arr) => arr.len(),
            Value::Object(obj) => obj.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds() {
        assert_eq!(json!(null).kind(), JSONKind::Null);
        assert_eq!(json!(true).kind(), JSONKind::Bool(true));
        assert_eq!(json!(-3).kind(), JSONKind::Int(-3));
        assert_eq!(json!(1.5).kind(), JSONKind::Float(1.5));
        assert_eq!(json!("a").kind(), JSONKind::String("a"));
        assert_eq!(json!([1]).kind(), JSONKind::Array);
        assert_eq!(json!({"a": 1}).kind(), JSONKind::Object);
    }

    #[test]
    fn large_unsigned_integers_are_floats() {
        assert_eq!(
            json!(u64::MAX).kind(),
            JSONKind::Float(18446744073709551615.0)
        );
    }

    #[test]
    fn members_keep_insertion_order() {
        let value = json!({"b": 1, "a": 2, "c": 3});
        let keys: Vec<&str> = value.members().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn scalars_have_no_children() {
        let value = json!("abc");
        assert_eq!(value.len(), 0);
        assert!(value.member("a").is_none());
        assert!(value.element(0).is_none());
        assert_eq!(value.elements().count(), 0);
    }
}
