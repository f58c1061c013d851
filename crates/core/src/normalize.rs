//! Response normalization.
//!
//! Vendor responses reach the tool layer as a mix of typed records, decoded
//! JSON and plain collections. [`normalize`] flattens any such tree into a
//! [`serde_json::Value`] built only from primitives, arrays and objects, so the
//! result can be handed straight to a JSON encoder.

use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Leaf value of a response tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl Primitive {
    fn to_value(&self) -> Value {
        match self {
            Primitive::Null => Value::Null,
            Primitive::Bool(b) => Value::Bool(*b),
            Primitive::Integer(i) => Value::Number((*i).into()),
            Primitive::Unsigned(u) => Value::Number((*u).into()),
            // NaN and infinities have no JSON form
            Primitive::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Primitive::String(s) => Value::String(s.clone()),
        }
    }
}

/// Whether a record field is part of the record's public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    /// Emitted by [`normalize`].
    Public,
    /// Carried by the record but never emitted.
    Internal,
}

/// A named field of a [`Record`].
#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub value: ResponseNode,
    pub exposure: Exposure,
}

impl RecordField {
    pub fn public(name: impl Into<String>, value: impl IntoResponseNode) -> Self {
        Self {
            name: name.into(),
            value: value.into_node(),
            exposure: Exposure::Public,
        }
    }

    pub fn internal(name: impl Into<String>, value: impl IntoResponseNode) -> Self {
        Self {
            name: name.into(),
            value: value.into_node(),
            exposure: Exposure::Internal,
        }
    }
}

/// A typed vendor response that can enumerate its own fields.
///
/// Implementors list every field they carry, in a stable order, and mark each
/// one [`Exposure::Public`] or [`Exposure::Internal`]. Only public fields make
/// it into the normalized output.
pub trait Record: fmt::Debug + Send + Sync {
    fn fields(&self) -> Vec<RecordField>;
}

/// One node of a response tree.
#[derive(Debug, Clone)]
pub enum ResponseNode {
    Primitive(Primitive),
    Sequence(Vec<ResponseNode>),
    Mapping(BTreeMap<String, ResponseNode>),
    Record(Arc<dyn Record>),
}

impl ResponseNode {
    pub fn null() -> Self {
        ResponseNode::Primitive(Primitive::Null)
    }

    pub fn record(record: impl Record + 'static) -> Self {
        ResponseNode::Record(Arc::new(record))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResponseNode::Primitive(Primitive::Null))
    }
}

/// Flatten a response tree into plain interchange data.
///
/// Primitives pass through unchanged, sequences keep their order and length,
/// mappings keep their key set, and records become objects holding their
/// public fields. A record without public fields becomes `{}`, never `null`.
pub fn normalize(node: &ResponseNode) -> Value {
    match node {
        ResponseNode::Primitive(p) => p.to_value(),
        ResponseNode::Sequence(items) => Value::Array(items.iter().map(normalize).collect()),
        ResponseNode::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), normalize(value)))
                .collect(),
        ),
        ResponseNode::Record(record) => {
            let mut object = Map::new();
            for field in record.fields() {
                if field.exposure == Exposure::Public {
                    object.insert(field.name, normalize(&field.value));
                }
            }
            Value::Object(object)
        }
    }
}

/// Convert and normalize in one step.
pub fn normalize_value(value: impl IntoResponseNode) -> Value {
    normalize(&value.into_node())
}

/// Conversion into a [`ResponseNode`].
pub trait IntoResponseNode {
    fn into_node(self) -> ResponseNode;
}

impl IntoResponseNode for ResponseNode {
    fn into_node(self) -> ResponseNode {
        self
    }
}

impl IntoResponseNode for Primitive {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(self)
    }
}

impl IntoResponseNode for bool {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::Bool(self))
    }
}

impl IntoResponseNode for i32 {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::Integer(self.into()))
    }
}

impl IntoResponseNode for i64 {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::Integer(self))
    }
}

impl IntoResponseNode for u32 {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::Integer(self.into()))
    }
}

impl IntoResponseNode for u64 {
    fn into_node(self) -> ResponseNode {
        match i64::try_from(self) {
            Ok(i) => ResponseNode::Primitive(Primitive::Integer(i)),
            Err(_) => ResponseNode::Primitive(Primitive::Unsigned(self)),
        }
    }
}

impl IntoResponseNode for usize {
    fn into_node(self) -> ResponseNode {
        (self as u64).into_node()
    }
}

impl IntoResponseNode for f64 {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::Float(self))
    }
}

impl IntoResponseNode for String {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::String(self))
    }
}

impl IntoResponseNode for &str {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Primitive(Primitive::String(self.to_string()))
    }
}

impl<T: IntoResponseNode> IntoResponseNode for Option<T> {
    fn into_node(self) -> ResponseNode {
        match self {
            Some(value) => value.into_node(),
            None => ResponseNode::null(),
        }
    }
}

impl<T: IntoResponseNode> IntoResponseNode for Vec<T> {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Sequence(self.into_iter().map(IntoResponseNode::into_node).collect())
    }
}

impl<T: IntoResponseNode> IntoResponseNode for BTreeMap<String, T> {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Mapping(self.into_iter().map(|(k, v)| (k, v.into_node())).collect())
    }
}

impl<T: IntoResponseNode> IntoResponseNode for HashMap<String, T> {
    fn into_node(self) -> ResponseNode {
        ResponseNode::Mapping(self.into_iter().map(|(k, v)| (k, v.into_node())).collect())
    }
}

impl IntoResponseNode for Value {
    fn into_node(self) -> ResponseNode {
        match self {
            Value::Null => ResponseNode::null(),
            Value::Bool(b) => b.into_node(),
            Value::Number(n) => {
                let primitive = if let Some(i) = n.as_i64() {
                    Primitive::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Primitive::Unsigned(u)
                } else {
                    Primitive::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                ResponseNode::Primitive(primitive)
            }
            Value::String(s) => s.into_node(),
            Value::Array(items) => items.into_node(),
            Value::Object(entries) => ResponseNode::Mapping(
                entries.into_iter().map(|(k, v)| (k, v.into_node())).collect(),
            ),
        }
    }
}

impl From<Value> for ResponseNode {
    fn from(value: Value) -> Self {
        value.into_node()
    }
}
