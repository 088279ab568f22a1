//! Filter expression evaluation.
use std::borrow::Cow;

use log::warn;

use crate::{
    environment::Environment,
    function::ExpressionType,
    node::{Node, NodeList, PathElement},
    query::{ComparisonOperator, FilterExpression, FilterExpressionKind, LogicalOperator},
    value::{JSONKind, JSONLike},
};

/// The result of evaluating a filter expression or calling a function extension.
///
/// `Nothing` is the absence of a value, as produced by a singular query that
/// selects nothing. It is distinct from JSON `null`.
#[derive(Debug)]
pub enum FilterResult<'v, V> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
    String(Cow<'v, str>),
    Array(&'v V),
    Object(&'v V),
    Nodes(NodeList<'v, V>),
    Nothing,
}

impl<'v, V: JSONLike> FilterResult<'v, V> {
    pub fn from_json_value(value: &'v V) -> Self {
        match value.kind() {
            JSONKind::Null => FilterResult::Null,
            JSONKind::Bool(b) => FilterResult::Bool(b),
            JSONKind::Int(i) => FilterResult::Int(i),
            JSONKind::Float(f) => FilterResult::Float(f),
            JSONKind::String(s) => FilterResult::String(Cow::Borrowed(s)),
            JSONKind::Array => FilterResult::Array(value),
            JSONKind::Object => FilterResult::Object(value),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FilterResult::Nothing => false,
            FilterResult::Nodes(nodes) => !nodes.is_empty(),
            FilterResult::Bool(b) => *b,
            _ => true,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, FilterResult::Nothing)
    }

    /// Reduce a node list to the value of its only node, or `Nothing` if it
    /// is empty. Other results are returned unchanged.
    pub fn into_value(self) -> Self {
        match self {
            FilterResult::Nodes(nodes) => match nodes.as_slice() {
                [] => FilterResult::Nothing,
                [node] => FilterResult::from_json_value(node.value),
                _ => FilterResult::Nodes(nodes),
            },
            rv => rv,
        }
    }

    /// Convert an argument to a function parameter's declared type.
    fn into_param(self, param_type: Option<ExpressionType>) -> Self {
        match param_type {
            Some(ExpressionType::Value) => self.into_value(),
            Some(ExpressionType::Logical) => FilterResult::Bool(self.is_truthy()),
            Some(ExpressionType::Nodes) | None => self,
        }
    }
}

/// Bindings available while evaluating a filter against one candidate node.
pub(crate) struct FilterContext<'e, 'v, V: JSONLike> {
    pub env: &'e Environment<V>,
    pub root: &'v V,
    pub current: &'v V,
    pub key: Option<PathElement<'v>>,
}

impl FilterExpression {
    pub(crate) fn evaluate<'v, V: JSONLike>(
        &self,
        context: &FilterContext<'_, 'v, V>,
    ) -> FilterResult<'v, V> {
        match &self.kind {
            FilterExpressionKind::True => FilterResult::Bool(true),
            FilterExpressionKind::False => FilterResult::Bool(false),
            FilterExpressionKind::Null => FilterResult::Null,
            FilterExpressionKind::String { value } => FilterResult::String(Cow::Owned(value.clone())),
            FilterExpressionKind::Int { value } => FilterResult::Int(*value),
            FilterExpressionKind::Float { value } => FilterResult::Float(*value),
            FilterExpressionKind::Not { expression } => {
                FilterResult::Bool(!expression.evaluate(context).is_truthy())
            }
            FilterExpressionKind::Grouped { expression } => {
                FilterResult::Bool(expression.evaluate(context).is_truthy())
            }
            FilterExpressionKind::Logical {
                left,
                operator,
                right,
            } => FilterResult::Bool(match operator {
                LogicalOperator::And => {
                    left.evaluate(context).is_truthy() && right.evaluate(context).is_truthy()
                }
                LogicalOperator::Or => {
                    left.evaluate(context).is_truthy() || right.evaluate(context).is_truthy()
                }
            }),
            FilterExpressionKind::Comparison {
                left,
                operator,
                right,
            } => FilterResult::Bool(compare(
                left.evaluate(context),
                *operator,
                right.evaluate(context),
            )),
            FilterExpressionKind::RelativeQuery { query } => FilterResult::Nodes(query.resolve(
                Node::root(context.current),
                context.root,
                context.env,
            )),
            FilterExpressionKind::RootQuery { query } => FilterResult::Nodes(query.resolve(
                Node::root(context.root),
                context.root,
                context.env,
            )),
            FilterExpressionKind::Function { name, args } => {
                let Some(ext) = context.env.function(name) else {
                    warn!("function `{}` is not registered, evaluating as nothing", name);
                    return FilterResult::Nothing;
                };

                let sig = ext.sig();
                let args = args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| {
                        arg.evaluate(context)
                            .into_param(sig.param_types.get(i).copied())
                    })
                    .collect();

                ext.call(args)
            }
            FilterExpressionKind::CurrentKey => match context.key {
                Some(PathElement::Name(name)) => FilterResult::String(Cow::Borrowed(name)),
                Some(PathElement::Index(i)) => FilterResult::Int(i as i64),
                None => FilterResult::Nothing,
            },
        }
    }
}

pub(crate) fn compare<V: JSONLike>(
    left: FilterResult<V>,
    operator: ComparisonOperator,
    right: FilterResult<V>,
) -> bool {
    let left = left.into_value();
    let right = right.into_value();
    match operator {
        ComparisonOperator::Eq => eq(&left, &right),
        ComparisonOperator::Ne => !eq(&left, &right),
        ComparisonOperator::Lt => lt(&left, &right),
        ComparisonOperator::Gt => lt(&right, &left),
        ComparisonOperator::Ge => lt(&right, &left) || eq(&left, &right),
        ComparisonOperator::Le => lt(&left, &right) || eq(&left, &right),
    }
}

fn eq<V: JSONLike>(left: &FilterResult<V>, right: &FilterResult<V>) -> bool {
    use FilterResult::*;
    match (left, right) {
        (Nothing, Nothing) => true,
        (Nothing, _) | (_, Nothing) => false,
        (Int(l), Int(r)) => l == r,
        (Float(l), Float(r)) => l == r,
        (Int(l), Float(r)) => (*l as f64) == *r,
        (Float(l), Int(r)) => *l == (*r as f64),
        (Null, Null) => true,
        (Bool(l), Bool(r)) => l == r,
        (String(l), String(r)) => l == r,
        (Array(l), Array(r)) | (Object(l), Object(r)) => deep_eq(*l, *r),
        _ => false,
    }
}

fn lt<V: JSONLike>(left: &FilterResult<V>, right: &FilterResult<V>) -> bool {
    use FilterResult::*;
    match (left, right) {
        (String(l), String(r)) => l < r,
        (Int(l), Int(r)) => l < r,
        (Float(l), Float(r)) => l < r,
        (Int(l), Float(r)) => (*l as f64) < *r,
        (Float(l), Int(r)) => *l < (*r as f64),
        _ => false,
    }
}

/// Structural equality of two JSON-like values. Numbers compare by value and
/// object member order is ignored.
pub(crate) fn deep_eq<V: JSONLike>(left: &V, right: &V) -> bool {
    match (left.kind(), right.kind()) {
        (JSONKind::Array, JSONKind::Array) => {
            left.len() == right.len()
                && left
                    .elements()
                    .zip(right.elements())
                    .all(|(l, r)| deep_eq(l, r))
        }
        (JSONKind::Object, JSONKind::Object) => {
            left.len() == right.len()
                && left
                    .members()
                    .all(|(k, l)| right.member(k).is_some_and(|r| deep_eq(l, r)))
        }
        (JSONKind::Int(l), JSONKind::Float(r)) => (l as f64) == r,
        (JSONKind::Float(l), JSONKind::Int(r)) => l == (r as f64),
        (l, r) => l == r,
    }
}
