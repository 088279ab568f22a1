//! Structs and enums that make up a JSONPath query syntax tree.
//!
//! A [`Query`] contains zero or more [`Segment`]s, and each segment contains one
//! or more [`Selector`]s. When a segment includes a _filter selector_, that
//! filter selector is a tree of [`FilterExpression`]s.
//!
//! Every node carries the span of query text it was parsed from. A query is
//! displayed in its canonical form.
use std::fmt::{self, Write};

use itertools::Itertools;

use crate::{
    environment::{Environment, DEFAULT_ENVIRONMENT},
    errors::{JSONPathError, Span},
    function::ExpressionType,
    node::{write_normalized_name, Node, NodeList},
    value::JSONLike,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub segments: Vec<Segment>,
}

impl Query {
    pub fn new(segments: Vec<Segment>) -> Self {
        Query { segments }
    }

    /// Compile `expr` with the default environment.
    pub fn standard(expr: &str) -> Result<Self, JSONPathError> {
        DEFAULT_ENVIRONMENT.compile(expr)
    }

    /// Apply this query to `value`, using function extensions from `env`.
    pub fn find<'v, V: JSONLike>(&self, value: &'v V, env: &Environment<V>) -> NodeList<'v, V> {
        self.resolve(Node::root(value), value, env)
    }

    /// Apply this query to `node`, with `root` bound to `$` in filters.
    pub(crate) fn resolve<'v, V: JSONLike>(
        &self,
        node: Node<'v, V>,
        root: &'v V,
        env: &Environment<V>,
    ) -> NodeList<'v, V> {
        self.segments
            .iter()
            .fold(vec![node], |nodes, segment| segment.resolve(nodes, root, env))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if this query can select at most one node.
    pub fn is_singular(&self) -> bool {
        self.segments.iter().all(|segment| {
            if let Segment::Child { selectors, .. } = segment {
                return selectors.len() == 1
                    && selectors.first().is_some_and(|selector| {
                        matches!(selector, Selector::Name { .. } | Selector::Index { .. })
                    });
            }
            false
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.segments.iter().join(""))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Child { span: Span, selectors: Vec<Selector> },
    Recursive { span: Span, selectors: Vec<Selector> },
}

impl Segment {
    pub fn span(&self) -> Span {
        match self {
            Segment::Child { span, .. } | Segment::Recursive { span, .. } => *span,
        }
    }

    pub fn selectors(&self) -> &[Selector] {
        match self {
            Segment::Child { selectors, .. } | Segment::Recursive { selectors, .. } => selectors,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Child { selectors, .. } => write!(f, "[{}]", selectors.iter().join(", ")),
            Segment::Recursive { selectors, .. } => {
                write!(f, "..[{}]", selectors.iter().join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Name {
        span: Span,
        name: String,
    },
    Index {
        span: Span,
        index: i64,
    },
    Slice {
        span: Span,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },
    Wild {
        span: Span,
    },
    Filter {
        span: Span,
        expression: Box<FilterExpression>,
    },
}

impl Selector {
    pub fn span(&self) -> Span {
        match self {
            Selector::Name { span, .. }
            | Selector::Index { span, .. }
            | Selector::Slice { span, .. }
            | Selector::Wild { span }
            | Selector::Filter { span, .. } => *span,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name { name, .. } => write_quoted(f, name),
            Selector::Index { index, .. } => write!(f, "{index}"),
            Selector::Slice {
                start, stop, step, ..
            } => {
                if let Some(i) = start {
                    write!(f, "{i}")?;
                }
                f.write_char(':')?;
                if let Some(i) = stop {
                    write!(f, "{i}")?;
                }
                write!(f, ":{}", step.unwrap_or(1))
            }
            Selector::Wild { .. } => f.write_char('*'),
            Selector::Filter { expression, .. } => write!(f, "?{expression}"),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let mut buf = String::with_capacity(value.len() + 2);
    buf.push('\'');
    write_normalized_name(&mut buf, value);
    buf.push('\'');
    f.write_str(&buf)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("&&"),
            LogicalOperator::Or => f.write_str("||"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Eq => f.write_str("=="),
            ComparisonOperator::Ne => f.write_str("!="),
            ComparisonOperator::Ge => f.write_str(">="),
            ComparisonOperator::Gt => f.write_str(">"),
            ComparisonOperator::Le => f.write_str("<="),
            ComparisonOperator::Lt => f.write_str("<"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpressionKind {
    True,
    False,
    Null,
    String {
        value: String,
    },
    Int {
        value: i64,
    },
    Float {
        value: f64,
    },
    Not {
        expression: Box<FilterExpression>,
    },
    /// A parenthesized expression. Always a logical expression, even when
    /// the inner expression is a query or function call.
    Grouped {
        expression: Box<FilterExpression>,
    },
    Logical {
        left: Box<FilterExpression>,
        operator: LogicalOperator,
        right: Box<FilterExpression>,
    },
    Comparison {
        left: Box<FilterExpression>,
        operator: ComparisonOperator,
        right: Box<FilterExpression>,
    },
    RelativeQuery {
        query: Box<Query>,
    },
    RootQuery {
        query: Box<Query>,
    },
    Function {
        name: String,
        args: Vec<FilterExpression>,
    },
    /// The non-standard `#` identifier, the key of the node being filtered.
    CurrentKey,
}

/// A node in a filter expression tree, with its resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub span: Span,
    pub kind: FilterExpressionKind,
    pub ty: ExpressionType,
}

impl FilterExpression {
    pub fn new(span: Span, kind: FilterExpressionKind, ty: ExpressionType) -> Self {
        FilterExpression { span, kind, ty }
    }

    pub fn is_literal(&self) -> bool {
        use FilterExpressionKind::*;
        matches!(
            self.kind,
            True | False | Null | String { .. } | Int { .. } | Float { .. }
        )
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FilterExpressionKind::True => f.write_str("true"),
            FilterExpressionKind::False => f.write_str("false"),
            FilterExpressionKind::Null => f.write_str("null"),
            FilterExpressionKind::String { value } => write_quoted(f, value),
            FilterExpressionKind::Int { value } => write!(f, "{value}"),
            FilterExpressionKind::Float { value } => write!(f, "{value:?}"),
            FilterExpressionKind::Not { expression } => write!(f, "!{expression}"),
            FilterExpressionKind::Grouped { expression } => match expression.kind {
                FilterExpressionKind::Logical { .. } => write!(f, "{expression}"),
                _ => write!(f, "({expression})"),
            },
            FilterExpressionKind::Logical {
                left,
                operator,
                right,
            } => write!(f, "({left} {operator} {right})"),
            FilterExpressionKind::Comparison {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            FilterExpressionKind::RelativeQuery { query } => {
                write!(f, "@{}", query.segments.iter().join(""))
            }
            FilterExpressionKind::RootQuery { query } => {
                write!(f, "${}", query.segments.iter().join(""))
            }
            FilterExpressionKind::Function { name, args } => {
                write!(f, "{}({})", name, args.iter().join(", "))
            }
            FilterExpressionKind::CurrentKey => f.write_char('#'),
        }
    }
}
