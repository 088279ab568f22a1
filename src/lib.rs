//! JSONPath queries for JSON-like values, following RFC 9535.
//!
//! Queries are compiled to a typed syntax tree, then evaluated against any
//! value implementing [`JSONLike`]. An implementation for
//! [`serde_json::Value`] is included.
//!
//! ## Standard queries
//!
//! [`find`] compiles and evaluates a query using a default, non-strict
//! environment with the standard [function extensions].
//!
//! ```
//! use jsonpath_query::{errors::JSONPathError, find};
//! use serde_json::json;
//!
//! fn main() -> Result<(), JSONPathError> {
//!     let value = json!({"store": {"book": [{"price": 8.95}, {"price": 22.99}]}});
//!     let nodes = find("$..book[?@.price < 10]", &value)?;
//!
//!     assert_eq!(nodes.len(), 1);
//!     assert_eq!(nodes[0].path(), "$['store']['book'][0]");
//!     Ok(())
//! }
//! ```
//!
//! Use [`compile`] and [`evaluate`] to compile a query once and evaluate it
//! many times. A [`Query`] is displayed in its canonical form.
//!
//! ```
//! use jsonpath_query::{compile, evaluate};
//! use serde_json::json;
//!
//! let query = compile("$.some[?match(@.thing, '7')][1, 4]").unwrap();
//! assert_eq!(query.to_string(), "$['some'][?match(@['thing'], '7')][1, 4]");
//!
//! let value = json!({"some": [{"thing": "7"}]});
//! assert!(evaluate(&query, &value).is_empty());
//! ```
//!
//! ## Function extensions
//!
//! Register additional [function extensions] with an [`EnvironmentBuilder`].
//! Function names that are not registered with the environment compiling a
//! query are reported as a [`JSONPathError`] with `kind` set to
//! [`JSONPathErrorType::TypeError`].
//!
//! ```text
//! type error: unknown function `foo` (3..6)
//! ```
//!
//! [function extensions]: https://datatracker.ietf.org/doc/html/rfc9535#name-function-extensions
pub mod environment;
pub mod errors;
pub mod filter;
pub mod function;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod query;
pub mod standard_functions;
pub mod token;
pub mod value;

mod checker;
mod segment;
mod selector;
mod unescape;

pub use environment::Environment;
pub use environment::EnvironmentBuilder;
pub use errors::JSONPathError;
pub use errors::JSONPathErrorType;
pub use filter::FilterResult;
pub use function::ExpressionType;
pub use function::FunctionExtension;
pub use function::FunctionSignature;
pub use node::Node;
pub use node::NodeList;
pub use node::NodeListExt;
pub use node::PathElement;
pub use parser::Parser;
pub use query::Query;
pub use value::JSONKind;
pub use value::JSONLike;

use environment::DEFAULT_ENVIRONMENT;
use serde_json::Value;

/// Compile `query` with the default environment.
pub fn compile(query: &str) -> Result<Query, JSONPathError> {
    DEFAULT_ENVIRONMENT.compile(query)
}

/// Apply a compiled query to `value` with the default environment.
pub fn evaluate<'v>(query: &Query, value: &'v Value) -> NodeList<'v, Value> {
    DEFAULT_ENVIRONMENT.evaluate(query, value)
}

/// Compile `query` and apply it to `value` with the default environment.
pub fn find<'v>(query: &str, value: &'v Value) -> Result<NodeList<'v, Value>, JSONPathError> {
    DEFAULT_ENVIRONMENT.find(query, value)
}
