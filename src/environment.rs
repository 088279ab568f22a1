//! Query environments.
//!
//! An [`Environment`] owns the function register and the parser configured
//! for it. Queries are compiled once, then evaluated any number of times
//! against any number of values.
//!
//! ```
//! use jsonpath_query::Environment;
//! use serde_json::json;
//!
//! let env: Environment = Environment::builder().strict(true).build();
//! let query = env.compile("$.users[?@.age > 30].name").unwrap();
//!
//! let value = json!({"users": [{"name": "a", "age": 31}, {"name": "b", "age": 29}]});
//! let nodes = env.evaluate(&query, &value);
//!
//! assert_eq!(nodes.len(), 1);
//! assert_eq!(nodes[0].path(), "$['users'][0]['name']");
//! ```
use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;
use serde_json::Value;

use crate::{
    errors::JSONPathError,
    function::{signatures, FunctionExtension, FunctionRegister},
    node::NodeList,
    parser::Parser,
    query::Query,
    standard_functions::standard_functions,
    value::JSONLike,
};

lazy_static! {
    /// An environment with the standard function extensions, used by the
    /// crate level [`compile`](crate::compile), [`evaluate`](crate::evaluate)
    /// and [`find`](crate::find) functions.
    pub static ref DEFAULT_ENVIRONMENT: Environment<Value> = Environment::new();
}

/// A function register, a parser aware of the register's signatures, and
/// a strictness flag. An environment is immutable once built.
#[derive(Debug)]
pub struct Environment<V: JSONLike = Value> {
    parser: Parser,
    function_register: FunctionRegister<V>,
    strict: bool,
}

impl<V: JSONLike> Default for Environment<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> Environment<V> {
    /// A non-strict environment with the standard function extensions.
    pub fn new() -> Self {
        EnvironmentBuilder::new().build()
    }

    pub fn builder() -> EnvironmentBuilder<V> {
        EnvironmentBuilder::new()
    }

    /// Parse and type check `query`.
    pub fn compile(&self, query: &str) -> Result<Query, JSONPathError> {
        let q = self.parser.parse(query)?;
        debug!("compiled {:?} as {}", query, q);
        Ok(q)
    }

    /// Apply a compiled query to `value`. Evaluation never fails.
    pub fn evaluate<'v>(&self, query: &Query, value: &'v V) -> NodeList<'v, V> {
        query.find(value, self)
    }

    /// Compile `query` and apply it to `value`.
    pub fn find<'v>(&self, query: &str, value: &'v V) -> Result<NodeList<'v, V>, JSONPathError> {
        Ok(self.evaluate(&self.compile(query)?, value))
    }

    pub fn function(&self, name: &str) -> Option<&(dyn FunctionExtension<V> + Send + Sync)> {
        self.function_register.get(name).map(|ext| ext.as_ref())
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Configuration for a new [`Environment`].
pub struct EnvironmentBuilder<V: JSONLike> {
    function_register: FunctionRegister<V>,
    strict: bool,
}

impl<V: JSONLike> Default for EnvironmentBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> EnvironmentBuilder<V> {
    /// Start from the standard function extensions.
    pub fn new() -> Self {
        EnvironmentBuilder {
            function_register: standard_functions(),
            strict: false,
        }
    }

    /// Start from an empty function register.
    pub fn bare() -> Self {
        EnvironmentBuilder {
            function_register: FunctionRegister::new(),
            strict: false,
        }
    }

    /// Reject a literal zero slice step and the `#` current key identifier
    /// at compile time.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Register a function extension, replacing any existing function with
    /// the same name.
    pub fn function(
        mut self,
        name: &str,
        extension: impl FunctionExtension<V> + Send + Sync + 'static,
    ) -> Self {
        self.function_register
            .insert(name.to_owned(), Box::new(extension));
        self
    }

    pub fn build(self) -> Environment<V> {
        let mut parser = Parser::new().with_strict(self.strict);

        for (name, sig) in signatures(&self.function_register) {
            parser.add_function(&name, sig.param_types, sig.return_type);
        }

        debug!(
            "built environment with functions [{}], strict = {}",
            self.function_register.keys().sorted().join(", "),
            self.strict
        );

        Environment {
            parser,
            function_register: self.function_register,
            strict: self.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::FilterResult,
        function::{ExpressionType, FunctionSignature},
    };
    use serde_json::json;

    struct Always;

    impl FunctionExtension<Value> for Always {
        fn call<'v>(&self, _args: Vec<FilterResult<'v, Value>>) -> FilterResult<'v, Value> {
            FilterResult::Bool(true)
        }

        fn sig(&self) -> FunctionSignature {
            FunctionSignature::new(vec![], ExpressionType::Logical)
        }
    }

    #[test]
    fn standard_functions_are_registered() {
        let env: Environment = Environment::new();
        for name in ["count", "length", "match", "search", "value"] {
            assert!(env.function(name).is_some(), "missing {}", name);
        }
        assert!(!env.is_strict());
    }

    #[test]
    fn bare_environments_have_no_functions() {
        let env: Environment = EnvironmentBuilder::bare().build();
        assert!(env.function("count").is_none());
        assert_eq!(
            env.compile("$[?count(@.*) > 1]").unwrap_err().msg,
            "unknown function `count`"
        );
    }

    #[test]
    fn custom_function() {
        let env: Environment = Environment::builder().function("always", Always).build();
        let value = json!([1, 2]);
        assert_eq!(env.find("$[?always()]", &value).unwrap().len(), 2);
    }

    #[test]
    fn default_environment() {
        let value = json!({"a": [1, 2, 3]});
        let nodes = DEFAULT_ENVIRONMENT.find("$.a[-1]", &value).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].value, &json!(3));
    }
}
