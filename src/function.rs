//! Function extension types and the function register.
use std::{collections::HashMap, fmt};

use crate::{filter::FilterResult, value::JSONLike};

/// The static type of a filter expression, function argument or function result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionType {
    Logical,
    Nodes,
    Value,
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionType::Logical => f.write_str("Logical"),
            ExpressionType::Nodes => f.write_str("Nodes"),
            ExpressionType::Value => f.write_str("Value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub param_types: Vec<ExpressionType>,
    pub return_type: ExpressionType,
}

impl FunctionSignature {
    pub fn new(param_types: Vec<ExpressionType>, return_type: ExpressionType) -> Self {
        FunctionSignature {
            param_types,
            return_type,
        }
    }
}

/// A named, statically typed function callable from filter expressions.
///
/// Arguments arrive already converted to the declared parameter types. A
/// `Value` parameter receives a scalar, a container or `Nothing`, a `Logical`
/// parameter receives `Bool` and a `Nodes` parameter receives `Nodes`.
/// `call` must return a result matching the signature's return type.
pub trait FunctionExtension<V: JSONLike> {
    fn call<'v>(&self, args: Vec<FilterResult<'v, V>>) -> FilterResult<'v, V>;
    fn sig(&self) -> FunctionSignature;
}

impl<V: JSONLike> fmt::Debug for dyn FunctionExtension<V> + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.sig();
        write!(f, "({:?}) -> {:?}", sig.param_types, sig.return_type)
    }
}

pub type FunctionRegister<V> = HashMap<String, Box<dyn FunctionExtension<V> + Send + Sync>>;

/// Signatures for every function in `register`, as used by the parser.
pub fn signatures<V: JSONLike>(register: &FunctionRegister<V>) -> HashMap<String, FunctionSignature> {
    register
        .iter()
        .map(|(name, ext)| (name.to_owned(), ext.sig()))
        .collect()
}
