//! Well-typedness checks for filter expressions, following RFC 9535 section
//! 2.4.3.
use std::collections::HashMap;

use crate::{
    errors::{JSONPathError, Span},
    function::{ExpressionType, FunctionSignature},
    query::{FilterExpression, FilterExpressionKind, Query, Selector},
};

pub(crate) struct TypeChecker<'p> {
    functions: &'p HashMap<String, FunctionSignature>,
}

impl<'p> TypeChecker<'p> {
    pub fn new(functions: &'p HashMap<String, FunctionSignature>) -> Self {
        TypeChecker { functions }
    }

    /// Check every filter in `query`, including filters in nested queries.
    pub fn check(&self, query: &Query) -> Result<(), JSONPathError> {
        for segment in &query.segments {
            for selector in segment.selectors() {
                if let Selector::Filter { expression, .. } = selector {
                    self.check_test(expression)?;
                }
            }
        }
        Ok(())
    }

    /// Check an expression used for its truth value. That is the top of a
    /// filter selector or an operand of a logical operator.
    fn check_test(&self, expr: &FilterExpression) -> Result<(), JSONPathError> {
        self.check_expression(expr)?;

        match &expr.kind {
            FilterExpressionKind::Function { name, .. } if expr.ty == ExpressionType::Value => {
                Err(JSONPathError::typ(
                    format!("result of {}() must be compared", name),
                    expr.span,
                ))
            }
            FilterExpressionKind::CurrentKey => Err(JSONPathError::typ(
                String::from("current key (`#`) must be compared"),
                expr.span,
            )),
            _ if expr.is_literal() => Err(JSONPathError::typ(
                String::from("filter expression literals must be compared"),
                expr.span,
            )),
            _ => Ok(()),
        }
    }

    fn check_expression(&self, expr: &FilterExpression) -> Result<(), JSONPathError> {
        match &expr.kind {
            FilterExpressionKind::Not { expression }
            | FilterExpressionKind::Grouped { expression } => self.check_test(expression),
            FilterExpressionKind::Logical { left, right, .. } => {
                self.check_test(left)?;
                self.check_test(right)
            }
            FilterExpressionKind::Comparison { left, right, .. } => {
                self.check_comparable(left)?;
                self.check_comparable(right)
            }
            FilterExpressionKind::RelativeQuery { query }
            | FilterExpressionKind::RootQuery { query } => self.check(query),
            FilterExpressionKind::Function { name, args } => {
                self.check_function(name, args, expr.span)
            }
            _ => Ok(()),
        }
    }

    fn check_comparable(&self, expr: &FilterExpression) -> Result<(), JSONPathError> {
        self.check_expression(expr)?;

        match &expr.kind {
            FilterExpressionKind::RelativeQuery { query }
            | FilterExpressionKind::RootQuery { query } => {
                if query.is_singular() {
                    Ok(())
                } else {
                    Err(JSONPathError::typ(
                        String::from("non-singular query is not comparable"),
                        expr.span,
                    ))
                }
            }
            FilterExpressionKind::Function { name, .. } => {
                if expr.ty == ExpressionType::Value {
                    Ok(())
                } else {
                    Err(JSONPathError::typ(
                        format!("result of {}() is not comparable", name),
                        expr.span,
                    ))
                }
            }
            FilterExpressionKind::Not { .. }
            | FilterExpressionKind::Grouped { .. }
            | FilterExpressionKind::Logical { .. }
            | FilterExpressionKind::Comparison { .. } => Err(JSONPathError::typ(
                String::from("logical expression is not comparable"),
                expr.span,
            )),
            _ => Ok(()),
        }
    }

    fn check_function(
        &self,
        name: &str,
        args: &[FilterExpression],
        span: Span,
    ) -> Result<(), JSONPathError> {
        let signature = self
            .functions
            .get(name)
            .ok_or_else(|| JSONPathError::typ(format!("unknown function `{}`", name), span))?;

        // correct number of arguments?
        if args.len() != signature.param_types.len() {
            return Err(JSONPathError::typ(
                format!(
                    "{}() takes {} argument{} but {} were given",
                    name,
                    signature.param_types.len(),
                    if signature.param_types.len() == 1 {
                        ""
                    } else {
                        "s"
                    },
                    args.len()
                ),
                span,
            ));
        }

        // correct argument types?
        for (idx, (arg, typ)) in args.iter().zip(&signature.param_types).enumerate() {
            self.check_expression(arg)?;

            let ok = match typ {
                ExpressionType::Value => is_value_type(arg),
                ExpressionType::Logical => {
                    matches!(arg.ty, ExpressionType::Logical | ExpressionType::Nodes)
                }
                ExpressionType::Nodes => arg.ty == ExpressionType::Nodes,
            };

            if !ok {
                return Err(JSONPathError::typ(
                    format!(
                        "argument {} of {}() must be of a '{}' type",
                        idx + 1,
                        name,
                        typ
                    ),
                    arg.span,
                ));
            }
        }

        Ok(())
    }
}

/// Singular queries are implicitly converted to values.
fn is_value_type(expr: &FilterExpression) -> bool {
    match &expr.kind {
        FilterExpressionKind::RelativeQuery { query } | FilterExpressionKind::RootQuery { query } => {
            query.is_singular()
        }
        _ => expr.ty == ExpressionType::Value,
    }
}
