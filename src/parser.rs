//! A recursive descent parser turning a token stream into a [`Query`].
//!
//! Filter expressions are parsed with precedence climbing. The resulting
//! syntax tree is handed to the type checker before it is returned.
use std::{collections::HashMap, iter::Peekable, ops::RangeInclusive, vec::IntoIter};

use crate::{
    checker::TypeChecker,
    errors::{JSONPathError, Span},
    function::{ExpressionType, FunctionSignature},
    lexer::lex,
    query::{
        ComparisonOperator, FilterExpression, FilterExpressionKind, LogicalOperator, Query,
        Segment, Selector,
    },
    token::{Token, TokenType},
    unescape::unescape,
};

use TokenType::*;

static EOQ_TOKEN: Token = Token {
    kind: Eoq,
    span: (0, 0),
};

type Tokens = Peekable<IntoIter<Token>>;

const PRECEDENCE_LOWEST: u8 = 1;
const PRECEDENCE_LOGICAL_OR: u8 = 3;
const PRECEDENCE_LOGICAL_AND: u8 = 4;
const PRECEDENCE_RELATIONAL: u8 = 5;
const PRECEDENCE_LOGICAL_NOT: u8 = 7;

/// A JSONPath query parser.
///
/// The parser knows the signature of every function a query may call, but
/// nothing about how those functions behave.
#[derive(Debug, Clone)]
pub struct Parser {
    functions: HashMap<String, FunctionSignature>,
    index_range: RangeInclusive<i64>,
    strict: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A parser with no registered functions.
    pub fn new() -> Self {
        Parser {
            functions: HashMap::new(),
            index_range: ((-2_i64).pow(53) + 1)..=(2_i64.pow(53) - 1),
            strict: false,
        }
    }

    /// Disallow non-standard syntax and statically detectable no-ops.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn add_function(
        &mut self,
        name: &str,
        param_types: Vec<ExpressionType>,
        return_type: ExpressionType,
    ) {
        self.functions.insert(
            name.to_owned(),
            FunctionSignature::new(param_types, return_type),
        );
    }

    pub fn parse(&self, query: &str) -> Result<Query, JSONPathError> {
        let mut it = lex(query)?.into_iter().peekable();

        let token = next(&mut it);
        if token.kind != Root {
            return Err(JSONPathError::syntax(
                format!("expected '$', found {}", token.kind),
                token.span,
            ));
        }

        let segments = self.parse_segments(&mut it)?;

        let token = next(&mut it);
        if token.kind != Eoq {
            return Err(JSONPathError::syntax(
                format!("expected end of query, found {}", token.kind),
                token.span,
            ));
        }

        let query = Query::new(segments);
        TypeChecker::new(&self.functions).check(&query)?;
        Ok(query)
    }

    fn parse_segments(&self, it: &mut Tokens) -> Result<Vec<Segment>, JSONPathError> {
        let mut segments: Vec<Segment> = Vec::new();

        loop {
            match peek(it).kind {
                DoubleDot => {
                    let token = next(it);
                    let (end, selectors) = match peek(it).kind {
                        LBracket => self.parse_bracketed(it)?,
                        _ => {
                            let token = next(it);
                            (token.span.1, vec![self.parse_shorthand(token)?])
                        }
                    };
                    segments.push(Segment::Recursive {
                        span: (token.span.0, end),
                        selectors,
                    });
                }
                LBracket => {
                    let start = peek(it).span.0;
                    let (end, selectors) = self.parse_bracketed(it)?;
                    segments.push(Segment::Child {
                        span: (start, end),
                        selectors,
                    });
                }
                Name { .. } | Wild => {
                    let token = next(it);
                    segments.push(Segment::Child {
                        span: token.span,
                        selectors: vec![self.parse_shorthand(token)?],
                    });
                }
                _ => break,
            }
        }

        Ok(segments)
    }

    fn parse_shorthand(&self, token: Token) -> Result<Selector, JSONPathError> {
        match token.kind {
            Name { value } => Ok(Selector::Name {
                span: token.span,
                name: value.to_string(),
            }),
            Wild => Ok(Selector::Wild { span: token.span }),
            kind => Err(JSONPathError::syntax(
                format!("expected a shorthand selector, found {}", kind),
                token.span,
            )),
        }
    }

    /// Parse a bracketed selection, returning the offset just past its
    /// closing bracket along with its selectors.
    fn parse_bracketed(&self, it: &mut Tokens) -> Result<(usize, Vec<Selector>), JSONPathError> {
        let open = next(it); // LBracket
        let mut selectors: Vec<Selector> = Vec::new();

        loop {
            let token = next(it);
            match token.kind {
                RBracket => {
                    if selectors.is_empty() {
                        return Err(JSONPathError::syntax(
                            String::from("empty bracketed selection"),
                            (open.span.0, token.span.1),
                        ));
                    }
                    return Ok((token.span.1, selectors));
                }
                Index { .. } | Colon => selectors.push(self.parse_slice_or_index(token, it)?),
                DoubleQuoteString { ref value } => selectors.push(Selector::Name {
                    span: token.span,
                    name: unescape(value, '"', token.span)?,
                }),
                SingleQuoteString { ref value } => selectors.push(Selector::Name {
                    span: token.span,
                    name: unescape(value, '\'', token.span)?,
                }),
                Wild => selectors.push(Selector::Wild { span: token.span }),
                Filter => selectors.push(self.parse_filter(token, it)?),
                Comma => {
                    return Err(JSONPathError::syntax(
                        String::from("unexpected comma"),
                        token.span,
                    ));
                }
                Eoq => {
                    return Err(JSONPathError::syntax(
                        String::from("unclosed bracketed selection"),
                        open.span,
                    ));
                }
                kind => {
                    return Err(JSONPathError::syntax(
                        format!("unexpected selector token {}", kind),
                        token.span,
                    ));
                }
            }

            // expect a comma or closing bracket
            match peek(it).kind {
                RBracket => continue,
                Comma => {
                    let comma = next(it);
                    if peek(it).kind == RBracket {
                        return Err(JSONPathError::syntax(
                            String::from("unexpected trailing comma"),
                            comma.span,
                        ));
                    }
                }
                _ => {
                    let token = next(it);
                    return Err(JSONPathError::syntax(
                        format!("expected a comma or closing bracket, found {}", token.kind),
                        token.span,
                    ));
                }
            }
        }
    }

    fn parse_slice_or_index(&self, token: Token, it: &mut Tokens) -> Result<Selector, JSONPathError> {
        if let Index { ref value } = token.kind {
            if peek(it).kind != Colon {
                return Ok(Selector::Index {
                    span: token.span,
                    index: self.parse_i_json_int(value, token.span)?,
                });
            }
        }

        let start_span = token.span;
        let mut end = token.span.1;
        let mut start: Option<i64> = None;
        let mut stop: Option<i64> = None;
        let mut step: Option<i64> = None;

        // 1: or :
        if let Index { ref value } = token.kind {
            start = Some(self.parse_i_json_int(value, token.span)?);
            end = next(it).span.1; // colon
        }

        // 1 or 1: or : or ]
        if let Index { .. } = peek(it).kind {
            let token = next(it);
            if let Index { ref value } = token.kind {
                stop = Some(self.parse_i_json_int(value, token.span)?);
            }
            end = token.span.1;
        }

        if peek(it).kind == Colon {
            end = next(it).span.1;

            if let Index { .. } = peek(it).kind {
                let token = next(it);
                if let Index { ref value } = token.kind {
                    step = Some(self.parse_i_json_int(value, token.span)?);
                }
                end = token.span.1;
            }
        }

        let span = (start_span.0, end);

        if self.strict && step == Some(0) {
            return Err(JSONPathError::syntax(
                String::from("zero step size is disallowed in strict mode"),
                span,
            ));
        }

        Ok(Selector::Slice {
            span,
            start,
            stop,
            step,
        })
    }

    fn parse_i_json_int(&self, value: &str, span: Span) -> Result<i64, JSONPathError> {
        if value == "-0" {
            return Err(JSONPathError::syntax(
                String::from("negative zero is not a valid index"),
                span,
            ));
        }

        let digits = value.strip_prefix('-').unwrap_or(value);
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(JSONPathError::syntax(
                String::from("unexpected leading zero in index selector"),
                span,
            ));
        }

        let i = value
            .parse::<i64>()
            .map_err(|_| JSONPathError::syntax(format!("index out of range `{}`", value), span))?;

        if !self.index_range.contains(&i) {
            return Err(JSONPathError::syntax(
                format!("index out of range `{}`", value),
                span,
            ));
        }

        Ok(i)
    }

    fn parse_filter(&self, token: Token, it: &mut Tokens) -> Result<Selector, JSONPathError> {
        let expr = self.parse_filter_expression(it, PRECEDENCE_LOWEST)?;
        Ok(Selector::Filter {
            span: (token.span.0, expr.span.1),
            expression: Box::new(expr),
        })
    }

    fn parse_filter_expression(
        &self,
        it: &mut Tokens,
        precedence: u8,
    ) -> Result<FilterExpression, JSONPathError> {
        let mut left = self.parse_basic_expression(it)?;

        loop {
            let kind = &peek(it).kind;
            if !is_infix(kind) || self.precedence(kind) <= precedence {
                break;
            }
            left = self.parse_infix_expression(it, left)?;
        }

        Ok(left)
    }

    fn parse_infix_expression(
        &self,
        it: &mut Tokens,
        left: FilterExpression,
    ) -> Result<FilterExpression, JSONPathError> {
        let token = next(it);
        let precedence = self.precedence(&token.kind);
        let right = self.parse_filter_expression(it, precedence)?;
        let span = (left.span.0, right.span.1);
        let left = Box::new(left);
        let right = Box::new(right);

        let kind = match token.kind {
            And => FilterExpressionKind::Logical {
                left,
                operator: LogicalOperator::And,
                right,
            },
            Or => FilterExpressionKind::Logical {
                left,
                operator: LogicalOperator::Or,
                right,
            },
            Eq | Ne | Ge | Gt | Le | Lt => FilterExpressionKind::Comparison {
                left,
                operator: comparison_operator(&token.kind),
                right,
            },
            kind => {
                return Err(JSONPathError::syntax(
                    format!("unexpected infix operator {}", kind),
                    token.span,
                ))
            }
        };

        Ok(FilterExpression::new(span, kind, ExpressionType::Logical))
    }

    fn parse_basic_expression(&self, it: &mut Tokens) -> Result<FilterExpression, JSONPathError> {
        let token = next(it);
        let span = token.span;

        match token.kind {
            DoubleQuoteString { ref value } => Ok(FilterExpression::new(
                span,
                FilterExpressionKind::String {
                    value: unescape(value, '"', span)?,
                },
                ExpressionType::Value,
            )),
            SingleQuoteString { ref value } => Ok(FilterExpression::new(
                span,
                FilterExpressionKind::String {
                    value: unescape(value, '\'', span)?,
                },
                ExpressionType::Value,
            )),
            True => Ok(FilterExpression::new(
                span,
                FilterExpressionKind::True,
                ExpressionType::Value,
            )),
            False => Ok(FilterExpression::new(
                span,
                FilterExpressionKind::False,
                ExpressionType::Value,
            )),
            Null => Ok(FilterExpression::new(
                span,
                FilterExpressionKind::Null,
                ExpressionType::Value,
            )),
            Int { ref value } => self.parse_int_literal(value, span),
            Float { ref value } => {
                let f = parse_finite(value, span)?;
                Ok(FilterExpression::new(
                    span,
                    FilterExpressionKind::Float { value: f },
                    ExpressionType::Value,
                ))
            }
            Root => {
                let segments = self.parse_segments(it)?;
                let end = segments.last().map_or(span.1, |s| s.span().1);
                Ok(FilterExpression::new(
                    (span.0, end),
                    FilterExpressionKind::RootQuery {
                        query: Box::new(Query::new(segments)),
                    },
                    ExpressionType::Nodes,
                ))
            }
            Current => {
                let segments = self.parse_segments(it)?;
                let end = segments.last().map_or(span.1, |s| s.span().1);
                Ok(FilterExpression::new(
                    (span.0, end),
                    FilterExpressionKind::RelativeQuery {
                        query: Box::new(Query::new(segments)),
                    },
                    ExpressionType::Nodes,
                ))
            }
            CurrentKey => {
                if self.strict {
                    return Err(JSONPathError::syntax(
                        String::from("current key syntax (`#`) is disabled in strict mode"),
                        span,
                    ));
                }
                Ok(FilterExpression::new(
                    span,
                    FilterExpressionKind::CurrentKey,
                    ExpressionType::Value,
                ))
            }
            Function { ref name } => self.parse_function_call(name, span, it),
            LParen => self.parse_grouped_expression(span, it),
            Not => self.parse_not_expression(span, it),
            kind => Err(JSONPathError::syntax(
                format!("expected a filter expression, found {}", kind),
                span,
            )),
        }
    }

    /// Integer literals may carry an exponent. Those that don't fit an `i64`
    /// become floats.
    fn parse_int_literal(&self, value: &str, span: Span) -> Result<FilterExpression, JSONPathError> {
        let kind = match value.parse::<i64>() {
            Ok(i) => FilterExpressionKind::Int { value: i },
            Err(_) => {
                let f = parse_finite(value, span)?;

                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    FilterExpressionKind::Int { value: f as i64 }
                } else {
                    FilterExpressionKind::Float { value: f }
                }
            }
        };

        Ok(FilterExpression::new(span, kind, ExpressionType::Value))
    }

    fn parse_grouped_expression(
        &self,
        open: Span,
        it: &mut Tokens,
    ) -> Result<FilterExpression, JSONPathError> {
        let expr = self.parse_filter_expression(it, PRECEDENCE_LOWEST)?;
        let token = next(it);

        match token.kind {
            RParen => Ok(FilterExpression::new(
                (open.0, token.span.1),
                FilterExpressionKind::Grouped {
                    expression: Box::new(expr),
                },
                ExpressionType::Logical,
            )),
            Eoq | RBracket | Comma => Err(JSONPathError::syntax(
                String::from("unbalanced parentheses"),
                open,
            )),
            kind => Err(JSONPathError::syntax(
                format!("expected ')', found {}", kind),
                token.span,
            )),
        }
    }

    fn parse_not_expression(
        &self,
        not: Span,
        it: &mut Tokens,
    ) -> Result<FilterExpression, JSONPathError> {
        let expr = self.parse_filter_expression(it, PRECEDENCE_LOGICAL_NOT)?;
        Ok(FilterExpression::new(
            (not.0, expr.span.1),
            FilterExpressionKind::Not {
                expression: Box::new(expr),
            },
            ExpressionType::Logical,
        ))
    }

    fn parse_function_call(
        &self,
        name: &str,
        span: Span,
        it: &mut Tokens,
    ) -> Result<FilterExpression, JSONPathError> {
        let signature = self
            .functions
            .get(name)
            .ok_or_else(|| JSONPathError::typ(format!("unknown function `{}`", name), span))?;

        let mut args: Vec<FilterExpression> = Vec::new();
        let end;

        if peek(it).kind == RParen {
            end = next(it).span.1;
        } else {
            loop {
                args.push(self.parse_filter_expression(it, PRECEDENCE_LOWEST)?);

                let token = next(it);
                match token.kind {
                    RParen => {
                        end = token.span.1;
                        break;
                    }
                    Comma => (),
                    kind => {
                        return Err(JSONPathError::syntax(
                            format!("expected a comma or closing parenthesis, found {}", kind),
                            token.span,
                        ))
                    }
                }
            }
        }

        Ok(FilterExpression::new(
            (span.0, end),
            FilterExpressionKind::Function {
                name: name.to_owned(),
                args,
            },
            signature.return_type,
        ))
    }

    fn precedence(&self, kind: &TokenType) -> u8 {
        match kind {
            And => PRECEDENCE_LOGICAL_AND,
            Eq | Ge | Gt | Le | Lt | Ne => PRECEDENCE_RELATIONAL,
            Not => PRECEDENCE_LOGICAL_NOT,
            Or => PRECEDENCE_LOGICAL_OR,
            _ => PRECEDENCE_LOWEST,
        }
    }
}

fn next(it: &mut Tokens) -> Token {
    it.next().unwrap_or_else(|| EOQ_TOKEN.clone())
}

fn peek(it: &mut Tokens) -> &Token {
    it.peek().unwrap_or(&EOQ_TOKEN)
}

/// Number literals that overflow `f64` have no canonical form.
fn parse_finite(value: &str, span: Span) -> Result<f64, JSONPathError> {
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(_) => Err(JSONPathError::syntax(
            format!("number literal out of range `{}`", value),
            span,
        )),
        Err(_) => Err(JSONPathError::syntax(
            format!("invalid number literal `{}`", value),
            span,
        )),
    }
}

fn is_infix(kind: &TokenType) -> bool {
    matches!(kind, Eq | Ge | Gt | Le | Lt | Ne | And | Or)
}

fn comparison_operator(kind: &TokenType) -> ComparisonOperator {
    match kind {
        Ne => ComparisonOperator::Ne,
        Ge => ComparisonOperator::Ge,
        Gt => ComparisonOperator::Gt,
        Le => ComparisonOperator::Le,
        Lt => ComparisonOperator::Lt,
        _ => ComparisonOperator::Eq,
    }
}
