//! The function extensions defined by RFC 9535: `count`, `length`, `match`,
//! `search` and `value`.
use std::{
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

use log::debug;
use lru::LruCache;
use regex::Regex;

use crate::{
    filter::FilterResult,
    function::{ExpressionType, FunctionExtension, FunctionRegister, FunctionSignature},
    value::JSONLike,
};

const REGEX_CACHE_SIZE: usize = 100;

/// A register containing every standard function.
pub fn standard_functions<V: JSONLike>() -> FunctionRegister<V> {
    let mut register: FunctionRegister<V> = FunctionRegister::new();
    register.insert("count".to_owned(), Box::new(Count::new()));
    register.insert("length".to_owned(), Box::new(Length::new()));
    register.insert("match".to_owned(), Box::new(Match::new()));
    register.insert("search".to_owned(), Box::new(Search::new()));
    register.insert("value".to_owned(), Box::new(Value::new()));
    register
}

pub struct Count;

impl Count {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> FunctionExtension<V> for Count {
    fn call<'v>(&self, args: Vec<FilterResult<'v, V>>) -> FilterResult<'v, V> {
        match args.first() {
            Some(FilterResult::Nodes(nodes)) => FilterResult::Int(nodes.len() as i64),
            _ => FilterResult::Nothing,
        }
    }

    fn sig(&self) -> FunctionSignature {
        FunctionSignature::new(vec![ExpressionType::Nodes], ExpressionType::Value)
    }
}

pub struct Length;

impl Length {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> FunctionExtension<V> for Length {
    fn call<'v>(&self, args: Vec<FilterResult<'v, V>>) -> FilterResult<'v, V> {
        match args.first() {
            Some(FilterResult::String(s)) => FilterResult::Int(s.chars().count() as i64),
            Some(FilterResult::Array(v)) | Some(FilterResult::Object(v)) => {
                FilterResult::Int(v.len() as i64)
            }
            _ => FilterResult::Nothing,
        }
    }

    fn sig(&self) -> FunctionSignature {
        FunctionSignature::new(vec![ExpressionType::Value], ExpressionType::Value)
    }
}

/// Compiled I-Regexp patterns, including patterns that failed to compile.
struct RegexCache {
    full_match: bool,
    cache: Mutex<LruCache<String, Option<Regex>>>,
}

impl RegexCache {
    fn new(full_match: bool) -> Self {
        let size = NonZeroUsize::new(REGEX_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            full_match,
            cache: Mutex::new(LruCache::new(size)),
        }
    }

    fn is_match(&self, pattern: &str, subject: &str) -> bool {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(re) = cache.get(pattern) {
            return re.as_ref().is_some_and(|re| re.is_match(subject));
        }

        let re = self.compile(pattern);
        let rv = re.as_ref().is_some_and(|re| re.is_match(subject));
        cache.put(pattern.to_owned(), re);
        rv
    }

    fn compile(&self, pattern: &str) -> Option<Regex> {
        if !iregexp::check(pattern) {
            debug!("invalid I-Regexp pattern {:?}", pattern);
            return None;
        }

        let mapped = map_regex(pattern);
        let source = if self.full_match {
            format!(r"\A(?:{})\z", mapped)
        } else {
            mapped
        };

        Regex::new(&source).ok()
    }
}

pub struct Match {
    cache: RegexCache,
}

impl Match {
    pub fn new() -> Self {
        Self {
            cache: RegexCache::new(true),
        }
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> FunctionExtension<V> for Match {
    fn call<'v>(&self, args: Vec<FilterResult<'v, V>>) -> FilterResult<'v, V> {
        match (args.first(), args.get(1)) {
            (Some(FilterResult::String(s)), Some(FilterResult::String(p))) => {
                FilterResult::Bool(self.cache.is_match(p, s))
            }
            _ => FilterResult::Bool(false),
        }
    }

    fn sig(&self) -> FunctionSignature {
        FunctionSignature::new(
            vec![ExpressionType::Value, ExpressionType::Value],
            ExpressionType::Logical,
        )
    }
}

pub struct Search {
    cache: RegexCache,
}

impl Search {
    pub fn new() -> Self {
        Self {
            cache: RegexCache::new(false),
        }
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> FunctionExtension<V> for Search {
    fn call<'v>(&self, args: Vec<FilterResult<'v, V>>) -> FilterResult<'v, V> {
        match (args.first(), args.get(1)) {
            (Some(FilterResult::String(s)), Some(FilterResult::String(p))) => {
                FilterResult::Bool(self.cache.is_match(p, s))
            }
            _ => FilterResult::Bool(false),
        }
    }

    fn sig(&self) -> FunctionSignature {
        FunctionSignature::new(
            vec![ExpressionType::Value, ExpressionType::Value],
            ExpressionType::Logical,
        )
    }
}

pub struct Value;

impl Value {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JSONLike> FunctionExtension<V> for Value {
    fn call<'v>(&self, args: Vec<FilterResult<'v, V>>) -> FilterResult<'v, V> {
        match args.into_iter().next() {
            Some(FilterResult::Nodes(nodes)) => match nodes.as_slice() {
                [node] => FilterResult::from_json_value(node.value),
                _ => FilterResult::Nothing,
            },
            _ => FilterResult::Nothing,
        }
    }

    fn sig(&self) -> FunctionSignature {
        FunctionSignature::new(vec![ExpressionType::Nodes], ExpressionType::Value)
    }
}

/// Map an I-Regexp pattern to `regex` crate syntax.
///
/// The only difference that matters is `.`, which must not match carriage
/// returns or line feeds.
fn map_regex(pattern: &str) -> String {
    let mut escaped = false;
    let mut char_class = false;
    let mut mapped = String::with_capacity(pattern.len());

    for ch in pattern.chars() {
        if escaped {
            mapped.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '.' if !char_class => mapped.push_str(r"[^\n\r]"),
            '\\' => {
                escaped = true;
                mapped.push(ch);
            }
            '[' => {
                char_class = true;
                mapped.push(ch);
            }
            ']' => {
                char_class = false;
                mapped.push(ch);
            }
            _ => mapped.push(ch),
        }
    }

    mapped
}
