//! A state machine lexer for JSONPath query strings.
//!
//! [`tokenize`] returns a lazy [`Lexer`] that yields tokens on demand. The
//! stream ends after an `Eoq` token or after the first `Error` token. Use
//! [`lex`] to collect all tokens and turn a lexical error into a
//! [`JSONPathError`].
use std::{collections::VecDeque, str::CharIndices};

use crate::{
    errors::{JSONPathError, Span},
    token::{Token, TokenType, EOQ},
};

#[derive(Debug, Clone, Copy)]
enum State {
    Error,
    EndOfQuery,
    LexRoot,
    LexSegment,
    LexDescendantSegment,
    LexShorthandSegment,
    LexInsideBracketedSegment,
    LexInsideFilter,
    LexInsideSingleQuotedString,
    LexInsideDoubleQuotedString,
    LexInsideSingleQuotedFilterString,
    LexInsideDoubleQuotedFilterString,
}

/// A JSONPath tokenizer, producing tokens one at a time.
pub struct Lexer<'q> {
    query: &'q str,
    state: State,
    pending: VecDeque<Token>,

    chars: CharIndices<'q>,
    start: usize,
    pos: usize,

    filter_depth: u32,
    // (filter depth, open paren count) for each function call we're inside.
    call_stack: Vec<(u32, u32)>,
    // Offsets of unclosed left brackets.
    bracket_stack: Vec<usize>,
}

impl<'q> Iterator for Lexer<'q> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }

            self.state = match self.state {
                State::Error | State::EndOfQuery => return None,
                State::LexRoot => lex_root(self),
                State::LexSegment => lex_segment(self),
                State::LexDescendantSegment => lex_descendant_segment(self),
                State::LexShorthandSegment => lex_shorthand_selector(self),
                State::LexInsideBracketedSegment => lex_inside_bracketed_segment(self),
                State::LexInsideFilter => lex_inside_filter(self),
                State::LexInsideSingleQuotedString => {
                    lex_string(self, '\'', State::LexInsideBracketedSegment)
                }
                State::LexInsideDoubleQuotedString => {
                    lex_string(self, '"', State::LexInsideBracketedSegment)
                }
                State::LexInsideSingleQuotedFilterString => {
                    lex_string(self, '\'', State::LexInsideFilter)
                }
                State::LexInsideDoubleQuotedFilterString => {
                    lex_string(self, '"', State::LexInsideFilter)
                }
            };
        }
    }
}

impl<'q> Lexer<'q> {
    pub fn new(query: &'q str) -> Self {
        Self {
            query,
            state: State::LexRoot,
            pending: VecDeque::new(),
            start: 0,
            pos: 0,
            chars: query.char_indices(),
            filter_depth: 0,
            call_stack: Vec::new(),
            bracket_stack: Vec::new(),
        }
    }

    fn emit(&mut self, t: TokenType) {
        self.pending.push_back(Token::new(t, self.start, self.pos));
        self.start = self.pos;
    }

    fn value(&self) -> &str {
        // start and pos are always on char boundaries
        self.query.get(self.start..self.pos).unwrap_or_default()
    }

    fn boxed_value(&self) -> Box<str> {
        self.value().to_string().into_boxed_str()
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();

            #[cfg(debug_assertions)]
            debug_assert!(
                self.pos <= self.query.len(),
                "current position is out of bounds"
            );

            Some(ch)
        } else {
            None
        }
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn peek_char(&self) -> char {
        if let Some((_, ch)) = self.chars.clone().next() {
            ch
        } else {
            EOQ
        }
    }

    fn accept(&mut self, ch: char) -> bool {
        if self.peek_char() == ch {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn accept_if(&mut self, pred: impl FnOnce(char) -> bool) -> bool {
        if pred(self.peek_char()) {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn accept_run(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let mut accepted = false;
        while pred(self.peek_char()) {
            self.next_char();
            accepted = true;
        }
        accepted
    }

    fn ignore_whitespace(&mut self) -> bool {
        #[cfg(debug_assertions)]
        debug_assert!(
            self.pos == self.start,
            "must emit or ignore before eating whitespace"
        );

        if self.accept_run(is_whitespace_char) {
            self.ignore();
            true
        } else {
            false
        }
    }

    fn emit_lbracket(&mut self) {
        self.bracket_stack.push(self.start);
        self.emit(TokenType::LBracket);
    }

    fn emit_rbracket(&mut self) {
        self.bracket_stack.pop();
        self.emit(TokenType::RBracket);
    }

    /// True if the innermost open function call belongs to the current filter.
    fn in_call(&self) -> bool {
        self.call_stack
            .last()
            .is_some_and(|(depth, _)| *depth == self.filter_depth)
    }

    fn error(&mut self, msg: String) -> State {
        let span = (self.start, self.pos);
        self.error_at(msg, span)
    }

    fn error_at(&mut self, msg: String, span: Span) -> State {
        self.pending.push_back(Token::new(
            TokenType::Error {
                msg: msg.into_boxed_str(),
            },
            span.0,
            span.1,
        ));
        State::Error
    }

    fn unclosed_bracket(&mut self) -> State {
        let span = match self.bracket_stack.last() {
            Some(open) => (*open, open + 1),
            None => (self.start, self.pos),
        };
        self.error_at(String::from("unclosed bracketed selection"), span)
    }
}

/// Return a lazy token stream for `query`.
pub fn tokenize(query: &str) -> Lexer<'_> {
    Lexer::new(query)
}

/// Tokenize `query` in full, failing on the first lexical error.
pub fn lex(query: &str) -> Result<Vec<Token>, JSONPathError> {
    let mut tokens = Vec::new();

    for token in tokenize(query) {
        if let TokenType::Error { msg } = &token.kind {
            return Err(JSONPathError::syntax(msg.to_string(), token.span));
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn lex_root(l: &mut Lexer) -> State {
    if l.accept('$') {
        l.emit(TokenType::Root);
        State::LexSegment
    } else {
        let msg = match l.next_char() {
            Some(ch) => format!("expected '$', found '{}'", ch),
            None => String::from("expected '$', found end of query"),
        };
        l.error(msg)
    }
}

fn lex_segment(l: &mut Lexer) -> State {
    if l.ignore_whitespace() && l.peek_char() == EOQ {
        return l.error(String::from("unexpected trailing whitespace"));
    }

    if l.accept('.') {
        if l.accept('.') {
            l.emit(TokenType::DoubleDot);
            State::LexDescendantSegment
        } else {
            State::LexShorthandSegment
        }
    } else if l.accept('[') {
        l.emit_lbracket();
        State::LexInsideBracketedSegment
    } else if l.filter_depth > 0 {
        State::LexInsideFilter
    } else if l.peek_char() == EOQ {
        l.emit(TokenType::Eoq);
        State::EndOfQuery
    } else {
        let msg = format!(
            "expected '.', '..' or a bracketed selection, found '{}'",
            l.peek_char()
        );
        l.next_char();
        l.error(msg)
    }
}

fn lex_descendant_segment(l: &mut Lexer) -> State {
    if l.accept('*') {
        l.emit(TokenType::Wild);
        State::LexSegment
    } else if l.accept('[') {
        l.emit_lbracket();
        State::LexInsideBracketedSegment
    } else if l.accept_if(is_name_first) {
        l.accept_run(is_name_char);
        l.emit(TokenType::Name {
            value: l.boxed_value(),
        });
        State::LexSegment
    } else if l.peek_char() == EOQ {
        l.error(String::from("bald descendant segment"))
    } else {
        let msg = format!("unexpected descendant selection token '{}'", l.peek_char());
        l.next_char();
        l.error(msg)
    }
}

fn lex_shorthand_selector(l: &mut Lexer) -> State {
    l.ignore(); // ignore dot

    if l.accept_run(is_whitespace_char) {
        return l.error(String::from("unexpected whitespace after dot"));
    }

    if l.accept('*') {
        l.emit(TokenType::Wild);
        State::LexSegment
    } else if l.accept_if(is_name_first) {
        l.accept_run(is_name_char);
        l.emit(TokenType::Name {
            value: l.boxed_value(),
        });
        State::LexSegment
    } else if l.peek_char() == EOQ {
        l.error(String::from("unexpected end of query after dot"))
    } else {
        let msg = format!("unexpected shorthand selector '{}'", l.peek_char());
        l.next_char();
        l.error(msg)
    }
}

fn lex_inside_bracketed_segment(l: &mut Lexer) -> State {
    l.ignore_whitespace();

    match l.peek_char() {
        ']' => {
            l.next_char();
            l.emit_rbracket();
            if l.filter_depth > 0 {
                State::LexInsideFilter
            } else {
                State::LexSegment
            }
        }
        '*' => {
            l.next_char();
            l.emit(TokenType::Wild);
            State::LexInsideBracketedSegment
        }
        '?' => {
            l.next_char();
            l.emit(TokenType::Filter);
            l.filter_depth += 1;
            State::LexInsideFilter
        }
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            State::LexInsideBracketedSegment
        }
        ':' => {
            l.next_char();
            l.emit(TokenType::Colon);
            State::LexInsideBracketedSegment
        }
        '\'' => {
            l.next_char();
            State::LexInsideSingleQuotedString
        }
        '"' => {
            l.next_char();
            State::LexInsideDoubleQuotedString
        }
        '-' => {
            // negative array index or slice
            l.next_char();
            if l.accept_run(is_digit) {
                l.emit(TokenType::Index {
                    value: l.boxed_value(),
                });
                State::LexInsideBracketedSegment
            } else {
                let msg = format!("expected a digit after '-', found '{}'", l.peek_char());
                l.error(msg)
            }
        }
        EOQ => l.unclosed_bracket(),
        ch => {
            if l.accept_run(is_digit) {
                l.emit(TokenType::Index {
                    value: l.boxed_value(),
                });
                State::LexInsideBracketedSegment
            } else {
                l.next_char();
                l.error(format!("unexpected '{}' in bracketed selection", ch))
            }
        }
    }
}

fn lex_inside_filter(l: &mut Lexer) -> State {
    l.ignore_whitespace();

    match l.peek_char() {
        EOQ => l.unclosed_bracket(),
        ']' => {
            if l.in_call() {
                l.next_char();
                return l.error(String::from("unbalanced parentheses"));
            }
            l.filter_depth -= 1;
            State::LexInsideBracketedSegment
        }
        ',' => {
            l.next_char();
            l.emit(TokenType::Comma);
            // Inside a function call a comma separates arguments. Otherwise
            // it separates selectors.
            if l.in_call() {
                State::LexInsideFilter
            } else {
                l.filter_depth -= 1;
                State::LexInsideBracketedSegment
            }
        }
        '\'' => {
            l.next_char();
            State::LexInsideSingleQuotedFilterString
        }
        '"' => {
            l.next_char();
            State::LexInsideDoubleQuotedFilterString
        }
        '(' => {
            l.next_char();
            l.emit(TokenType::LParen);
            if l.in_call() {
                if let Some((_, parens)) = l.call_stack.last_mut() {
                    *parens += 1;
                }
            }
            State::LexInsideFilter
        }
        ')' => {
            l.next_char();
            l.emit(TokenType::RParen);
            if l.in_call() {
                if let Some((_, parens)) = l.call_stack.last_mut() {
                    *parens -= 1;
                    if *parens == 0 {
                        l.call_stack.pop();
                    }
                }
            }
            State::LexInsideFilter
        }
        '$' => {
            l.next_char();
            l.emit(TokenType::Root);
            State::LexSegment
        }
        '@' => {
            l.next_char();
            l.emit(TokenType::Current);
            State::LexSegment
        }
        '#' => {
            l.next_char();
            l.emit(TokenType::CurrentKey);
            State::LexInsideFilter
        }
        '.' => {
            l.next_char();
            l.error(String::from("unexpected '.' in filter expression"))
        }
        '!' => {
            l.next_char();
            if l.accept('=') {
                l.emit(TokenType::Ne);
            } else {
                l.emit(TokenType::Not);
            }
            State::LexInsideFilter
        }
        '=' => {
            l.next_char();
            if l.accept('=') {
                l.emit(TokenType::Eq);
                State::LexInsideFilter
            } else {
                l.error(String::from("expected '==', found '='"))
            }
        }
        '<' => {
            l.next_char();
            if l.accept('=') {
                l.emit(TokenType::Le);
            } else {
                l.emit(TokenType::Lt);
            }
            State::LexInsideFilter
        }
        '>' => {
            l.next_char();
            if l.accept('=') {
                l.emit(TokenType::Ge);
            } else {
                l.emit(TokenType::Gt);
            }
            State::LexInsideFilter
        }
        '&' => {
            l.next_char();
            if l.accept('&') {
                l.emit(TokenType::And);
                State::LexInsideFilter
            } else {
                l.error(String::from("unexpected '&', did you mean '&&'?"))
            }
        }
        '|' => {
            l.next_char();
            if l.accept('|') {
                l.emit(TokenType::Or);
                State::LexInsideFilter
            } else {
                l.error(String::from("unexpected '|', did you mean '||'?"))
            }
        }
        '-' => {
            // negative number
            l.next_char();
            lex_number(l)
        }
        ch if is_digit(ch) => lex_number(l),
        ch if is_function_name_first(ch) => {
            // function name or keyword
            l.accept_run(is_function_name_char);
            match l.value() {
                "true" => l.emit(TokenType::True),
                "false" => l.emit(TokenType::False),
                "null" => l.emit(TokenType::Null),
                _ => {
                    if l.peek_char() == '(' {
                        l.call_stack.push((l.filter_depth, 1));
                        l.emit(TokenType::Function {
                            name: l.boxed_value(),
                        });
                        l.next_char();
                        l.ignore(); // discard the left paren
                    } else {
                        let msg = format!("expected a keyword or function call, found '{}'", l.value());
                        return l.error(msg);
                    }
                }
            }
            State::LexInsideFilter
        }
        ch => {
            l.next_char();
            l.error(format!("unexpected filter expression token '{}'", ch))
        }
    }
}

fn lex_string(l: &mut Lexer, quote: char, next_state: State) -> State {
    let quote_start = l.start;
    l.ignore(); // ignore open quote

    loop {
        match l.peek_char() {
            '\\' => {
                l.next_char();
                if l.accept('u') {
                    for _ in 0..4 {
                        if !l.accept_if(|c| c.is_ascii_hexdigit()) {
                            return l.error(String::from("invalid \\uXXXX escape"));
                        }
                    }
                } else if !l.accept_if(|c| is_escape_char(c) || c == quote) {
                    return l.error(String::from("invalid escape sequence"));
                }
            }
            EOQ => {
                let msg = format!("unclosed string starting at index {}", quote_start);
                let span = (quote_start, l.pos);
                return l.error_at(msg, span);
            }
            ch if ch == quote => {
                l.emit(if quote == '\'' {
                    TokenType::SingleQuoteString {
                        value: l.boxed_value(),
                    }
                } else {
                    TokenType::DoubleQuoteString {
                        value: l.boxed_value(),
                    }
                });
                l.next_char();
                l.ignore(); // ignore closing quote
                return next_state;
            }
            _ => {
                l.next_char();
            }
        }
    }
}

fn lex_number(l: &mut Lexer) -> State {
    if l.accept('0') {
        if is_digit(l.peek_char()) {
            l.next_char();
            return l.error(String::from("unexpected leading zero in number literal"));
        }
    } else if !l.accept_run(is_digit) {
        let msg = format!("expected a digit, found '{}'", l.peek_char());
        return l.error(msg);
    }

    let mut float = false;

    if l.accept('.') {
        if !l.accept_run(is_digit) {
            return l.error(String::from(
                "a fractional digit is required after a decimal point",
            ));
        }
        float = true;
    }

    if l.accept_if(|ch| ch == 'e' || ch == 'E') {
        // a negative exponent always gives a float
        if l.accept('-') {
            float = true;
        } else {
            l.accept('+');
        }

        if !l.accept_run(is_digit) {
            return l.error(String::from("at least one exponent digit is required"));
        }
    }

    let value = l.boxed_value();
    if float {
        l.emit(TokenType::Float { value });
    } else {
        l.emit(TokenType::Int { value });
    }

    State::LexInsideFilter
}

fn is_name_first(ch: char) -> bool {
    let code_point = ch as u32;
    // surrogate pair code points are not representable with char
    (0x41..=0x5A).contains(&code_point)
        || code_point == 0x5F
        || (0x61..=0x7A).contains(&code_point)
        || code_point >= 0x80
}

fn is_name_char(ch: char) -> bool {
    is_name_first(ch) || is_digit(ch)
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_function_name_first(ch: char) -> bool {
    ch.is_ascii_lowercase()
}

fn is_function_name_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_'
}

fn is_escape_char(ch: char) -> bool {
    matches!(ch, 'b' | 'f' | 'n' | 'r' | 't' | '/' | '\\')
}

fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r' | '\t')
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenType::*;

    fn name(value: &str) -> TokenType {
        Name {
            value: value.to_string().into_boxed_str(),
        }
    }

    fn index(value: &str) -> TokenType {
        Index {
            value: value.to_string().into_boxed_str(),
        }
    }

    fn single(value: &str) -> TokenType {
        SingleQuoteString {
            value: value.to_string().into_boxed_str(),
        }
    }

    fn double(value: &str) -> TokenType {
        DoubleQuoteString {
            value: value.to_string().into_boxed_str(),
        }
    }

    fn int(value: &str) -> TokenType {
        Int {
            value: value.to_string().into_boxed_str(),
        }
    }

    fn float(value: &str) -> TokenType {
        Float {
            value: value.to_string().into_boxed_str(),
        }
    }

    fn function(value: &str) -> TokenType {
        Function {
            name: value.to_string().into_boxed_str(),
        }
    }

    fn error(msg: &str) -> TokenType {
        Error {
            msg: msg.to_string().into_boxed_str(),
        }
    }

    fn tokens(query: &str) -> Vec<Token> {
        tokenize(query).collect()
    }

    #[test]
    fn basic_shorthand_name() {
        assert_eq!(
            tokens("$.foo.bar"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(name("foo"), 2, 5),
                Token::new(name("bar"), 6, 9),
                Token::new(Eoq, 9, 9),
            ]
        )
    }

    #[test]
    fn bracketed_name() {
        assert_eq!(
            tokens("$['foo'][\"bar\"]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(single("foo"), 3, 6),
                Token::new(RBracket, 7, 8),
                Token::new(LBracket, 8, 9),
                Token::new(double("bar"), 10, 13),
                Token::new(RBracket, 14, 15),
                Token::new(Eoq, 15, 15),
            ]
        )
    }

    #[test]
    fn negative_index() {
        assert_eq!(
            tokens("$.foo[-1]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(name("foo"), 2, 5),
                Token::new(LBracket, 5, 6),
                Token::new(index("-1"), 6, 8),
                Token::new(RBracket, 8, 9),
                Token::new(Eoq, 9, 9),
            ]
        )
    }

    #[test]
    fn just_a_hyphen() {
        assert_eq!(
            tokens("$.foo[-]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(name("foo"), 2, 5),
                Token::new(LBracket, 5, 6),
                Token::new(error("expected a digit after '-', found ']'"), 6, 7),
            ]
        )
    }

    #[test]
    fn missing_root_selector() {
        assert_eq!(
            tokens("foo.bar"),
            vec![Token::new(error("expected '$', found 'f'"), 0, 1)]
        )
    }

    #[test]
    fn root_property_selector_without_dot() {
        assert_eq!(
            tokens("$foo"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(
                    error("expected '.', '..' or a bracketed selection, found 'f'"),
                    1,
                    2
                ),
            ]
        )
    }

    #[test]
    fn whitespace_between_segments() {
        assert_eq!(
            tokens("$.foo .bar"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(name("foo"), 2, 5),
                Token::new(name("bar"), 7, 10),
                Token::new(Eoq, 10, 10),
            ]
        )
    }

    #[test]
    fn whitespace_after_dot() {
        assert_eq!(
            tokens("$. foo"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(error("unexpected whitespace after dot"), 2, 3),
            ]
        )
    }

    #[test]
    fn trailing_whitespace() {
        assert_eq!(
            tokens("$.foo "),
            vec![
                Token::new(Root, 0, 1),
                Token::new(name("foo"), 2, 5),
                Token::new(error("unexpected trailing whitespace"), 6, 6),
            ]
        )
    }

    #[test]
    fn recurse_name_and_wild() {
        assert_eq!(
            tokens("$..foo..*"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(DoubleDot, 1, 3),
                Token::new(name("foo"), 3, 6),
                Token::new(DoubleDot, 6, 8),
                Token::new(Wild, 8, 9),
                Token::new(Eoq, 9, 9),
            ]
        )
    }

    #[test]
    fn erroneous_triple_dot() {
        assert_eq!(
            tokens("$...foo"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(DoubleDot, 1, 3),
                Token::new(error("unexpected descendant selection token '.'"), 3, 4),
            ]
        )
    }

    #[test]
    fn multiple_selectors() {
        assert_eq!(
            tokens("$.foo['bar', 123, *]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(name("foo"), 2, 5),
                Token::new(LBracket, 5, 6),
                Token::new(single("bar"), 7, 10),
                Token::new(Comma, 11, 12),
                Token::new(index("123"), 13, 16),
                Token::new(Comma, 16, 17),
                Token::new(Wild, 18, 19),
                Token::new(RBracket, 19, 20),
                Token::new(Eoq, 20, 20),
            ]
        )
    }

    #[test]
    fn slice() {
        assert_eq!(
            tokens("$[1:-3:2]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(index("1"), 2, 3),
                Token::new(Colon, 3, 4),
                Token::new(index("-3"), 4, 6),
                Token::new(Colon, 6, 7),
                Token::new(index("2"), 7, 8),
                Token::new(RBracket, 8, 9),
                Token::new(Eoq, 9, 9),
            ]
        )
    }

    #[test]
    fn filter_comparison() {
        assert_eq!(
            tokens("$[?@.bar == 'baz']"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(Filter, 2, 3),
                Token::new(Current, 3, 4),
                Token::new(name("bar"), 5, 8),
                Token::new(Eq, 9, 11),
                Token::new(single("baz"), 13, 16),
                Token::new(RBracket, 17, 18),
                Token::new(Eoq, 18, 18),
            ]
        )
    }

    #[test]
    fn two_filters() {
        assert_eq!(
            tokens("$[?@.a, ?@.b]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(Filter, 2, 3),
                Token::new(Current, 3, 4),
                Token::new(name("a"), 5, 6),
                Token::new(Comma, 6, 7),
                Token::new(Filter, 8, 9),
                Token::new(Current, 9, 10),
                Token::new(name("b"), 11, 12),
                Token::new(RBracket, 12, 13),
                Token::new(Eoq, 13, 13),
            ]
        )
    }

    #[test]
    fn function_with_two_args() {
        assert_eq!(
            tokens("$[?foo(@.a, -7)>2]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(Filter, 2, 3),
                Token::new(function("foo"), 3, 6),
                Token::new(Current, 7, 8),
                Token::new(name("a"), 9, 10),
                Token::new(Comma, 10, 11),
                Token::new(int("-7"), 12, 14),
                Token::new(RParen, 14, 15),
                Token::new(Gt, 15, 16),
                Token::new(int("2"), 16, 17),
                Token::new(RBracket, 17, 18),
                Token::new(Eoq, 18, 18),
            ]
        )
    }

    #[test]
    fn nested_filter_inside_function_call() {
        assert_eq!(
            tokens("$[?count(@[?@.a])>1]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(Filter, 2, 3),
                Token::new(function("count"), 3, 8),
                Token::new(Current, 9, 10),
                Token::new(LBracket, 10, 11),
                Token::new(Filter, 11, 12),
                Token::new(Current, 12, 13),
                Token::new(name("a"), 14, 15),
                Token::new(RBracket, 15, 16),
                Token::new(RParen, 16, 17),
                Token::new(Gt, 17, 18),
                Token::new(int("1"), 18, 19),
                Token::new(RBracket, 19, 20),
                Token::new(Eoq, 20, 20),
            ]
        )
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens("$[?@>1.5e-3||@<-0||@==2E2]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(Filter, 2, 3),
                Token::new(Current, 3, 4),
                Token::new(Gt, 4, 5),
                Token::new(float("1.5e-3"), 5, 11),
                Token::new(Or, 11, 13),
                Token::new(Current, 13, 14),
                Token::new(Lt, 14, 15),
                Token::new(int("-0"), 15, 17),
                Token::new(Or, 17, 19),
                Token::new(Current, 19, 20),
                Token::new(Eq, 20, 22),
                Token::new(int("2E2"), 22, 25),
                Token::new(RBracket, 25, 26),
                Token::new(Eoq, 26, 26),
            ]
        )
    }

    #[test]
    fn leading_zero_number() {
        let rv = lex("$[?@.a==01]");
        assert!(rv.is_err());
        assert_eq!(
            rv.unwrap_err().msg,
            "unexpected leading zero in number literal"
        );
    }

    #[test]
    fn current_key() {
        assert_eq!(
            tokens("$[?#>1]"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(Filter, 2, 3),
                Token::new(CurrentKey, 3, 4),
                Token::new(Gt, 4, 5),
                Token::new(int("1"), 5, 6),
                Token::new(RBracket, 6, 7),
                Token::new(Eoq, 7, 7),
            ]
        )
    }

    #[test]
    fn unclosed_bracket_points_at_open_bracket() {
        let err = lex("$.a[1, 2").unwrap_err();
        assert_eq!(err.msg, "unclosed bracketed selection");
        assert_eq!(err.span, (3, 4));
    }

    #[test]
    fn truncated_bracket() {
        let err = lex("$[").unwrap_err();
        assert_eq!(err.span, (1, 2));
    }

    #[test]
    fn unclosed_string() {
        let err = lex("$['foo").unwrap_err();
        assert_eq!(err.msg, "unclosed string starting at index 2");
        assert_eq!(err.span, (2, 6));
    }

    #[test]
    fn empty_string() {
        assert_eq!(
            tokens("$['']"),
            vec![
                Token::new(Root, 0, 1),
                Token::new(LBracket, 1, 2),
                Token::new(single(""), 3, 3),
                Token::new(RBracket, 4, 5),
                Token::new(Eoq, 5, 5),
            ]
        )
    }

    #[test]
    fn invalid_escapes() {
        assert!(lex("$['\\a']").is_err());
        assert!(lex("$['\\\"']").is_err());
        assert!(lex("$[\"\\'\"]").is_err());
        assert!(lex("$['\\u12G4']").is_err());
        assert!(lex("$['\\'']").is_ok());
        assert!(lex("$['\\u263a']").is_ok());
    }

    #[test]
    fn unbalanced_function_call() {
        let err = lex("$[?count(@.a]").unwrap_err();
        assert_eq!(err.msg, "unbalanced parentheses");
    }

    #[test]
    fn tokenize_is_restartable() {
        let query = "$..a[?@.b == \"c\"][1:2]";
        assert_eq!(tokens(query), tokens(query));
    }

    #[test]
    fn tokenize_is_lazy() {
        let mut lexer = tokenize("$.a.b");
        assert_eq!(lexer.next(), Some(Token::new(Root, 0, 1)));
        assert_eq!(lexer.next(), Some(Token::new(name("a"), 2, 3)));
    }
}
