use crate::errors::{JSONPathError, Span};

/// Replace escape sequences in a string literal taken from a query.
///
/// `quote` is the literal's delimiter, which is the only quote character
/// that may be escaped. `span` is the literal's span, used for error reporting.
pub fn unescape(value: &str, quote: char, span: Span) -> Result<String, JSONPathError> {
    let chars: Vec<char> = value.chars().collect();
    let length = chars.len();
    let mut rv = String::with_capacity(value.len());
    let mut index: usize = 0;

    while index < length {
        match chars[index] {
            '\\' => {
                index += 1;
                match chars.get(index) {
                    Some('\\') => rv.push('\\'),
                    Some('/') => rv.push('/'),
                    Some('b') => rv.push('\x08'),
                    Some('f') => rv.push('\x0C'),
                    Some('n') => rv.push('\n'),
                    Some('r') => rv.push('\r'),
                    Some('t') => rv.push('\t'),
                    Some('u') => {
                        let (ch, next) = decode_hex_char(&chars, index, span)?;
                        rv.push(ch);
                        index = next;
                    }
                    Some(ch) if *ch == quote => rv.push(quote),
                    _ => {
                        return Err(JSONPathError::syntax(
                            String::from("invalid escape sequence"),
                            span,
                        ))
                    }
                }
            }
            ch if (ch as u32) <= 0x1F => {
                return Err(JSONPathError::syntax(
                    format!("invalid character {:?} in string literal", ch),
                    span,
                ));
            }
            ch => rv.push(ch),
        }

        index += 1;
    }

    Ok(rv)
}

/// Decode a `\uXXXX` escape, or a surrogate pair of them, starting at the
/// `u` found at `index`. Returns the decoded char and the index of its last
/// hex digit.
fn decode_hex_char(chars: &[char], index: usize, span: Span) -> Result<(char, usize), JSONPathError> {
    let mut code_point = parse_hex_digits(chars, index + 1, span)?;

    if is_low_surrogate(code_point) {
        return Err(JSONPathError::syntax(
            String::from("unexpected low surrogate code point"),
            span,
        ));
    }

    let mut end = index + 4;

    if is_high_surrogate(code_point) {
        if !(chars.get(index + 5) == Some(&'\\') && chars.get(index + 6) == Some(&'u')) {
            return Err(JSONPathError::syntax(
                String::from("incomplete surrogate pair"),
                span,
            ));
        }

        let low_surrogate = parse_hex_digits(chars, index + 7, span)?;

        if !is_low_surrogate(low_surrogate) {
            return Err(JSONPathError::syntax(
                String::from("unexpected code point in surrogate pair"),
                span,
            ));
        }

        code_point = 0x10000 + (((code_point & 0x03FF) << 10) | (low_surrogate & 0x03FF));
        end = index + 10;
    }

    char::from_u32(code_point)
        .map(|ch| (ch, end))
        .ok_or_else(|| JSONPathError::syntax(String::from("invalid \\uXXXX escape"), span))
}

fn parse_hex_digits(chars: &[char], start: usize, span: Span) -> Result<u32, JSONPathError> {
    let digits: String = chars.get(start..start + 4).unwrap_or_default().iter().collect();

    if digits.len() != 4 {
        return Err(JSONPathError::syntax(
            String::from("incomplete escape sequence"),
            span,
        ));
    }

    u32::from_str_radix(&digits, 16)
        .map_err(|_| JSONPathError::syntax(String::from("invalid \\uXXXX escape"), span))
}

fn is_high_surrogate(code_point: u32) -> bool {
    (0xD800..=0xDBFF).contains(&code_point)
}

fn is_low_surrogate(code_point: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&code_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_escapes() {
        assert_eq!(
            unescape("a\\b\\f\\n\\r\\t\\/\\\\", '"', (0, 0)).unwrap(),
            "a\x08\x0C\n\r\t/\\"
        );
    }

    #[test]
    fn escaped_quotes() {
        assert_eq!(unescape("\\'", '\'', (0, 0)).unwrap(), "'");
        assert_eq!(unescape("\\\"", '"', (0, 0)).unwrap(), "\"");
        assert!(unescape("\\\"", '\'', (0, 0)).is_err());
    }

    #[test]
    fn code_points() {
        assert_eq!(unescape("\\u263A", '"', (0, 0)).unwrap(), "☺");
        assert_eq!(unescape("\\u0013", '"', (0, 0)).unwrap(), "\u{13}");
    }

    #[test]
    fn surrogate_pair() {
        assert_eq!(unescape("\\uD834\\uDD1Ex", '"', (0, 0)).unwrap(), "𝄞x");
    }

    #[test]
    fn lone_surrogates() {
        assert!(unescape("\\uD834", '"', (0, 0)).is_err());
        assert!(unescape("\\uDD1E", '"', (0, 0)).is_err());
        assert!(unescape("\\uD834\\u0041", '"', (0, 0)).is_err());
    }

    #[test]
    fn raw_control_character() {
        let err = unescape("a\nb", '"', (3, 7)).unwrap_err();
        assert_eq!(err.span, (3, 7));
    }
}
