use jsonpath_query::Query;

mod errors {
    use super::*;

    #[test]
    #[should_panic(expected = "unknown function `nosuchthing`")]
    fn unknown_function() {
        Query::standard("$[?nosuchthing()]").unwrap();
    }

    #[test]
    #[should_panic(expected = "count() takes 1 argument but 0 were given")]
    fn not_enough_arguments() {
        Query::standard("$[?count()]").unwrap();
    }

    #[test]
    #[should_panic(expected = "count() takes 1 argument but 2 were given")]
    fn too_many_arguments() {
        Query::standard("$[?count(@.foo, $.bar)]").unwrap();
    }

    #[test]
    #[should_panic(expected = "unbalanced parentheses")]
    fn unbalanced_parens() {
        Query::standard("$[?((@.foo)]").unwrap();
    }

    #[test]
    #[should_panic(expected = "expected a filter expression")]
    fn empty_parens() {
        Query::standard("$[?()]").unwrap();
    }

    #[test]
    #[should_panic(expected = "expected a filter expression")]
    fn empty_filter() {
        Query::standard("$[?]").unwrap();
    }

    #[test]
    #[should_panic(expected = "unclosed bracketed selection")]
    fn unclosed_bracketed_selection() {
        Query::standard("$[1, 3").unwrap();
    }

    #[test]
    #[should_panic(expected = "unclosed bracketed selection")]
    fn unclosed_bracketed_selection_inside_filter() {
        Query::standard("$[?@.a < 1").unwrap();
    }

    #[test]
    #[should_panic(expected = "filter expression literals must be compared")]
    fn filter_just_true() {
        Query::standard("$[?true]").unwrap();
    }

    #[test]
    #[should_panic(expected = "filter expression literals must be compared")]
    fn filter_just_string() {
        Query::standard("$[?'foo']").unwrap();
    }

    #[test]
    #[should_panic(expected = "filter expression literals must be compared")]
    fn filter_comparison_and_literal() {
        Query::standard("$[?true == false && false]").unwrap();
    }

    #[test]
    #[should_panic(expected = "result of length() must be compared")]
    fn uncompared_value_function() {
        Query::standard("$[?length(@.a)]").unwrap();
    }

    #[test]
    #[should_panic(expected = "non-singular query is not comparable")]
    fn non_singular_comparison() {
        Query::standard("$[?@..a == 1]").unwrap();
    }

    #[test]
    #[should_panic(expected = "unexpected trailing whitespace")]
    fn trailing_whitespace() {
        Query::standard("$.a ").unwrap();
    }

    #[test]
    #[should_panic(expected = "expected '$'")]
    fn missing_root() {
        Query::standard(".a").unwrap();
    }

    #[test]
    #[should_panic(expected = "unexpected trailing comma")]
    fn trailing_comma() {
        Query::standard("$['a',]").unwrap();
    }

    #[test]
    #[should_panic(expected = "bald descendant segment")]
    fn bald_descendant_segment() {
        Query::standard("$..").unwrap();
    }

    #[test]
    fn error_display() {
        let err = Query::standard("$[?nosuchthing()]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "type error: unknown function `nosuchthing` (3..14)"
        );

        let err = Query::standard("$[1, 3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error: unclosed bracketed selection (1..2)"
        );
    }
}
