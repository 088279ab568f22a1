use jsonpath_query::{
    Environment, ExpressionType, FilterResult, FunctionExtension, FunctionSignature, JSONPathError,
};
use lazy_static::lazy_static;
use serde_json::Value;

/// A function extension that only declares a signature.
struct Stub(FunctionSignature);

impl FunctionExtension<Value> for Stub {
    fn call<'v>(&self, _args: Vec<FilterResult<'v, Value>>) -> FilterResult<'v, Value> {
        FilterResult::Nothing
    }

    fn sig(&self) -> FunctionSignature {
        self.0.clone()
    }
}

fn stub(params: Vec<ExpressionType>, ret: ExpressionType) -> Stub {
    Stub(FunctionSignature::new(params, ret))
}

lazy_static! {
    static ref ENV: Environment = Environment::builder()
        .function("foo", stub(vec![ExpressionType::Nodes], ExpressionType::Nodes))
        .function("bar", stub(vec![ExpressionType::Value], ExpressionType::Logical))
        .function("bn", stub(vec![ExpressionType::Nodes], ExpressionType::Logical))
        .function("bl", stub(vec![ExpressionType::Logical], ExpressionType::Logical))
        .build();
}

macro_rules! assert_valid {
    ($($name:ident: $value:expr,)*) => {
    $(
        #[allow(non_snake_case)]
        #[test]
        fn $name() -> Result<(), JSONPathError> {
            let input = $value;
            ENV.compile(input)?;
            Ok(())
        }
    )*
    }
}

macro_rules! assert_invalid {
    ($($name:ident: $value:expr,)*) => {
    $(
        #[allow(non_snake_case)]
        #[test]
        #[should_panic]
        fn $name() {
            let input = $value;
            ENV.compile(input).unwrap();
        }
    )*
    }
}

mod well_typed {
    use super::*;

    assert_valid! {
        length_singular_query_compared: "$[?length(@) < 3]",
        count_non_singular_query_compared: "$[?count(@.*) == 1]",
        nested_function_nodestype_to_nodestype: "$[?count(foo(@.*)) == 1]",
        match_singular_query_and_string_literal: "$[?match(@.timezone, 'Europe/.*')]",
        value_non_singular_query_param_comparison: "$[?value(@..color) == 'red']",
        function_singular_query_valuetype_to_logicaltype: "$[?bar(@.a)]",
        function_non_singular_query_nodestype_to_logicaltype: "$[?bn(@.*)]",
        function_non_singular_query_logicaltype_to_logicaltype: "$[?bl(@.*)]",
        function_logicaltype_comparison_param: "$[?bl(1==1)]",
        function_logicaltype_function_param: "$[?bl(bn(@.*))]",
        function_valuetype_literal_param: "$[?bar(1)]",
        nodes_function_as_test_expression: "$[?foo(@.*)]",
        negated_logical_function: "$[?!match(@.a, 'b')]",
        comparison_of_two_functions: "$[?length(@.a) == count(@.*)]",
        current_key_comparison: "$[?# == 'a']",
        current_key_function_argument: "$[?match(#, 'a.*')]",
        grouped_test_expression: "$[?(@.a)]",
        function_grouped_logicaltype_param: "$[?bl((@.a == 1))]",
    }

    assert_invalid! {
        length_non_singular_query_compared: "$[?length(@.*) < 3]",
        count_int_literal_compared: "$[?count(1) == 1]",
        match_singular_query_and_string_literal_compared: "$[?match(@.timezone, 'Europe/.*') == true]",
        value_non_singular_query_param: "$[?value(@..color)]",
        function_non_singular_query_valuetype_to_logicaltype: "$[?bar(@.*)]",
        function_logicaltype_literal_param: "$[?bl(1)]",
        nodes_function_compared: "$[?foo(@.*) == 1]",
        nodes_function_as_value_param: "$[?length(foo(@.*)) == 1]",
        logical_function_as_nodes_param: "$[?count(bl(@.a)) == 1]",
        literal_operand_of_not: "$[?!1]",
        current_key_test_expression: "$[?#]",
        chained_comparison: "$[?@.a == 1 == true]",
        grouped_singular_query_compared: "$[?(@.a) == 1]",
        grouped_literal_compared: "$[?(1) == 1]",
        grouped_function_compared: "$[?(length(@.a)) == 1]",
        function_grouped_valuetype_param: "$[?length((@.a)) == 1]",
        function_grouped_nodestype_param: "$[?bn((@.*))]",
    }
}
