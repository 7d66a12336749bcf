use super::api::{parse_to_ast, JsParser, Rule};
use super::ast::*;

use pest::consumes_to;
use pest::parses_to;
use pest::Parser;

#[test]
fn test_integer_literal() {
    parses_to! {
        parser: JsParser,
        input: "10",
        rule: Rule::numeric_literal,
        tokens: [
            numeric_literal(0, 2)
        ]
    };
}

#[test]
fn test_single_quoted_string_with_escape() {
    parses_to! {
        parser: JsParser,
        input: r"'it\'s'",
        rule: Rule::string_literal,
        tokens: [
            string_literal(0, 7, [
                single_string_chars(1, 6)
            ])
        ]
    };
}

#[test]
fn test_member_suffix_accepts_keywords() {
    parses_to! {
        parser: JsParser,
        input: "a.this",
        rule: Rule::postfix_expression,
        tokens: [
            postfix_expression(0, 6, [
                primary_expression(0, 1, [
                    identifier(0, 1)
                ]),
                member_suffix(1, 6, [
                    identifier_name(2, 6)
                ])
            ])
        ]
    };
}

#[test]
fn test_keywords_are_not_identifiers() {
    assert!(JsParser::parse(Rule::identifier, "this").is_err());
    assert!(JsParser::parse(Rule::identifier, "function").is_err());
    assert!(JsParser::parse(Rule::identifier, "thisArg").is_ok());
    assert!(JsParser::parse(Rule::identifier, "letter").is_ok());
}

fn parse_single_expression(code: &str) -> ExpressionType {
    let program = parse_to_ast(code).unwrap();
    assert_eq!(program.body.len(), 1);
    match program.body.into_iter().next().unwrap() {
        StatementType::ExpressionStatement { expression, .. } => expression,
        s => panic!("Expected expression statement, got {:?}", s),
    }
}

#[test]
fn test_call_on_member_of_call() {
    let expr = parse_single_expression("printFullName.bind(name, 'Surendranagar')('Maharastra');");
    match expr {
        ExpressionType::CallExpression {
            callee, arguments, ..
        } => {
            assert_eq!(arguments.len(), 1);
            match *callee {
                ExpressionType::CallExpression {
                    callee: inner_callee,
                    arguments: inner_args,
                    ..
                } => {
                    assert_eq!(inner_args.len(), 2);
                    assert_eq!(
                        inner_callee.get_meta().to_formatted_code(),
                        "printFullName.bind"
                    );
                }
                e => panic!("Expected inner call, got {:?}", e),
            }
        }
        e => panic!("Expected call, got {:?}", e),
    }
}

#[test]
fn test_additive_chain_is_left_associative() {
    let expr = parse_single_expression("1 + 2 - 3;");
    match expr {
        ExpressionType::BinaryExpression {
            operator, left, ..
        } => {
            assert_eq!(operator, BinaryOperator::Subtract);
            assert!(matches!(
                *left,
                ExpressionType::BinaryExpression {
                    operator: BinaryOperator::Add,
                    ..
                }
            ));
        }
        e => panic!("Expected binary expression, got {:?}", e),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expr = parse_single_expression("1 + 2 * 3;");
    match expr {
        ExpressionType::BinaryExpression {
            operator, right, ..
        } => {
            assert_eq!(operator, BinaryOperator::Add);
            assert!(matches!(
                *right,
                ExpressionType::BinaryExpression {
                    operator: BinaryOperator::Multiply,
                    ..
                }
            ));
        }
        e => panic!("Expected binary expression, got {:?}", e),
    }
}

#[test]
fn test_object_literal_with_method_and_string_key() {
    let program = parse_to_ast(
        r#"var name = { firstName: "Kishan", "last name": 'Patel', greet(x) { return x; }, };"#,
    )
    .unwrap();
    match &program.body[0] {
        StatementType::VariableDeclaration(d) => {
            assert_eq!(d.kind, VariableDeclarationKind::Var);
            match &d.declarations[0].init {
                Some(ExpressionType::ObjectExpression { properties, .. }) => {
                    let keys: Vec<&str> = properties.iter().map(|p| p.key.as_str()).collect();
                    assert_eq!(keys, vec!["firstName", "last name", "greet"]);
                    match &properties[2].value {
                        ExpressionType::FunctionExpression(f) => {
                            assert!(f.id.is_none());
                            assert_eq!(f.params.len(), 1);
                        }
                        e => panic!("Expected method, got {:?}", e),
                    }
                }
                e => panic!("Expected object literal, got {:?}", e),
            }
        }
        s => panic!("Expected declaration, got {:?}", s),
    }
}

#[test]
fn test_function_declaration_with_comments() {
    let program = parse_to_ast(
        "// prints a greeting\nfunction greet(city, state) { /* body */ return this.name + city; }",
    )
    .unwrap();
    match &program.body[0] {
        StatementType::FunctionDeclaration(f) => {
            assert_eq!(f.id.as_ref().unwrap().name, "greet");
            let params: Vec<&str> = f.params.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(params, vec!["city", "state"]);
            assert_eq!(f.body.body.len(), 1);
        }
        s => panic!("Expected function declaration, got {:?}", s),
    }
}

#[test]
fn test_if_else() {
    let program = parse_to_ast("if (a === 1) { b = 2; } else b = 3;").unwrap();
    match &program.body[0] {
        StatementType::IfStatement { alternate, .. } => assert!(alternate.is_some()),
        s => panic!("Expected if statement, got {:?}", s),
    }
}

#[test]
fn test_typeof_and_not_stack() {
    let expr = parse_single_expression("!typeof x;");
    match expr {
        ExpressionType::UnaryExpression {
            operator, argument, ..
        } => {
            assert_eq!(operator, UnaryOperator::LogicalNot);
            assert!(matches!(
                *argument,
                ExpressionType::UnaryExpression {
                    operator: UnaryOperator::TypeOf,
                    ..
                }
            ));
        }
        e => panic!("Expected unary expression, got {:?}", e),
    }
}

#[test]
fn test_invalid_assignment_target() {
    assert!(parse_to_ast("1 = 2;").is_err());
}

#[test]
fn test_const_requires_initializer() {
    assert!(parse_to_ast("const a;").is_err());
    assert!(parse_to_ast("let a;").is_ok());
}

#[test]
fn test_missing_semicolon_is_rejected() {
    assert!(parse_to_ast("var a = 1").is_err());
}
