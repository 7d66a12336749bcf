//! Parser tests over whole snippets.

extern crate ctxbind;

use ctxbind::parser::ast::{
    ExpressionType, HasMeta, MemberExpressionType, StatementType, VariableDeclarationKind,
};
use ctxbind::parser::JsParser;
use ctxbind::runner::ds::error::JErrorType;

#[test]
fn test_demo_script_parses() {
    let source = include_str!("../demos/context_binding.js");
    let program = JsParser::parse_to_ast_from_str(source).unwrap();
    assert_eq!(program.body.len(), 11);
}

#[test]
fn test_call_expression_on_member() {
    let program = JsParser::parse_to_ast_from_str("printFullName.call(name, 'a', 'b');").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::CallExpression { callee, arguments, .. },
            ..
        } => {
            assert_eq!(arguments.len(), 3);
            match callee.as_ref() {
                ExpressionType::MemberExpression(MemberExpressionType::SimpleMemberExpression {
                    property,
                    ..
                }) => assert_eq!(property.name, "call"),
                e => panic!("Expected member callee, got {:?}", e),
            }
        }
        s => panic!("Expected call statement, got {:?}", s),
    }
}

#[test]
fn test_declaration_kinds() {
    let program = JsParser::parse_to_ast_from_str("var a; let b = 1, c = 2; const d = 3;").unwrap();
    let kinds: Vec<VariableDeclarationKind> = program
        .body
        .iter()
        .map(|s| match s {
            StatementType::VariableDeclaration(d) => d.kind,
            s => panic!("Expected declaration, got {:?}", s),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            VariableDeclarationKind::Var,
            VariableDeclarationKind::Let,
            VariableDeclarationKind::Const
        ]
    );
}

#[test]
fn test_meta_keeps_source_text() {
    let source = "var f = function (x) { return x; };";
    let program = JsParser::parse_to_ast_from_str(source).unwrap();
    match &program.body[0] {
        StatementType::VariableDeclaration(d) => {
            let init = d.declarations[0].init.as_ref().unwrap();
            assert_eq!(init.get_meta().to_formatted_code(), "function (x) { return x; }");
        }
        s => panic!("Expected declaration, got {:?}", s),
    }
}

#[test]
fn test_unterminated_string_is_syntax_error() {
    let err = JsParser::parse_to_ast_from_str("var s = 'oops;").unwrap_err();
    assert!(matches!(err, JErrorType::SyntaxError(_)));
}

#[test]
fn test_keyword_cannot_be_binding_name() {
    assert!(JsParser::parse_to_ast_from_str("var this = 1;").is_err());
    assert!(JsParser::parse_to_ast_from_str("function return() {}").is_err());
}
