use std::rc::Rc;

use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::{Parser, Position, Span};
use pest_derive::Parser;

use super::ast::*;
use crate::runner::ds::error::JErrorType;

#[derive(Parser)]
#[grammar = "parser/snippet_grammar.pest"] // relative to src
pub struct JsParser;

impl JsParser {
    /// Parses a snippet into its AST, reporting grammar failures as `SyntaxError`.
    pub fn parse_to_ast_from_str(script: &str) -> Result<ProgramData, JErrorType> {
        parse_to_ast(script).map_err(|e| JErrorType::SyntaxError(e.to_string()))
    }
}

type BuildResult<T> = Result<T, Error<Rule>>;

pub fn parse_to_ast(script: &str) -> BuildResult<ProgramData> {
    let mut pairs = JsParser::parse(Rule::script, script)?;
    let builder = AstBuilder {
        script: Rc::new(script.to_string()),
    };
    match pairs.next() {
        Some(pair) => builder.build_program(pair),
        None => Err(Error::new_from_pos(
            ErrorVariant::CustomError {
                message: "Empty parse tree".to_string(),
            },
            Position::from_start(script),
        )),
    }
}

fn get_unexpected_error(src: &'static str, pair: &Pair<Rule>) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: format!("Unexpected {:?} [{}]", pair.as_rule(), src),
        },
        pair.as_span(),
    )
}

fn expect_next<'i>(
    pairs: &mut Pairs<'i, Rule>,
    parent: &Span<'i>,
    what: &'static str,
) -> BuildResult<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| {
        Error::new_from_span(
            ErrorVariant::CustomError {
                message: format!("Expected {}", what),
            },
            parent.clone(),
        )
    })
}

fn unescape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn parse_number(raw: &str) -> NumberLiteralType {
    match raw.parse::<i64>() {
        Ok(i) => NumberLiteralType::IntegerLiteral(i),
        Err(_) => NumberLiteralType::FloatLiteral(raw.parse::<f64>().unwrap_or(f64::NAN)),
    }
}

struct AstBuilder {
    script: Rc<String>,
}

impl AstBuilder {
    fn meta(&self, span: &Span) -> Meta {
        self.meta_range(span.start(), span.end())
    }

    fn meta_range(&self, start_index: usize, end_index: usize) -> Meta {
        Meta {
            start_index,
            end_index,
            script: self.script.clone(),
        }
    }

    fn identifier(&self, pair: Pair<Rule>) -> IdentifierData {
        IdentifierData {
            name: pair.as_str().to_string(),
            meta: self.meta(&pair.as_span()),
        }
    }

    fn build_program(&self, pair: Pair<Rule>) -> BuildResult<ProgramData> {
        let meta = self.meta(&pair.as_span());
        let mut body = vec![];
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::statement => body.push(self.build_statement(child)?),
                Rule::EOI => { /* Do nothing */ }
                _ => return Err(get_unexpected_error("program", &child)),
            }
        }
        Ok(ProgramData { meta, body })
    }

    fn build_statement(&self, pair: Pair<Rule>) -> BuildResult<StatementType> {
        let span = pair.as_span();
        let inner = expect_next(&mut pair.into_inner(), &span, "statement")?;
        let meta = self.meta(&inner.as_span());
        match inner.as_rule() {
            Rule::function_declaration => Ok(StatementType::FunctionDeclaration(Rc::new(
                self.build_function(inner)?,
            ))),
            Rule::variable_declaration => self.build_variable_declaration(inner),
            Rule::return_statement => {
                let mut argument = None;
                for child in inner.into_inner() {
                    if child.as_rule() == Rule::expression {
                        argument = Some(self.build_expression(child)?);
                    }
                }
                Ok(StatementType::ReturnStatement { meta, argument })
            }
            Rule::if_statement => {
                let span = inner.as_span();
                let mut children = inner
                    .into_inner()
                    .filter(|p| !matches!(p.as_rule(), Rule::if_kw | Rule::else_kw));
                let test = self.build_expression(children.next().ok_or_else(|| {
                    Error::new_from_span(
                        ErrorVariant::CustomError {
                            message: "Expected if condition".to_string(),
                        },
                        span.clone(),
                    )
                })?)?;
                let consequent = match children.next() {
                    Some(p) => Box::new(self.build_statement(p)?),
                    None => {
                        return Err(Error::new_from_span(
                            ErrorVariant::CustomError {
                                message: "Expected if body".to_string(),
                            },
                            span,
                        ))
                    }
                };
                let alternate = match children.next() {
                    Some(p) => Some(Box::new(self.build_statement(p)?)),
                    None => None,
                };
                Ok(StatementType::IfStatement {
                    meta,
                    test,
                    consequent,
                    alternate,
                })
            }
            Rule::block_statement => Ok(StatementType::BlockStatement {
                meta,
                body: self.build_statement_list(inner)?,
            }),
            Rule::empty_statement => Ok(StatementType::EmptyStatement { meta }),
            Rule::expression_statement => {
                let span = inner.as_span();
                let expression =
                    self.build_expression(expect_next(&mut inner.into_inner(), &span, "expression")?)?;
                Ok(StatementType::ExpressionStatement { meta, expression })
            }
            _ => Err(get_unexpected_error("statement", &inner)),
        }
    }

    fn build_statement_list(&self, pair: Pair<Rule>) -> BuildResult<Vec<StatementType>> {
        pair.into_inner()
            .map(|p| self.build_statement(p))
            .collect::<BuildResult<Vec<StatementType>>>()
    }

    fn build_variable_declaration(&self, pair: Pair<Rule>) -> BuildResult<StatementType> {
        let meta = self.meta(&pair.as_span());
        let mut kind = VariableDeclarationKind::Var;
        let mut declarations = vec![];
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::declaration_kind => {
                    kind = match child.as_str() {
                        "let" => VariableDeclarationKind::Let,
                        "const" => VariableDeclarationKind::Const,
                        _ => VariableDeclarationKind::Var,
                    }
                }
                Rule::variable_declarator => {
                    let span = child.as_span();
                    let mut inner = child.into_inner();
                    let id = self.identifier(expect_next(&mut inner, &span, "identifier")?);
                    let init = match inner.next() {
                        Some(p) => Some(self.build_expression(p)?),
                        None => None,
                    };
                    declarations.push(VariableDeclaratorData {
                        meta: self.meta(&span),
                        id,
                        init,
                    });
                }
                _ => return Err(get_unexpected_error("variable declaration", &child)),
            }
        }
        if kind == VariableDeclarationKind::Const {
            if let Some(d) = declarations.iter().find(|d| d.init.is_none()) {
                return Err(Error::new_from_pos(
                    ErrorVariant::CustomError {
                        message: "Missing initializer in const declaration".to_string(),
                    },
                    Position::new(self.script.as_str(), d.meta.end_index)
                        .unwrap_or_else(|| Position::from_start(self.script.as_str())),
                ));
            }
        }
        Ok(StatementType::VariableDeclaration(VariableDeclarationData {
            meta,
            kind,
            declarations,
        }))
    }

    /// Handles function declarations, function expressions and object
    /// literal methods.
    fn build_function_parts(&self, meta: Meta, children: Pairs<Rule>) -> BuildResult<FunctionData> {
        let mut id = None;
        let mut params = vec![];
        let mut body = None;
        for child in children {
            match child.as_rule() {
                Rule::function_kw | Rule::property_key => { /* Do nothing */ }
                Rule::identifier => id = Some(self.identifier(child)),
                Rule::formal_parameters => {
                    params = child.into_inner().map(|p| self.identifier(p)).collect();
                }
                Rule::function_body => {
                    let body_meta = self.meta(&child.as_span());
                    body = Some(Rc::new(FunctionBodyData {
                        meta: body_meta,
                        body: self.build_statement_list(child)?,
                    }));
                }
                _ => return Err(get_unexpected_error("function", &child)),
            }
        }
        match body {
            Some(body) => Ok(FunctionData {
                meta,
                id,
                params,
                body,
            }),
            None => Err(Error::new_from_pos(
                ErrorVariant::CustomError {
                    message: "Expected function body".to_string(),
                },
                Position::new(self.script.as_str(), meta.end_index)
                    .unwrap_or_else(|| Position::from_start(self.script.as_str())),
            )),
        }
    }

    fn build_function(&self, pair: Pair<Rule>) -> BuildResult<FunctionData> {
        let meta = self.meta(&pair.as_span());
        self.build_function_parts(meta, pair.into_inner())
    }

    fn build_expression(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::expression | Rule::parenthesized_expression => {
                self.build_expression(expect_next(&mut pair.into_inner(), &span, "expression")?)
            }
            Rule::assignment_expression => self.build_assignment_expression(pair),
            Rule::logical_or_expression
            | Rule::logical_and_expression
            | Rule::equality_expression
            | Rule::relational_expression
            | Rule::additive_expression
            | Rule::multiplicative_expression => self.build_binary_chain(pair),
            Rule::unary_expression => self.build_unary_expression(pair),
            Rule::postfix_expression => self.build_postfix_expression(pair),
            Rule::primary_expression => {
                self.build_primary_expression(expect_next(&mut pair.into_inner(), &span, "primary")?)
            }
            _ => Err(get_unexpected_error("expression", &pair)),
        }
    }

    fn build_assignment_expression(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let first = expect_next(&mut inner, &span, "expression")?;
        if first.as_rule() != Rule::postfix_expression {
            return self.build_expression(first);
        }
        let target_pair = first.clone();
        let left = self.build_expression(first)?;
        match left {
            ExpressionType::Identifier(_) | ExpressionType::MemberExpression(_) => {}
            _ => {
                return Err(Error::new_from_span(
                    ErrorVariant::CustomError {
                        message: "Invalid left-hand side in assignment".to_string(),
                    },
                    target_pair.as_span(),
                ))
            }
        }
        let _assign_op = expect_next(&mut inner, &span, "=")?;
        let right = self.build_expression(expect_next(&mut inner, &span, "expression")?)?;
        Ok(ExpressionType::AssignmentExpression {
            meta: self.meta(&span),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn build_binary_chain(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let span = pair.as_span();
        let start = span.start();
        let mut inner = pair.into_inner();
        let mut left = self.build_expression(expect_next(&mut inner, &span, "operand")?)?;
        while let Some(op_pair) = inner.next() {
            let right_pair = expect_next(&mut inner, &span, "operand")?;
            let meta = self.meta_range(start, right_pair.as_span().end());
            let right = Box::new(self.build_expression(right_pair)?);
            let l = Box::new(left);
            left = match op_pair.as_rule() {
                Rule::or_op => ExpressionType::LogicalExpression {
                    meta,
                    operator: LogicalOperator::Or,
                    left: l,
                    right,
                },
                Rule::and_op => ExpressionType::LogicalExpression {
                    meta,
                    operator: LogicalOperator::And,
                    left: l,
                    right,
                },
                _ => {
                    let operator = match op_pair.as_str() {
                        "===" => BinaryOperator::StrictlyEqual,
                        "!==" => BinaryOperator::StrictlyUnequal,
                        "<" => BinaryOperator::LessThan,
                        ">" => BinaryOperator::GreaterThan,
                        "<=" => BinaryOperator::LessThanEqual,
                        ">=" => BinaryOperator::GreaterThanEqual,
                        "+" => BinaryOperator::Add,
                        "-" => BinaryOperator::Subtract,
                        "*" => BinaryOperator::Multiply,
                        "/" => BinaryOperator::Divide,
                        "%" => BinaryOperator::Modulo,
                        _ => return Err(get_unexpected_error("binary operator", &op_pair)),
                    };
                    ExpressionType::BinaryExpression {
                        meta,
                        operator,
                        left: l,
                        right,
                    }
                }
            };
        }
        Ok(left)
    }

    fn build_unary_expression(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let end = pair.as_span().end();
        let mut operators = vec![];
        let mut operand = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::unary_op => {
                    let operator = match child.as_str() {
                        "!" => UnaryOperator::LogicalNot,
                        "-" => UnaryOperator::Minus,
                        _ => UnaryOperator::TypeOf,
                    };
                    operators.push((child.as_span().start(), operator));
                }
                _ => operand = Some(self.build_expression(child)?),
            }
        }
        let mut expr = match operand {
            Some(e) => e,
            None => {
                return Err(Error::new_from_pos(
                    ErrorVariant::CustomError {
                        message: "Expected operand".to_string(),
                    },
                    Position::new(self.script.as_str(), end)
                        .unwrap_or_else(|| Position::from_start(self.script.as_str())),
                ))
            }
        };
        for (start, operator) in operators.into_iter().rev() {
            expr = ExpressionType::UnaryExpression {
                meta: self.meta_range(start, end),
                operator,
                argument: Box::new(expr),
            };
        }
        Ok(expr)
    }

    fn build_postfix_expression(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let span = pair.as_span();
        let start = span.start();
        let mut inner = pair.into_inner();
        let mut expr = self.build_expression(expect_next(&mut inner, &span, "expression")?)?;
        for suffix in inner {
            let meta = self.meta_range(start, suffix.as_span().end());
            let suffix_span = suffix.as_span();
            expr = match suffix.as_rule() {
                Rule::member_suffix => {
                    let property =
                        self.identifier(expect_next(&mut suffix.into_inner(), &suffix_span, "property")?);
                    ExpressionType::MemberExpression(MemberExpressionType::SimpleMemberExpression {
                        meta,
                        object: Box::new(expr),
                        property,
                    })
                }
                Rule::computed_suffix => {
                    let property = self.build_expression(expect_next(
                        &mut suffix.into_inner(),
                        &suffix_span,
                        "property",
                    )?)?;
                    ExpressionType::MemberExpression(
                        MemberExpressionType::ComputedMemberExpression {
                            meta,
                            object: Box::new(expr),
                            property: Box::new(property),
                        },
                    )
                }
                Rule::call_suffix => {
                    let arguments = suffix
                        .into_inner()
                        .map(|p| self.build_expression(p))
                        .collect::<BuildResult<Vec<ExpressionType>>>()?;
                    ExpressionType::CallExpression {
                        meta,
                        callee: Box::new(expr),
                        arguments,
                    }
                }
                _ => return Err(get_unexpected_error("postfix", &suffix)),
            };
        }
        Ok(expr)
    }

    fn build_primary_expression(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let meta = self.meta(&pair.as_span());
        match pair.as_rule() {
            Rule::function_expression => Ok(ExpressionType::FunctionExpression(Rc::new(
                self.build_function(pair)?,
            ))),
            Rule::this_kw => Ok(ExpressionType::ThisExpression { meta }),
            Rule::literal => self.build_literal(pair),
            Rule::identifier => Ok(ExpressionType::Identifier(self.identifier(pair))),
            Rule::object_literal => {
                let properties = pair
                    .into_inner()
                    .map(|p| self.build_property(p))
                    .collect::<BuildResult<Vec<PropertyData>>>()?;
                Ok(ExpressionType::ObjectExpression { meta, properties })
            }
            Rule::array_literal => {
                let elements = pair
                    .into_inner()
                    .map(|p| self.build_expression(p))
                    .collect::<BuildResult<Vec<ExpressionType>>>()?;
                Ok(ExpressionType::ArrayExpression { meta, elements })
            }
            Rule::parenthesized_expression => self.build_expression(pair),
            _ => Err(get_unexpected_error("primary", &pair)),
        }
    }

    fn build_literal(&self, pair: Pair<Rule>) -> BuildResult<ExpressionType> {
        let span = pair.as_span();
        let meta = self.meta(&span);
        let inner = expect_next(&mut pair.into_inner(), &span, "literal")?;
        let value = match inner.as_rule() {
            Rule::null_literal => LiteralType::NullLiteral,
            Rule::boolean_literal => LiteralType::BooleanLiteral(inner.as_str() == "true"),
            Rule::numeric_literal => LiteralType::NumberLiteral(parse_number(inner.as_str())),
            Rule::string_literal => LiteralType::StringLiteral(self.string_value(inner)?),
            _ => return Err(get_unexpected_error("literal", &inner)),
        };
        Ok(ExpressionType::Literal(LiteralData { meta, value }))
    }

    fn string_value(&self, pair: Pair<Rule>) -> BuildResult<String> {
        let span = pair.as_span();
        let chars = expect_next(&mut pair.into_inner(), &span, "string body")?;
        Ok(unescape_string(chars.as_str()))
    }

    fn property_key(&self, pair: Pair<Rule>) -> BuildResult<String> {
        let span = pair.as_span();
        let inner = expect_next(&mut pair.into_inner(), &span, "property key")?;
        match inner.as_rule() {
            Rule::identifier_name => Ok(inner.as_str().to_string()),
            Rule::string_literal => self.string_value(inner),
            Rule::numeric_literal => Ok(match parse_number(inner.as_str()) {
                NumberLiteralType::IntegerLiteral(i) => i.to_string(),
                NumberLiteralType::FloatLiteral(f) => f.to_string(),
            }),
            _ => Err(get_unexpected_error("property key", &inner)),
        }
    }

    fn build_property(&self, pair: Pair<Rule>) -> BuildResult<PropertyData> {
        let span = pair.as_span();
        let inner = expect_next(&mut pair.into_inner(), &span, "property")?;
        let meta = self.meta(&inner.as_span());
        let inner_span = inner.as_span();
        match inner.as_rule() {
            Rule::value_property => {
                let mut children = inner.into_inner();
                let key_pair = expect_next(&mut children, &inner_span, "property key")?;
                let key = self.property_key(key_pair)?;
                let value = self.build_expression(expect_next(&mut children, &inner_span, "value")?)?;
                Ok(PropertyData { meta, key, value })
            }
            Rule::method_property => {
                let key_pair = expect_next(&mut inner.clone().into_inner(), &inner_span, "property key")?;
                let key = self.property_key(key_pair)?;
                // Named from the key at evaluation, like `key: function () {}`.
                let function = self.build_function_parts(meta.clone(), inner.into_inner())?;
                Ok(PropertyData {
                    meta,
                    key,
                    value: ExpressionType::FunctionExpression(Rc::new(function)),
                })
            }
            _ => Err(get_unexpected_error("property", &inner)),
        }
    }
}
