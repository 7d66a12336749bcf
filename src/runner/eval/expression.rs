//! Expression evaluation.
//!
//! This module provides the core expression evaluation logic for the interpreter.
//! It handles all expression types defined in the AST.

use std::rc::Rc;

use crate::parser::ast::{
    BinaryOperator, ExpressionType, FunctionData, HasMeta, LiteralData, LiteralType,
    LogicalOperator, MemberExpressionType, NumberLiteralType, UnaryOperator,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::new_script_function;
use crate::runner::ds::lex_env::{
    new_declarative_environment, resolve_binding, resolve_this_binding, set_identifier_value,
};
use crate::runner::ds::object::{new_array_object, new_ordinary_object, JsObjectType, ObjectType};
use crate::runner::ds::operations::type_conversion::{
    canonical_index, to_boolean, to_number, to_property_key, to_string, type_of,
};
use crate::runner::ds::value::{JsNumberType, JsValue};
use crate::runner::plugin::types::EvalContext;

use super::function::call_function;
use super::types::ValueResult;

/// Evaluate an expression and return its value.
pub fn evaluate_expression(expr: &ExpressionType, ctx: &mut EvalContext) -> ValueResult {
    match expr {
        ExpressionType::Literal(lit) => Ok(evaluate_literal(lit)),

        ExpressionType::Identifier(id) => ctx.get_binding(&id.name),

        ExpressionType::ThisExpression { .. } => Ok(resolve_this_binding(&ctx.current_env)),

        ExpressionType::ArrayExpression { elements, .. } => {
            let mut values = Vec::with_capacity(elements.len());
            for e in elements {
                values.push(evaluate_expression(e, ctx)?);
            }
            Ok(JsValue::Object(new_array_object(values)))
        }

        ExpressionType::ObjectExpression { properties, .. } => {
            let obj = new_ordinary_object();
            for p in properties {
                let value = evaluate_named_expression(&p.value, &p.key, ctx)?;
                obj.borrow_mut().set(&p.key, value)?;
            }
            Ok(JsValue::Object(obj))
        }

        ExpressionType::FunctionExpression(data) => Ok(instantiate_function_expression(data, ctx)),

        ExpressionType::UnaryExpression {
            operator, argument, ..
        } => evaluate_unary_expression(*operator, argument, ctx),

        ExpressionType::BinaryExpression {
            operator,
            left,
            right,
            ..
        } => {
            let left_val = evaluate_expression(left, ctx)?;
            let right_val = evaluate_expression(right, ctx)?;
            Ok(evaluate_binary_operator(*operator, &left_val, &right_val))
        }

        ExpressionType::LogicalExpression {
            operator,
            left,
            right,
            ..
        } => {
            let left_val = evaluate_expression(left, ctx)?;
            let short_circuit = match operator {
                LogicalOperator::Or => to_boolean(&left_val),
                LogicalOperator::And => !to_boolean(&left_val),
            };
            if short_circuit {
                Ok(left_val)
            } else {
                evaluate_expression(right, ctx)
            }
        }

        ExpressionType::AssignmentExpression { left, right, .. } => {
            evaluate_assignment_expression(left, right, ctx)
        }

        ExpressionType::MemberExpression(member) => {
            let (object, key) = evaluate_member_parts(member, ctx)?;
            get_property(ctx, &object, &key)
        }

        ExpressionType::CallExpression {
            callee, arguments, ..
        } => evaluate_call_expression(callee, arguments, ctx),
    }
}

/// Evaluates `expr` as the initializer of `name`. Anonymous function
/// expressions take `name` as their own name.
pub fn evaluate_named_expression(
    expr: &ExpressionType,
    name: &str,
    ctx: &mut EvalContext,
) -> ValueResult {
    let value = evaluate_expression(expr, ctx)?;
    if let ExpressionType::FunctionExpression(data) = expr {
        if data.id.is_none() {
            if let JsValue::Object(o) = &value {
                if let ObjectType::Function(f) = &mut *o.borrow_mut() {
                    f.name = name.to_string();
                }
            }
        }
    }
    Ok(value)
}

fn evaluate_literal(lit: &LiteralData) -> JsValue {
    match &lit.value {
        LiteralType::NullLiteral => JsValue::Null,
        LiteralType::BooleanLiteral(b) => JsValue::Boolean(*b),
        LiteralType::StringLiteral(s) => JsValue::String(s.clone()),
        LiteralType::NumberLiteral(NumberLiteralType::IntegerLiteral(i)) => JsValue::int(*i),
        LiteralType::NumberLiteral(NumberLiteralType::FloatLiteral(f)) => {
            JsValue::Number(JsNumberType::from_f64(*f))
        }
    }
}

/// A named function expression sees its own name, read-only, in a scope
/// between the closure and its body.
fn instantiate_function_expression(data: &Rc<FunctionData>, ctx: &mut EvalContext) -> JsValue {
    match &data.id {
        Some(id) => {
            let func_env = new_declarative_environment(&ctx.current_env);
            let f = new_script_function(data.clone(), func_env.clone());
            let mut e = func_env.borrow_mut();
            e.create_immutable_binding(id.name.clone());
            let _ = e.initialize_binding(&id.name, JsValue::Object(f.clone()));
            JsValue::Object(f)
        }
        None => JsValue::Object(new_script_function(data.clone(), ctx.current_env.clone())),
    }
}

fn evaluate_unary_expression(
    operator: UnaryOperator,
    argument: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    match operator {
        UnaryOperator::TypeOf => {
            // `typeof undeclared` is "undefined", not a ReferenceError.
            if let ExpressionType::Identifier(id) = argument {
                if resolve_binding(&ctx.current_env, &id.name).is_none() {
                    return Ok(JsValue::str(type_of(&JsValue::Undefined)));
                }
            }
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::str(type_of(&value)))
        }
        UnaryOperator::LogicalNot => {
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::Boolean(!to_boolean(&value)))
        }
        UnaryOperator::Minus => {
            let value = evaluate_expression(argument, ctx)?;
            Ok(JsValue::Number(match to_number(&value) {
                JsNumberType::Integer(0) => JsNumberType::Float(-0.0),
                JsNumberType::Integer(i) => JsNumberType::Integer(-i),
                n => JsNumberType::from_f64(-n.as_f64()),
            }))
        }
    }
}

fn evaluate_binary_operator(operator: BinaryOperator, left: &JsValue, right: &JsValue) -> JsValue {
    match operator {
        BinaryOperator::StrictlyEqual => JsValue::Boolean(strict_equality(left, right)),
        BinaryOperator::StrictlyUnequal => JsValue::Boolean(!strict_equality(left, right)),
        BinaryOperator::Add => add_values(left, right),
        BinaryOperator::Subtract => numeric_op(left, right, |a, b| a - b),
        BinaryOperator::Multiply => numeric_op(left, right, |a, b| a * b),
        BinaryOperator::Divide => numeric_op(left, right, |a, b| a / b),
        BinaryOperator::Modulo => numeric_op(left, right, |a, b| a % b),
        BinaryOperator::LessThan => compare_values(left, right, |a, b| a < b),
        BinaryOperator::GreaterThan => compare_values(left, right, |a, b| a > b),
        BinaryOperator::LessThanEqual => compare_values(left, right, |a, b| a <= b),
        BinaryOperator::GreaterThanEqual => compare_values(left, right, |a, b| a >= b),
    }
}

fn add_values(left: &JsValue, right: &JsValue) -> JsValue {
    let is_stringy = |v: &JsValue| matches!(v, JsValue::String(_) | JsValue::Object(_));
    if is_stringy(left) || is_stringy(right) {
        JsValue::String(format!("{}{}", to_string(left), to_string(right)))
    } else {
        match (to_number(left), to_number(right)) {
            (JsNumberType::Integer(a), JsNumberType::Integer(b)) => match a.checked_add(b) {
                Some(sum) => JsValue::int(sum),
                None => JsValue::Number(JsNumberType::from_f64(a as f64 + b as f64)),
            },
            (a, b) => JsValue::Number(JsNumberType::from_f64(a.as_f64() + b.as_f64())),
        }
    }
}

fn numeric_op(left: &JsValue, right: &JsValue, op: fn(f64, f64) -> f64) -> JsValue {
    let a = to_number(left).as_f64();
    let b = to_number(right).as_f64();
    JsValue::Number(JsNumberType::from_f64(op(a, b)))
}

fn compare_values(left: &JsValue, right: &JsValue, op: fn(f64, f64) -> bool) -> JsValue {
    if let (JsValue::String(a), JsValue::String(b)) = (left, right) {
        let ord = a.encode_utf16().cmp(b.encode_utf16());
        return JsValue::Boolean(op(ord as i8 as f64, 0.0));
    }
    JsValue::Boolean(op(to_number(left).as_f64(), to_number(right).as_f64()))
}

fn strict_equality(left: &JsValue, right: &JsValue) -> bool {
    match (left, right) {
        (JsValue::Number(a), JsValue::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn evaluate_assignment_expression(
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    match left {
        ExpressionType::Identifier(id) => {
            let value = evaluate_named_expression(right, &id.name, ctx)?;
            set_identifier_value(&ctx.current_env, &id.name, value.clone())?;
            Ok(value)
        }
        ExpressionType::MemberExpression(member) => {
            let (object, key) = evaluate_member_parts(member, ctx)?;
            let value = evaluate_expression(right, ctx)?;
            match &object {
                JsValue::Object(o) => o.borrow_mut().set(&key, value.clone())?,
                JsValue::Undefined | JsValue::Null => {
                    return Err(JErrorType::TypeError(format!(
                        "Cannot set properties of {} (setting '{}')",
                        to_string(&object),
                        key
                    )))
                }
                // Primitives have nowhere to keep the property.
                _ => {}
            }
            Ok(value)
        }
        _ => Err(JErrorType::SyntaxError(
            "Invalid left-hand side in assignment".to_string(),
        )),
    }
}

/// Evaluates the object and the property key of a member expression.
fn evaluate_member_parts(
    member: &MemberExpressionType,
    ctx: &mut EvalContext,
) -> Result<(JsValue, String), JErrorType> {
    match member {
        MemberExpressionType::SimpleMemberExpression {
            object, property, ..
        } => {
            let object = evaluate_expression(object, ctx)?;
            Ok((object, property.name.clone()))
        }
        MemberExpressionType::ComputedMemberExpression {
            object, property, ..
        } => {
            let object = evaluate_expression(object, ctx)?;
            let key = evaluate_expression(property, ctx)?;
            Ok((object, to_property_key(&key)))
        }
    }
}

/// Reads `key` from any value. Functions fall back to the shared
/// `call`/`apply`/`bind` intrinsics for keys they do not own.
pub fn get_property(ctx: &mut EvalContext, object: &JsValue, key: &str) -> ValueResult {
    match object {
        JsValue::Undefined | JsValue::Null => Err(JErrorType::TypeError(format!(
            "Cannot read properties of {} (reading '{}')",
            to_string(object),
            key
        ))),
        JsValue::String(s) => {
            if key == "length" {
                return Ok(JsValue::int(s.encode_utf16().count() as i64));
            }
            Ok(canonical_index(key)
                .and_then(|i| s.encode_utf16().nth(i))
                .map(|unit| JsValue::String(String::from_utf16_lossy(&[unit])))
                .unwrap_or(JsValue::Undefined))
        }
        JsValue::Boolean(_) | JsValue::Number(_) => Ok(JsValue::Undefined),
        JsValue::Object(o) => {
            let (value, fallback) = {
                let borrowed = o.borrow();
                let fallback = borrowed.is_callable() && !borrowed.has_own(key);
                (borrowed.get(key), fallback)
            };
            if fallback && value == JsValue::Undefined {
                if let Some(intrinsic) = ctx.function_intrinsic(key) {
                    return Ok(JsValue::Object(intrinsic));
                }
            }
            Ok(value)
        }
    }
}

fn evaluate_call_expression(
    callee: &ExpressionType,
    arguments: &[ExpressionType],
    ctx: &mut EvalContext,
) -> ValueResult {
    let (func, this_value) = match callee {
        ExpressionType::MemberExpression(member) => {
            let (object, key) = evaluate_member_parts(member, ctx)?;
            let func = get_property(ctx, &object, &key)?;
            (func, object)
        }
        _ => {
            let func = evaluate_expression(callee, ctx)?;
            let this_value = ctx.substitute_receiver(None).unwrap_or(JsValue::Undefined);
            (func, this_value)
        }
    };

    let mut args = Vec::with_capacity(arguments.len());
    for a in arguments {
        args.push(evaluate_expression(a, ctx)?);
    }

    let function = callable_or_error(&func, callee)?;
    call_function(ctx, &function, this_value, args)
}

fn callable_or_error(value: &JsValue, callee: &ExpressionType) -> Result<JsObjectType, JErrorType> {
    match value {
        JsValue::Object(o) if o.borrow().is_callable() => Ok(o.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "{} is not a function",
            callee.get_meta().to_formatted_code()
        ))),
    }
}
