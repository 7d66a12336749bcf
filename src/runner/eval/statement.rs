//! Statement execution.
//!
//! This module provides statement execution logic for the interpreter,
//! including declaration hoisting for programs, function bodies and blocks.

use crate::parser::ast::{
    FunctionBodyData, ProgramData, StatementType, VariableDeclarationData,
    VariableDeclarationKind,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::new_script_function;
use crate::runner::ds::lex_env::{
    new_declarative_environment, set_identifier_value, JsLexEnvironmentType,
};
use crate::runner::ds::operations::type_conversion::to_boolean;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

use super::expression::{evaluate_expression, evaluate_named_expression};
use super::types::{Completion, EvalResult, ValueResult};

/// Run `f` with `env` as the running environment, restoring the previous
/// one afterwards whether or not `f` fails.
pub fn run_in_environment<T>(
    ctx: &mut EvalContext,
    env: JsLexEnvironmentType,
    f: impl FnOnce(&mut EvalContext) -> Result<T, JErrorType>,
) -> Result<T, JErrorType> {
    let saved = std::mem::replace(&mut ctx.current_env, env);
    let result = f(ctx);
    ctx.current_env = saved;
    result
}

/// Execute a whole program in the running environment and return the value
/// of the last expression statement.
pub fn execute_program(program: &ProgramData, ctx: &mut EvalContext) -> ValueResult {
    hoist_declarations(&program.body, ctx, true);
    let mut last_value = JsValue::Undefined;
    for stmt in &program.body {
        let completion = execute_statement(stmt, ctx)?;
        if completion.is_abrupt() {
            return Err(JErrorType::SyntaxError(
                "Illegal return statement".to_string(),
            ));
        }
        if let Some(v) = completion.value {
            last_value = v;
        }
    }
    Ok(last_value)
}

/// Execute a function body in the (already prepared) function environment.
pub fn execute_function_body(body: &FunctionBodyData, ctx: &mut EvalContext) -> ValueResult {
    hoist_declarations(&body.body, ctx, true);
    let completion = execute_statement_list(&body.body, ctx)?;
    if completion.is_abrupt() {
        Ok(completion.get_value())
    } else {
        Ok(JsValue::Undefined)
    }
}

/// Hoist declarations of `statements` into the running environment.
///
/// Function declarations are bound to their function objects up front,
/// `let`/`const` names are created uninitialized, and (when `include_var`
/// is set, i.e. at function or program level) `var` names anywhere in the
/// list, nested blocks included, are bound to `undefined`.
pub fn hoist_declarations(statements: &[StatementType], ctx: &mut EvalContext, include_var: bool) {
    let env = ctx.current_env.clone();
    if include_var {
        hoist_var_declarations(statements, &env);
    }
    for stmt in statements {
        match stmt {
            StatementType::VariableDeclaration(VariableDeclarationData {
                kind, declarations, ..
            }) => {
                let mut e = env.borrow_mut();
                for d in declarations {
                    match kind {
                        VariableDeclarationKind::Let => e.create_mutable_binding(d.id.name.clone()),
                        VariableDeclarationKind::Const => {
                            e.create_immutable_binding(d.id.name.clone())
                        }
                        VariableDeclarationKind::Var => {}
                    }
                }
            }
            StatementType::FunctionDeclaration(data) => {
                if let Some(id) = &data.id {
                    let f = new_script_function(data.clone(), env.clone());
                    let mut e = env.borrow_mut();
                    e.create_mutable_binding(id.name.clone());
                    // The binding was just created, so this cannot fail.
                    let _ = e.initialize_binding(&id.name, JsValue::Object(f));
                }
            }
            _ => {}
        }
    }
}

fn hoist_var_declarations(statements: &[StatementType], env: &JsLexEnvironmentType) {
    for stmt in statements {
        match stmt {
            StatementType::VariableDeclaration(VariableDeclarationData {
                kind: VariableDeclarationKind::Var,
                declarations,
                ..
            }) => {
                let mut e = env.borrow_mut();
                for d in declarations {
                    e.create_mutable_binding(d.id.name.clone());
                    if !e.is_initialized(&d.id.name) {
                        let _ = e.initialize_binding(&d.id.name, JsValue::Undefined);
                    }
                }
            }
            StatementType::BlockStatement { body, .. } => hoist_var_declarations(body, env),
            StatementType::IfStatement {
                consequent,
                alternate,
                ..
            } => {
                hoist_var_declarations(std::slice::from_ref(consequent.as_ref()), env);
                if let Some(alt) = alternate {
                    hoist_var_declarations(std::slice::from_ref(alt.as_ref()), env);
                }
            }
            _ => {}
        }
    }
}

/// Execute statements in order, stopping at the first abrupt completion.
pub fn execute_statement_list(statements: &[StatementType], ctx: &mut EvalContext) -> EvalResult {
    let mut last = Completion::normal();
    for stmt in statements {
        let completion = execute_statement(stmt, ctx)?;
        if completion.is_abrupt() {
            return Ok(completion);
        }
        if completion.value.is_some() {
            last = completion;
        }
    }
    Ok(last)
}

/// Execute a statement and return its completion.
pub fn execute_statement(stmt: &StatementType, ctx: &mut EvalContext) -> EvalResult {
    match stmt {
        StatementType::EmptyStatement { .. } => Ok(Completion::normal()),

        // Bound during hoisting.
        StatementType::FunctionDeclaration(_) => Ok(Completion::normal()),

        StatementType::ExpressionStatement { expression, .. } => {
            let value = evaluate_expression(expression, ctx)?;
            Ok(Completion::normal_with_value(value))
        }

        StatementType::VariableDeclaration(decl) => execute_variable_declaration(decl, ctx),

        StatementType::ReturnStatement { argument, .. } => {
            let value = match argument {
                Some(arg) => evaluate_expression(arg, ctx)?,
                None => JsValue::Undefined,
            };
            Ok(Completion::return_value(value))
        }

        StatementType::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            if to_boolean(&evaluate_expression(test, ctx)?) {
                execute_statement(consequent, ctx)
            } else if let Some(alt) = alternate {
                execute_statement(alt, ctx)
            } else {
                Ok(Completion::normal())
            }
        }

        StatementType::BlockStatement { body, .. } => {
            let block_env = new_declarative_environment(&ctx.current_env);
            run_in_environment(ctx, block_env, |ctx| {
                hoist_declarations(body, ctx, false);
                execute_statement_list(body, ctx)
            })
        }
    }
}

fn execute_variable_declaration(decl: &VariableDeclarationData, ctx: &mut EvalContext) -> EvalResult {
    for d in &decl.declarations {
        let name = &d.id.name;
        match decl.kind {
            VariableDeclarationKind::Var => {
                if let Some(init) = &d.init {
                    let value = evaluate_named_expression(init, name, ctx)?;
                    set_identifier_value(&ctx.current_env, name, value)?;
                }
            }
            VariableDeclarationKind::Let | VariableDeclarationKind::Const => {
                let value = match &d.init {
                    Some(init) => evaluate_named_expression(init, name, ctx)?,
                    None => JsValue::Undefined,
                };
                ctx.current_env.borrow_mut().initialize_binding(name, value)?;
            }
        }
    }
    Ok(Completion::normal())
}
