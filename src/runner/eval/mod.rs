//! Evaluation module for executing the snippet AST.
//!
//! This module contains the tree-walking interpreter: statements, expressions
//! and the [[Call]] operation shared with the binder.

pub mod expression;
pub mod function;
pub mod statement;
pub mod types;

pub use statement::execute_program;
pub use types::{Completion, CompletionType};
