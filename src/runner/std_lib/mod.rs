//! Standard library built-in objects.
//!
//! This module contains the built-ins available to snippets (`console`,
//! `Object`, `undefined`) and the `call`/`apply`/`bind` intrinsics shared
//! by every function value.

pub mod console;
pub mod core;
pub mod function;
pub mod object;

pub use core::register_core_builtins;
