//! Runtime: data structures, the interpreter, built-ins and the binder.

pub mod api;
pub mod binder;
pub mod ds;
pub mod eval;
pub mod plugin;
pub mod std_lib;
