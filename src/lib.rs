//! # ctxbind - receiver binding for a small JavaScript subset
//!
//! A tree-walking interpreter for snippets that explore how a function's
//! `this` is chosen, with `call`, `apply` and `bind` implemented without
//! ever writing to the receiver.
//!
//! ## Quick Start
//!
//! ### Parsing a snippet
//!
//! ```
//! use ctxbind::parser::JsParser;
//!
//! let code = "var x = 5 + 3;";
//! let ast = JsParser::parse_to_ast_from_str(code).unwrap();
//! assert_eq!(ast.body.len(), 1);
//! ```
//!
//! ### Running a snippet
//!
//! ```
//! use ctxbind::runner::api::Engine;
//! use ctxbind::runner::ds::value::JsValue;
//!
//! let mut engine = Engine::default();
//! let result = engine
//!     .eval(
//!         "var person = { firstName: 'Kishan', lastName: 'Patel' };
//!          function fullName(city) { return this.firstName + ' ' + this.lastName + ', ' + city; }
//!          var bound = fullName.bind(person, 'Surendranagar');
//!          bound();",
//!     )
//!     .unwrap();
//! assert_eq!(result, JsValue::str("Kishan Patel, Surendranagar"));
//! ```
//!
//! ### Choosing a receiver policy
//!
//! ```
//! use ctxbind::runner::api::Engine;
//! use ctxbind::runner::plugin::config::{EngineConfig, ReceiverPolicy};
//!
//! let config = EngineConfig::default().with_receiver_policy(ReceiverPolicy::Reject);
//! let mut engine = Engine::new(config);
//! assert!(engine.eval("function f() { return 1; } f.call(null);").is_err());
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - pest grammar and AST types
//! - **[`runner`]** - the interpreter
//!   - **[`runner::binder`]** - `call`, `apply` and `bind`
//!   - **[`runner::ds`]** - data structures (values, objects, environments)
//!   - **[`runner::eval`]** - statement and expression evaluation
//!   - **[`runner::plugin`]** - evaluation context, built-in registry, configuration
//!   - **[`runner::std_lib`]** - `console`, `Object` and the function intrinsics

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
