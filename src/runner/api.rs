//! Embedding API.
//!
//! An [`Engine`] owns one global environment; successive [`Engine::eval`]
//! calls share it, so declarations from one snippet are visible to the next.
//!
//! ```
//! use ctxbind::runner::api::Engine;
//! use ctxbind::runner::ds::value::JsValue;
//! use ctxbind::runner::plugin::config::EngineConfig;
//!
//! let mut engine = Engine::with_captured_console(EngineConfig::default());
//! engine
//!     .eval("var person = { name: 'Kishan' }; function hi() { console.log('hi ' + this.name); }")
//!     .unwrap();
//! engine.eval("hi.call(person);").unwrap();
//! assert_eq!(engine.console_lines(), vec!["hi Kishan"]);
//! assert_eq!(engine.eval("typeof hi.bind;").unwrap(), JsValue::str("function"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::parser::JsParser;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::eval::execute_program;
use crate::runner::plugin::config::EngineConfig;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::{ConsoleSink, EvalContext};

pub struct Engine {
    ctx: EvalContext,
    captured: Option<Rc<RefCell<Vec<String>>>>,
}

impl Engine {
    /// An engine whose console writes to stdout/stderr.
    pub fn new(config: EngineConfig) -> Self {
        let mut ctx = EvalContext::new(config);
        ctx.install_core_builtins(BuiltInRegistry::with_core());
        Engine {
            ctx,
            captured: None,
        }
    }

    /// An engine whose console output is kept in memory, see
    /// [`Engine::console_lines`].
    pub fn with_captured_console(config: EngineConfig) -> Self {
        let lines = Rc::new(RefCell::new(vec![]));
        let mut ctx = EvalContext::new(config).with_console(ConsoleSink::Captured(lines.clone()));
        ctx.install_core_builtins(BuiltInRegistry::with_core());
        Engine {
            ctx,
            captured: Some(lines),
        }
    }

    /// Parses and runs `source`, returning the value of its last expression
    /// statement (`undefined` if there is none).
    pub fn eval(&mut self, source: &str) -> Result<JsValue, JErrorType> {
        let program = JsParser::parse_to_ast_from_str(source)?;
        debug!(statements = program.body.len(), "evaluating program");
        execute_program(&program, &mut self.ctx)
    }

    pub fn get_binding(&self, name: &str) -> Result<JsValue, JErrorType> {
        self.ctx.get_binding(name)
    }

    /// Lines written through `console.*` so far. Empty unless the engine was
    /// created with [`Engine::with_captured_console`].
    pub fn console_lines(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .map(|lines| lines.borrow().clone())
            .unwrap_or_default()
    }

    pub fn context(&mut self) -> &mut EvalContext {
        &mut self.ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.ctx.config
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
