//! End-to-end runs of the bundled demo and of the configuration file path.

extern crate ctxbind;

use std::io::Write;

use ctxbind::runner::api::Engine;
use ctxbind::runner::plugin::config::{ConfigError, EngineConfig, ReceiverPolicy};

#[test]
fn test_context_binding_demo_output() {
    let mut engine = Engine::with_captured_console(EngineConfig::default());
    engine
        .eval(include_str!("../demos/context_binding.js"))
        .unwrap();
    assert_eq!(
        engine.console_lines(),
        vec![
            "Kishan Patel is from Surendranagar, Gujarat",
            "Sachin Tendulkar is from Mumbai, Maharastra",
            "Kishan Patel is from Surendranagar, Maharastra",
            "Kishan Patel is from Surendranagar, Maharastra",
            "Sachin Tendulkar is from Mumbai, Maharastra",
            "Kishan Patel is from Surendranagar, Gujarat",
        ]
    );
}

#[test]
fn test_demo_leaves_receivers_untouched() {
    let mut engine = Engine::with_captured_console(EngineConfig::default());
    engine
        .eval(include_str!("../demos/context_binding.js"))
        .unwrap();
    let keys = engine.eval("Object.keys(name).length + Object.keys(name2).length;").unwrap();
    assert_eq!(keys, ctxbind::runner::ds::value::JsValue::int(4));
}

#[test]
fn test_demo_under_reject_policy() {
    // Every binder call in the demo supplies a receiver.
    let config = EngineConfig::default().with_receiver_policy(ReceiverPolicy::Reject);
    let mut engine = Engine::with_captured_console(config);
    engine
        .eval(include_str!("../demos/context_binding.js"))
        .unwrap();
    assert_eq!(engine.console_lines().len(), 6);
}

#[test]
fn test_console_formats_values() {
    let mut engine = Engine::with_captured_console(EngineConfig::default());
    engine
        .eval(
            "function greet() {}
             console.log({ firstName: 'Kishan', tags: ['a', 1] });
             console.info(greet, greet.bind(null));
             console.warn(undefined, null, true);
             console.error('plain', 2.5);",
        )
        .unwrap();
    assert_eq!(
        engine.console_lines(),
        vec![
            "{ firstName: 'Kishan', tags: [ 'a', 1 ] }",
            "[Function: greet] [Function: bound greet]",
            "undefined null true",
            "plain 2.5",
        ]
    );
}

#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join(format!("ctxbind-config-{}.toml", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "receiver_policy = \"reject\"").unwrap();
        writeln!(file, "max_call_depth = 32").unwrap();
    }
    let config = EngineConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.receiver_policy, ReceiverPolicy::Reject);
    assert_eq!(config.max_call_depth, 32);
}

#[test]
fn test_missing_config_file() {
    let err = EngineConfig::load(std::path::Path::new("/nonexistent/ctxbind.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_config_file_rejects_deep_call_limit() {
    let path = std::env::temp_dir().join(format!("ctxbind-deep-{}.toml", std::process::id()));
    std::fs::write(&path, "max_call_depth = 100000\n").unwrap();
    let err = EngineConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, ConfigError::CallDepthOutOfRange { value: 100000, .. }));
}
