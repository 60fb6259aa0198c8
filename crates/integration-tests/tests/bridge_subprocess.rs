//! Bridge + real subprocess integration tests
//!
//! Each test writes a small /bin/sh script and drives it through the full
//! envelope -> spawn -> capture -> extract pipeline.

use scriptgate_core::application::ScriptBridge;
use scriptgate_core::domain::BridgeError;
use scriptgate_infra_process::{InvokerConfig, SubprocessInvoker};
use scriptgate_integration_tests::write_script;
use serde_json::json;
use std::sync::Arc;

const SH: &str = "/bin/sh";

fn bridge_for(script: &std::path::Path) -> ScriptBridge {
    ScriptBridge::new(Arc::new(SubprocessInvoker::new(InvokerConfig::new(
        SH, script,
    ))))
}

fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("args must be an object"),
    }
}

#[tokio::test]
async fn test_success_with_debug_noise() {
    let script = write_script(
        "debug_noise",
        "echo 'DEBUG: starting'\n\
         echo 'connecting...'\n\
         echo '{\"success\":true,\"updatedCount\":1}'\n",
    );

    let value = bridge_for(&script)
        .resolve_field("extendDrive", args(json!({"input": {"drvdetid": 123}})))
        .await
        .unwrap();

    assert_eq!(value, json!({"success": true, "updatedCount": 1}));
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_envelope_reaches_script_as_single_json_argument() {
    // The script echoes $1 back, so the decoded result IS the envelope.
    let script = write_script("echo_envelope", "printf '%s\\n' \"$1\"\n");

    let value = bridge_for(&script)
        .resolve_field("extendDrive", args(json!({"input": {"drvdetid": 123}})))
        .await
        .unwrap();

    assert_eq!(value["fieldName"], json!("extendDrive"));
    assert_eq!(value["arguments"]["input"]["drvdetid"], json!(123));
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_nonzero_exit_surfaces_stderr_not_stdout() {
    let script = write_script(
        "traceback",
        "echo '{\"partial\":true}'\n\
         echo 'Traceback (most recent call last):' >&2\n\
         echo '  ValueError: boom' >&2\n\
         exit 1\n",
    );

    let err = bridge_for(&script)
        .resolve_field("extendDrive", args(json!({})))
        .await
        .unwrap_err();

    match &err {
        BridgeError::ProcessExit { exit_code, stderr } => {
            assert_eq!(*exit_code, Some(1));
            assert!(stderr.contains("Traceback"));
        }
        other => panic!("expected ProcessExit, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("execution failed"));
    assert!(!message.contains("partial"), "stdout leaked: {message}");
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_empty_stdout_is_result_parse_error() {
    let script = write_script("silent", "exit 0\n");

    let err = bridge_for(&script)
        .resolve_field("ping", args(json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::ResultParse(_)));
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_missing_interpreter_is_spawn_error() {
    let bridge = ScriptBridge::new(Arc::new(SubprocessInvoker::new(InvokerConfig::new(
        "/nonexistent/python3",
        "/nonexistent/handler.py",
    ))));

    let err = bridge
        .resolve_field("ping", args(json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Spawn(_)));
    assert!(err.to_string().contains("execution failed"));
}

#[tokio::test]
async fn test_output_over_cap_fails_instead_of_truncating() {
    let script = write_script(
        "chatty",
        "i=0\n\
         while [ $i -lt 100 ]; do echo 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx'; i=$((i+1)); done\n\
         echo '{\"ok\":true}'\n",
    );

    let mut config = InvokerConfig::new(SH, &script);
    config.max_output_bytes = 512;
    let bridge = ScriptBridge::new(Arc::new(SubprocessInvoker::new(config)));

    let err = bridge
        .resolve_field("ping", args(json!({})))
        .await
        .unwrap_err();

    match err {
        BridgeError::ProcessExit { stderr, .. } => assert!(stderr.contains("exceeded")),
        other => panic!("expected ProcessExit, got {other:?}"),
    }
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_working_directory_override() {
    let script = write_script("cwd", "printf '{\"cwd\":\"%s\"}\\n' \"$PWD\"\n");

    let mut config = InvokerConfig::new(SH, &script);
    config.working_dir = Some("/".into());
    let bridge = ScriptBridge::new(Arc::new(SubprocessInvoker::new(config)));

    // Resolve under a field name that is not a key in the response, so the
    // object comes back whole instead of being unwrapped.
    let value = bridge
        .resolve_field("whereAmI", args(json!({})))
        .await
        .unwrap();
    assert_eq!(value["cwd"], json!("/"));
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_response_key_matching_field_name_is_unwrapped() {
    // A bare object whose key equals the resolved field name gets unwrapped
    // down to that key's value, even without a "data" envelope.
    let script = write_script("bare_key", "echo '{\"cwd\":\"/\"}'\n");

    let value = bridge_for(&script)
        .resolve_field("cwd", args(json!({})))
        .await
        .unwrap();

    assert_eq!(value, json!("/"));
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_env_overrides_reach_the_script() {
    let script = write_script(
        "env",
        "printf '{\"token\":\"%s\"}\\n' \"$SCRIPTGATE_TEST_TOKEN\"\n",
    );

    let mut config = InvokerConfig::new(SH, &script);
    config
        .env_overrides
        .insert("SCRIPTGATE_TEST_TOKEN".to_string(), "sekrit".to_string());
    let bridge = ScriptBridge::new(Arc::new(SubprocessInvoker::new(config)));

    let value = bridge.resolve_field("env", args(json!({}))).await.unwrap();
    assert_eq!(value["token"], json!("sekrit"));
    let _ = std::fs::remove_file(&script);
}

#[tokio::test]
async fn test_graphql_shaped_response_is_unwrapped() {
    let script = write_script(
        "wrapped",
        "echo '{\"data\":{\"extendDrive\":{\"success\":true}}}'\n",
    );

    let value = bridge_for(&script)
        .resolve_field("extendDrive", args(json!({})))
        .await
        .unwrap();

    assert_eq!(value, json!({"success": true}));
    let _ = std::fs::remove_file(&script);
}
