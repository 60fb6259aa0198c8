//! Scriptgate - Main Entry Point
//! GraphQL gateway bridging schema fields to an external handler script

mod config;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::GatewayConfig;
use scriptgate_api_graphql::{build_schema, load_type_defs, serve, FieldBindings};
use scriptgate_core::application::ScriptBridge;
use scriptgate_infra_process::{InvokerConfig, SubprocessInvoker};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// Root fields forwarded to the handler script. This is startup
// configuration, not dynamic dispatch: add a field name here (and to the
// SDL) to expose a new operation.
const QUERY_FIELDS: &[&str] = &[];
const MUTATION_FIELDS: &[&str] = &["extendDrive"];

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON format for production)
    let log_format = std::env::var("SCRIPTGATE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("scriptgate=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Scriptgate v{} starting...", VERSION);

    // 2. Load configuration (fatal if any required path is unset)
    let config = GatewayConfig::from_env()?;
    info!(
        interpreter = %config.interpreter.display(),
        script = %config.script.display(),
        schema_dir = %config.schema_dir.display(),
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let mut invoker_config = InvokerConfig::new(&config.interpreter, &config.script);
    invoker_config.working_dir = config.working_dir.clone();
    invoker_config.env_overrides = config.script_env.clone();
    invoker_config.max_output_bytes = config.max_output_bytes;

    let invoker = Arc::new(SubprocessInvoker::new(invoker_config));
    let bridge = Arc::new(ScriptBridge::new(invoker));

    // 4. Assemble the executable schema from SDL files
    let type_defs = load_type_defs(&config.schema_dir)?;
    let bindings = FieldBindings::new(QUERY_FIELDS, MUTATION_FIELDS);
    let schema = build_schema(&type_defs, &bindings, bridge)?;

    // 5. Serve until shutdown
    let addr = config.listen_addr();
    serve(schema, &addr, shutdown_signal()).await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    info!("Shutdown signal received. Exiting gracefully...");
}
