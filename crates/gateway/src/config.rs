//! Gateway Configuration
//!
//! Every path the gateway touches is externally supplied; a missing
//! required variable is a fatal startup error, never a silent fallback to
//! some developer's local checkout.

use scriptgate_core::AppError;
use std::collections::HashMap;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Interpreter binary (SCRIPTGATE_INTERPRETER, required)
    pub interpreter: PathBuf,
    /// Handler script (SCRIPTGATE_SCRIPT, required)
    pub script: PathBuf,
    /// Directory holding *.graphql type definitions (SCRIPTGATE_SCHEMA_DIR, required)
    pub schema_dir: PathBuf,
    /// Working directory for the script (SCRIPTGATE_WORKING_DIR)
    pub working_dir: Option<PathBuf>,
    /// Extra environment entries for the script, on top of the inherited
    /// environment (SCRIPTGATE_SCRIPT_ENV, comma-separated KEY=VALUE pairs)
    pub script_env: HashMap<String, String>,
    /// Listen address (SCRIPTGATE_HOST / SCRIPTGATE_PORT)
    pub host: String,
    pub port: u16,
    /// Captured-output cap in bytes (SCRIPTGATE_MAX_OUTPUT_BYTES)
    pub max_output_bytes: usize,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an injected lookup function (testable without touching
    /// the process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            interpreter: required_path(&lookup, "SCRIPTGATE_INTERPRETER")?,
            script: required_path(&lookup, "SCRIPTGATE_SCRIPT")?,
            schema_dir: required_path(&lookup, "SCRIPTGATE_SCHEMA_DIR")?,
            working_dir: optional(&lookup, "SCRIPTGATE_WORKING_DIR").map(expand),
            script_env: parse_env_pairs(optional(&lookup, "SCRIPTGATE_SCRIPT_ENV"))?,
            host: optional(&lookup, "SCRIPTGATE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_number(&lookup, "SCRIPTGATE_PORT", DEFAULT_PORT)?,
            max_output_bytes: parse_number(
                &lookup,
                "SCRIPTGATE_MAX_OUTPUT_BYTES",
                DEFAULT_MAX_OUTPUT_BYTES,
            )?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required_path(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<PathBuf, AppError> {
    optional(lookup, key)
        .map(|value| expand(value))
        .ok_or_else(|| AppError::Config(format!("environment variable {key} is not set")))
}

fn expand(value: String) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&value).into_owned())
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match optional(lookup, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{key} is not a valid number: {raw}"))),
    }
}

fn parse_env_pairs(raw: Option<String>) -> Result<HashMap<String, String>, AppError> {
    let mut pairs = HashMap::new();
    let Some(raw) = raw else {
        return Ok(pairs);
    };
    for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            AppError::Config(format!(
                "SCRIPTGATE_SCRIPT_ENV entry '{entry}' is not KEY=VALUE"
            ))
        })?;
        pairs.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(pairs)
}
