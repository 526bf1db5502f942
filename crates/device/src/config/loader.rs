use std::path::Path;

use super::schema::{DeviceConfig, DpsConfig, SecurityConfig, DEFAULT_DPS_ENDPOINT};
use crate::cli::ConnectionArgs;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<DeviceConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<DeviceConfig, LoadError> {
    let cfg: DeviceConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &DeviceConfig) -> Result<(), LoadError> {
    if cfg.model_id.is_empty() {
        return Err(LoadError::Validation("model_id must not be empty".into()));
    }
    if cfg.telemetry.interval_seconds == 0 {
        return Err(LoadError::Validation(
            "telemetry.interval_seconds must be > 0".into(),
        ));
    }
    if cfg.telemetry.window_size == 0 {
        return Err(LoadError::Validation(
            "telemetry.window_size must be > 0".into(),
        ));
    }
    if cfg.telemetry.min_temp >= cfg.telemetry.max_temp {
        return Err(LoadError::Validation(
            "telemetry.min_temp must be below telemetry.max_temp".into(),
        ));
    }
    if cfg.sas_token_ttl_seconds == 0 {
        return Err(LoadError::Validation(
            "sas_token_ttl_seconds must be > 0".into(),
        ));
    }
    Ok(())
}

/// Picks the connection strategy named by `IOTHUB_DEVICE_SECURITY_TYPE`.
pub fn resolve_security(args: &ConnectionArgs) -> Result<SecurityConfig, LoadError> {
    match args.security_type.as_deref() {
        Some("connectionString") => {
            let conn_str = required(
                args.connection_string.as_deref(),
                "IOTHUB_DEVICE_CONNECTION_STRING",
            )?;
            Ok(SecurityConfig::ConnectionString(conn_str))
        }
        Some("DPS") => {
            let endpoint = args
                .dps_endpoint
                .as_deref()
                .filter(|e| !e.is_empty())
                .unwrap_or(DEFAULT_DPS_ENDPOINT)
                .to_string();
            Ok(SecurityConfig::Dps(DpsConfig {
                endpoint,
                id_scope: required(args.dps_id_scope.as_deref(), "IOTHUB_DEVICE_DPS_ID_SCOPE")?,
                registration_id: required(
                    args.dps_device_id.as_deref(),
                    "IOTHUB_DEVICE_DPS_DEVICE_ID",
                )?,
                symmetric_key: required(
                    args.dps_device_key.as_deref(),
                    "IOTHUB_DEVICE_DPS_DEVICE_KEY",
                )?,
            }))
        }
        Some(other) => Err(LoadError::Validation(format!(
            "IOTHUB_DEVICE_SECURITY_TYPE must be 'connectionString' or 'DPS', got '{other}'"
        ))),
        None => Err(LoadError::Validation(
            "IOTHUB_DEVICE_SECURITY_TYPE is not set; choose 'connectionString' or 'DPS'".into(),
        )),
    }
}

fn required(value: Option<&str>, name: &str) -> Result<String, LoadError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(LoadError::Validation(format!("{name} must be set"))),
    }
}
