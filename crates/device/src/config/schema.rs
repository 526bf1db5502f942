use serde::Deserialize;

pub const DEFAULT_MODEL_ID: &str = "dtmi:com:example:Thermostat;1";
pub const DEFAULT_DPS_ENDPOINT: &str = "global.azure-devices-provisioning.net";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default = "default_max_temp_since_last_reboot")]
    pub max_temp_since_last_reboot: f64,
    #[serde(default = "default_token_ttl")]
    pub sas_token_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TelemetryConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_min_temp")]
    pub min_temp: i32,
    #[serde(default = "default_max_temp")]
    pub max_temp: i32,
}

/// How the device obtains its hub credentials.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityConfig {
    ConnectionString(String),
    Dps(DpsConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DpsConfig {
    pub endpoint: String,
    pub id_scope: String,
    pub registration_id: String,
    pub symmetric_key: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            telemetry: TelemetryConfig::default(),
            max_temp_since_last_reboot: default_max_temp_since_last_reboot(),
            sas_token_ttl_seconds: default_token_ttl(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            window_size: default_window_size(),
            min_temp: default_min_temp(),
            max_temp: default_max_temp(),
        }
    }
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_max_temp_since_last_reboot() -> f64 {
    10.96
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_interval() -> u64 {
    8
}

fn default_window_size() -> usize {
    10
}

fn default_min_temp() -> i32 {
    10
}

fn default_max_temp() -> i32 {
    50
}
