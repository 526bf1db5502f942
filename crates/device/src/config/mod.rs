mod loader;
mod schema;

pub use loader::{load_from_file, load_from_str, resolve_security, LoadError};
pub use schema::{
    DeviceConfig, DpsConfig, SecurityConfig, TelemetryConfig, DEFAULT_DPS_ENDPOINT,
    DEFAULT_MODEL_ID,
};
