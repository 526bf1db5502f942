mod dps;
mod error;

pub use dps::{DpsClient, RegistrationOperation, RegistrationState, API_VERSION};
pub use error::ProvisioningError;

use pnp_common::ConnectionString;

use crate::config::SecurityConfig;

/// Everything needed to open an MQTT session with the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCredentials {
    pub host_name: String,
    pub device_id: String,
    pub shared_access_key: String,
}

impl From<ConnectionString> for DeviceCredentials {
    fn from(cs: ConnectionString) -> Self {
        Self {
            host_name: cs.host_name,
            device_id: cs.device_id,
            shared_access_key: cs.shared_access_key,
        }
    }
}

pub async fn obtain_credentials(
    security: &SecurityConfig,
    model_id: &str,
) -> Result<DeviceCredentials, ProvisioningError> {
    match security {
        SecurityConfig::ConnectionString(raw) => {
            let cs: ConnectionString = raw.parse()?;
            tracing::info!(
                host = %cs.host_name,
                device_id = %cs.device_id,
                "connecting using connection string"
            );
            Ok(cs.into())
        }
        SecurityConfig::Dps(dps) => {
            let creds = DpsClient::new(dps).register(model_id).await?;
            tracing::info!(
                assigned_hub = %creds.host_name,
                device_id = %creds.device_id,
                "device was assigned"
            );
            Ok(creds)
        }
    }
}
