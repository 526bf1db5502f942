use pnp_common::{ConnectionStringError, SasError};

#[derive(Debug)]
pub enum ProvisioningError {
    ConnectionString(ConnectionStringError),
    Sas(SasError),
    Http(reqwest::Error),
    Status(u16, String),
    NotAssigned { status: String, detail: String },
    Timeout(u32),
}

impl std::fmt::Display for ProvisioningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionString(e) => write!(f, "connection string: {e}"),
            Self::Sas(e) => write!(f, "sas token: {e}"),
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, msg) => write!(f, "provisioning service returned {code}: {msg}"),
            Self::NotAssigned { status, detail } => {
                write!(f, "Could not provision device (status '{status}')")?;
                if !detail.is_empty() {
                    write!(f, ": {detail}")?;
                }
                Ok(())
            }
            Self::Timeout(polls) => {
                write!(f, "registration still pending after {polls} status polls")
            }
        }
    }
}

impl std::error::Error for ProvisioningError {}

impl From<ConnectionStringError> for ProvisioningError {
    fn from(e: ConnectionStringError) -> Self {
        Self::ConnectionString(e)
    }
}

impl From<SasError> for ProvisioningError {
    fn from(e: SasError) -> Self {
        Self::Sas(e)
    }
}

impl From<reqwest::Error> for ProvisioningError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}
