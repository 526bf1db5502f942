use pnp_common::SasError;

#[derive(Debug)]
pub enum TransportError {
    Sas(SasError),
    Connection(String),
    Client(rumqttc::ClientError),
    Encode(serde_json::Error),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sas(e) => write!(f, "sas token: {e}"),
            Self::Connection(e) => write!(f, "connection: {e}"),
            Self::Client(e) => write!(f, "mqtt client: {e}"),
            Self::Encode(e) => write!(f, "encode: {e}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<SasError> for TransportError {
    fn from(e: SasError) -> Self {
        Self::Sas(e)
    }
}

impl From<rumqttc::ClientError> for TransportError {
    fn from(e: rumqttc::ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}
