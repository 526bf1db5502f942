use std::str::FromStr;

/// Device connection string: `HostName=…;DeviceId=…;SharedAccessKey=…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub host_name: String,
    pub device_id: String,
    pub shared_access_key: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConnectionStringError {
    Malformed(String),
    Duplicate(String),
    Missing(&'static str),
}

impl std::fmt::Display for ConnectionStringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(part) => write!(f, "malformed segment '{part}'"),
            Self::Duplicate(key) => write!(f, "duplicate key '{key}'"),
            Self::Missing(key) => write!(f, "missing required key '{key}'"),
        }
    }
}

impl std::error::Error for ConnectionStringError {}

impl FromStr for ConnectionString {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut host_name = None;
        let mut device_id = None;
        let mut shared_access_key = None;

        for part in s.trim().split(';').filter(|p| !p.trim().is_empty()) {
            // keys never contain '=', base64 values may end with it
            let (key, value) = part
                .split_once('=')
                .filter(|(k, v)| !k.trim().is_empty() && !v.is_empty())
                .ok_or_else(|| ConnectionStringError::Malformed(part.to_string()))?;

            let slot = match key.trim() {
                "HostName" => &mut host_name,
                "DeviceId" => &mut device_id,
                "SharedAccessKey" => &mut shared_access_key,
                _ => continue,
            };
            if slot.replace(value.to_string()).is_some() {
                return Err(ConnectionStringError::Duplicate(key.trim().to_string()));
            }
        }

        Ok(Self {
            host_name: host_name.ok_or(ConnectionStringError::Missing("HostName"))?,
            device_id: device_id.ok_or(ConnectionStringError::Missing("DeviceId"))?,
            shared_access_key: shared_access_key
                .ok_or(ConnectionStringError::Missing("SharedAccessKey"))?,
        })
    }
}
