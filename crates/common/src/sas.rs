//! Shared access signature tokens.
//!
//! A token authorizes access to one resource URI until an absolute expiry
//! (seconds since the Unix epoch). The signature is an HMAC-SHA256 over
//! `"{url-encoded resource}\n{expiry}"` keyed with the decoded symmetric key.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::crypto::{decode_key, sign_data};

#[derive(Debug)]
pub enum SasError {
    InvalidKey(base64::DecodeError),
    EmptyResource,
}

impl std::fmt::Display for SasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(e) => write!(f, "symmetric key is not valid base64: {e}"),
            Self::EmptyResource => write!(f, "resource URI must not be empty"),
        }
    }
}

impl std::error::Error for SasError {}

impl From<base64::DecodeError> for SasError {
    fn from(e: base64::DecodeError) -> Self {
        Self::InvalidKey(e)
    }
}

#[derive(Debug, Clone)]
pub struct SasTokenBuilder {
    resource_uri: String,
    key_name: Option<String>,
    ttl: Duration,
}

impl SasTokenBuilder {
    pub fn new(resource_uri: impl Into<String>) -> Self {
        Self {
            resource_uri: resource_uri.into(),
            key_name: None,
            ttl: Duration::from_secs(3600),
        }
    }

    /// Policy name appended as `skn`. Provisioning tokens use `registration`.
    pub fn with_key_name(mut self, name: impl Into<String>) -> Self {
        self.key_name = Some(name.into());
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn build(&self, key_b64: &str) -> Result<String, SasError> {
        let expiry = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .saturating_add(self.ttl)
            .as_secs();
        self.build_with_expiry(key_b64, expiry)
    }

    pub fn build_with_expiry(&self, key_b64: &str, expiry: u64) -> Result<String, SasError> {
        if self.resource_uri.is_empty() {
            return Err(SasError::EmptyResource);
        }
        let key = decode_key(key_b64)?;
        let resource = urlencoding::encode(&self.resource_uri);
        let to_sign = format!("{resource}\n{expiry}");
        let signature = sign_data(&key, to_sign.as_bytes());

        let mut token = format!(
            "SharedAccessSignature sr={resource}&sig={}&se={expiry}",
            urlencoding::encode(&signature)
        );
        if let Some(ref name) = self.key_name {
            token.push_str("&skn=");
            token.push_str(&urlencoding::encode(name));
        }
        Ok(token)
    }
}
