use std::time::Duration;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProvisioningError;
use super::DeviceCredentials;
use crate::config::DpsConfig;
use pnp_common::SasTokenBuilder;

pub const API_VERSION: &str = "2021-06-01";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOperation {
    pub operation_id: String,
    pub status: String,
    #[serde(default)]
    pub registration_state: Option<RegistrationState>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationState {
    #[serde(default)]
    pub assigned_hub: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    registration_id: &'a str,
    payload: serde_json::Value,
}

/// Symmetric-key registration against the provisioning service REST API.
pub struct DpsClient {
    http: reqwest::Client,
    base_url: String,
    id_scope: String,
    registration_id: String,
    symmetric_key: String,
    poll_interval: Duration,
    max_polls: u32,
    request_timeout: Duration,
}

impl DpsClient {
    pub fn new(config: &DpsConfig) -> Self {
        Self::with_base_url(format!("https://{}", config.endpoint), config)
    }

    pub fn with_base_url(base_url: impl Into<String>, config: &DpsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            id_scope: config.id_scope.clone(),
            registration_id: config.registration_id.clone(),
            symmetric_key: config.symmetric_key.clone(),
            poll_interval: Duration::from_secs(3),
            max_polls: 20,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, n: u32) -> Self {
        self.max_polls = n;
        self
    }

    pub async fn register(&self, model_id: &str) -> Result<DeviceCredentials, ProvisioningError> {
        let token = SasTokenBuilder::new(format!(
            "{}/registrations/{}",
            self.id_scope, self.registration_id
        ))
        .with_key_name("registration")
        .build(&self.symmetric_key)?;

        let url = format!(
            "{}/{}/registrations/{}/register?api-version={API_VERSION}",
            self.base_url, self.id_scope, self.registration_id
        );
        let body = RegisterBody {
            registration_id: &self.registration_id,
            payload: json!({ "modelId": model_id }),
        };

        tracing::info!(registration_id = %self.registration_id, "registering with provisioning service");
        let resp = self
            .http
            .put(&url)
            .header(AUTHORIZATION, &token)
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;
        let (mut operation, mut wait) = self.read_operation(resp).await?;

        let mut polls = 0;
        while matches!(operation.status.as_str(), "assigning" | "unassigned") {
            if polls >= self.max_polls {
                return Err(ProvisioningError::Timeout(polls));
            }
            polls += 1;
            tokio::time::sleep(wait).await;

            let url = format!(
                "{}/{}/registrations/{}/operations/{}?api-version={API_VERSION}",
                self.base_url, self.id_scope, self.registration_id, operation.operation_id
            );
            tracing::debug!(operation_id = %operation.operation_id, poll = polls, "polling registration status");
            let resp = self
                .http
                .get(&url)
                .header(AUTHORIZATION, &token)
                .timeout(self.request_timeout)
                .send()
                .await?;
            (operation, wait) = self.read_operation(resp).await?;
        }

        into_credentials(operation, &self.symmetric_key)
    }

    async fn read_operation(
        &self,
        resp: reqwest::Response,
    ) -> Result<(RegistrationOperation, Duration), ProvisioningError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "provisioning service returned error");
            return Err(ProvisioningError::Status(status.as_u16(), message));
        }
        let wait = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.poll_interval);
        let operation = resp.json().await?;
        Ok((operation, wait))
    }
}

fn into_credentials(
    operation: RegistrationOperation,
    symmetric_key: &str,
) -> Result<DeviceCredentials, ProvisioningError> {
    if operation.status != "assigned" {
        let detail = operation
            .registration_state
            .and_then(|s| s.error_message)
            .unwrap_or_default();
        return Err(ProvisioningError::NotAssigned {
            status: operation.status,
            detail,
        });
    }
    let state = operation.registration_state.unwrap_or_default();
    match (state.assigned_hub, state.device_id) {
        (Some(host_name), Some(device_id)) => Ok(DeviceCredentials {
            host_name,
            device_id,
            shared_access_key: symmetric_key.to_string(),
        }),
        _ => Err(ProvisioningError::NotAssigned {
            status: "assigned".into(),
            detail: "response is missing assignedHub or deviceId".into(),
        }),
    }
}
