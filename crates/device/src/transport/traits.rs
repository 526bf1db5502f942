use std::future::Future;

use serde_json::Value;

use super::error::TransportError;
use crate::commands::CommandResponse;

/// Outbound half of a hub connection.
pub trait HubTransport: Send + Sync {
    fn send_telemetry(&self, message: &Value) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn report_properties(&self, patch: &Value) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn respond(
        &self,
        request_id: &str,
        response: &CommandResponse,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn disconnect(&self) -> impl Future<Output = Result<(), TransportError>> + Send;
}
