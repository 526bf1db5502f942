use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, Transport};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::TransportError;
use super::topics;
use super::traits::HubTransport;
use crate::commands::{CommandRequest, CommandResponse};
use crate::provisioning::DeviceCredentials;
use pnp_common::SasTokenBuilder;

const MQTT_TLS_PORT: u16 = 8883;
const KEEP_ALIVE: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// MQTT session with the hub.
pub struct HubClient {
    client: AsyncClient,
    device_id: String,
    next_rid: AtomicU64,
}

/// A live session plus the incoming command stream. The `event_loop` task
/// ends once [`HubTransport::disconnect`] has been sent.
pub struct HubConnection {
    pub client: HubClient,
    pub commands: mpsc::Receiver<CommandRequest>,
    pub event_loop: JoinHandle<()>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Inbound {
    Command(CommandRequest),
    TwinResponse { status: u16, request_id: String },
    Unhandled,
}

impl HubClient {
    pub async fn connect(
        credentials: &DeviceCredentials,
        model_id: &str,
        token_ttl: Duration,
    ) -> Result<HubConnection, TransportError> {
        let resource = format!(
            "{}/devices/{}",
            credentials.host_name, credentials.device_id
        );
        let password = SasTokenBuilder::new(resource)
            .with_ttl(token_ttl)
            .build(&credentials.shared_access_key)?;

        let mut opts = MqttOptions::new(
            credentials.device_id.clone(),
            credentials.host_name.clone(),
            MQTT_TLS_PORT,
        );
        opts.set_keep_alive(KEEP_ALIVE);
        opts.set_credentials(
            topics::username(&credentials.host_name, &credentials.device_id, model_id),
            password,
        );
        opts.set_transport(Transport::tls_with_default_config());

        let (client, mut eventloop) = AsyncClient::new(opts, 64);
        client
            .subscribe(topics::METHODS_SUBSCRIPTION, QoS::AtMostOnce)
            .await?;
        client
            .subscribe(topics::TWIN_RESPONSE_SUBSCRIPTION, QoS::AtMostOnce)
            .await?;

        tokio::time::timeout(CONNECT_TIMEOUT, wait_for_connack(&mut eventloop))
            .await
            .map_err(|_| TransportError::Connection("timed out waiting for CONNACK".into()))??;

        tracing::info!(
            host = %credentials.host_name,
            device_id = %credentials.device_id,
            model_id,
            "connected to hub"
        );

        let (tx, rx) = mpsc::channel(16);
        let event_loop = tokio::spawn(drive_events(eventloop, tx));

        Ok(HubConnection {
            client: HubClient {
                client,
                device_id: credentials.device_id.clone(),
                next_rid: AtomicU64::new(1),
            },
            commands: rx,
            event_loop,
        })
    }
}

impl HubTransport for HubClient {
    async fn send_telemetry(&self, message: &Value) -> Result<(), TransportError> {
        let body = serde_json::to_vec(message)?;
        self.client
            .publish(
                topics::telemetry_topic(&self.device_id),
                QoS::AtLeastOnce,
                false,
                body,
            )
            .await?;
        Ok(())
    }

    async fn report_properties(&self, patch: &Value) -> Result<(), TransportError> {
        let rid = self.next_rid.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(patch)?;
        self.client
            .publish(
                topics::reported_properties_topic(rid),
                QoS::AtMostOnce,
                false,
                body,
            )
            .await?;
        tracing::debug!(rid, "reported properties sent");
        Ok(())
    }

    async fn respond(
        &self,
        request_id: &str,
        response: &CommandResponse,
    ) -> Result<(), TransportError> {
        let body = serde_json::to_vec(&response.body)?;
        self.client
            .publish(
                topics::method_response_topic(response.status, request_id),
                QoS::AtMostOnce,
                false,
                body,
            )
            .await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.client.disconnect().await?;
        tracing::info!(device_id = %self.device_id, "disconnect requested");
        Ok(())
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), TransportError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(()),
            Ok(_) => {}
            Err(e) => return Err(TransportError::Connection(e.to_string())),
        }
    }
}

async fn drive_events(mut eventloop: EventLoop, commands: mpsc::Sender<CommandRequest>) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match classify(&publish.topic, &publish.payload) {
                    Inbound::Command(request) => {
                        tracing::info!(
                            command = %request.name,
                            rid = %request.request_id,
                            "command received"
                        );
                        if commands.send(request).await.is_err() {
                            break;
                        }
                    }
                    Inbound::TwinResponse { status, request_id } => {
                        if status >= 300 {
                            tracing::warn!(status, rid = %request_id, "reported properties rejected");
                        } else {
                            tracing::debug!(status, rid = %request_id, "reported properties accepted");
                        }
                    }
                    Inbound::Unhandled => {
                        tracing::debug!(topic = %publish.topic, "ignoring message");
                    }
                }
            }
            Ok(Event::Outgoing(rumqttc::Outgoing::Disconnect)) => {
                tracing::debug!("disconnect sent");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "hub connection closed");
                break;
            }
        }
    }
}

pub(crate) fn classify(topic: &str, payload: &[u8]) -> Inbound {
    if let Some((name, request_id)) = topics::parse_method_request(topic) {
        return Inbound::Command(CommandRequest {
            name,
            request_id,
            payload: decode_payload(payload),
        });
    }
    if let Some((status, request_id)) = topics::parse_twin_response(topic) {
        return Inbound::TwinResponse { status, request_id };
    }
    Inbound::Unhandled
}

fn decode_payload(payload: &[u8]) -> Option<Value> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(payload) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(payload).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumqttc::{Publish, Request};
    use serde_json::json;

    fn detached_client() -> (HubClient, flume::Receiver<Request>) {
        let (tx, rx) = flume::bounded(8);
        let client = HubClient {
            client: AsyncClient::from_senders(tx),
            device_id: "t1".into(),
            next_rid: AtomicU64::new(1),
        };
        (client, rx)
    }

    fn next_publish(rx: &flume::Receiver<Request>) -> Publish {
        match rx.try_recv().unwrap() {
            Request::Publish(publish) => publish,
            other => panic!("expected publish, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn telemetry_published_at_least_once() {
        let (client, rx) = detached_client();
        client
            .send_telemetry(&json!({ "temperature": 21.5 }))
            .await
            .unwrap();

        let publish = next_publish(&rx);
        assert_eq!(publish.topic, topics::telemetry_topic("t1"));
        assert_eq!(publish.qos, QoS::AtLeastOnce);
        assert!(!publish.retain);
        let body: Value = serde_json::from_slice(&publish.payload).unwrap();
        assert_eq!(body, json!({ "temperature": 21.5 }));
    }

    #[tokio::test]
    async fn command_response_uses_status_and_rid() {
        let (client, rx) = detached_client();
        client
            .respond("7", &CommandResponse::not_found())
            .await
            .unwrap();

        let publish = next_publish(&rx);
        assert_eq!(publish.topic, "$iothub/methods/res/404/?$rid=7");
        assert_eq!(publish.qos, QoS::AtMostOnce);
        assert_eq!(&publish.payload[..], b"{}");
    }

    #[tokio::test]
    async fn reported_properties_get_fresh_request_ids() {
        let (client, rx) = detached_client();
        let patch = json!({ "maxTempSinceLastReboot": 10.96 });
        client.report_properties(&patch).await.unwrap();
        client.report_properties(&patch).await.unwrap();

        assert_eq!(next_publish(&rx).topic, topics::reported_properties_topic(1));
        let second = next_publish(&rx);
        assert_eq!(second.topic, topics::reported_properties_topic(2));
        let body: Value = serde_json::from_slice(&second.payload).unwrap();
        assert_eq!(body, patch);
    }

    #[tokio::test]
    async fn disconnect_is_queued() {
        let (client, rx) = detached_client();
        client.disconnect().await.unwrap();
        assert!(matches!(rx.try_recv(), Ok(Request::Disconnect(_))));
    }

    #[test]
    fn command_with_json_payload() {
        let inbound = classify(
            "$iothub/methods/POST/getMaxMinReport/?$rid=5",
            br#""2026-10-19T10:00:00Z""#,
        );
        assert_eq!(
            inbound,
            Inbound::Command(CommandRequest {
                name: "getMaxMinReport".into(),
                request_id: "5".into(),
                payload: Some(json!("2026-10-19T10:00:00Z")),
            })
        );
    }

    #[test]
    fn command_without_payload() {
        let Inbound::Command(req) = classify("$iothub/methods/POST/getMaxMinReport/?$rid=6", b"")
        else {
            panic!("expected command");
        };
        assert_eq!(req.payload, None);
    }

    #[test]
    fn non_json_payload_kept_as_string() {
        let Inbound::Command(req) = classify("$iothub/methods/POST/x/?$rid=1", b"yesterday") else {
            panic!("expected command");
        };
        assert_eq!(req.payload, Some(json!("yesterday")));
    }

    #[test]
    fn twin_response_classified() {
        assert_eq!(
            classify("$iothub/twin/res/204/?$rid=1&$version=2", b""),
            Inbound::TwinResponse {
                status: 204,
                request_id: "1".into()
            }
        );
    }

    #[test]
    fn other_topics_unhandled() {
        assert_eq!(
            classify("devices/t1/messages/devicebound/x", b"{}"),
            Inbound::Unhandled
        );
    }
}
