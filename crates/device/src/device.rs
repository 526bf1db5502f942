use std::future::Future;

use serde_json::json;
use tokio::sync::mpsc;

use crate::commands::{CommandRegistry, CommandRequest};
use crate::telemetry::{Thermostat, MAX_TEMP_SINCE_LAST_REBOOT, TEMPERATURE};
use crate::transport::{HubTransport, TransportError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub telemetry_sent: u64,
    pub commands_handled: u64,
}

/// Applies readings and answers commands until `shutdown` completes or both
/// input streams close.
pub async fn drive<T, S>(
    transport: &T,
    thermostat: &mut Thermostat,
    commands: &CommandRegistry,
    mut readings: mpsc::Receiver<f64>,
    mut requests: mpsc::Receiver<CommandRequest>,
    shutdown: S,
) -> Result<LoopStats, TransportError>
where
    T: HubTransport,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stats = LoopStats::default();
    let mut readings_open = true;
    let mut requests_open = true;

    while readings_open || requests_open {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            reading = readings.recv(), if readings_open => {
                let Some(reading) = reading else {
                    readings_open = false;
                    continue;
                };
                let raised = thermostat.record(reading);
                transport.send_telemetry(&json!({ TEMPERATURE: reading })).await?;
                stats.telemetry_sent += 1;
                tracing::info!(temperature = reading, avg = thermostat.average(), "telemetry sent");
                if raised {
                    transport
                        .report_properties(&json!({ MAX_TEMP_SINCE_LAST_REBOOT: reading }))
                        .await?;
                }
            }
            request = requests.recv(), if requests_open => {
                let Some(request) = request else {
                    requests_open = false;
                    continue;
                };
                let response = commands.dispatch(&request, thermostat);
                transport.respond(&request.request_id, &response).await?;
                stats.commands_handled += 1;
                tracing::info!(command = %request.name, status = response.status, "command answered");
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{thermostat_commands, CommandResponse, GET_MAX_MIN_REPORT};
    use crate::config::TelemetryConfig;
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        telemetry: Mutex<Vec<Value>>,
        reported: Mutex<Vec<Value>>,
        responses: Mutex<Vec<(String, CommandResponse)>>,
        fail_telemetry: bool,
    }

    impl HubTransport for RecordingTransport {
        async fn send_telemetry(&self, message: &Value) -> Result<(), TransportError> {
            if self.fail_telemetry {
                return Err(TransportError::Connection("offline".into()));
            }
            self.telemetry.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn report_properties(&self, patch: &Value) -> Result<(), TransportError> {
            self.reported.lock().unwrap().push(patch.clone());
            Ok(())
        }

        async fn respond(
            &self,
            request_id: &str,
            response: &CommandResponse,
        ) -> Result<(), TransportError> {
            self.responses
                .lock()
                .unwrap()
                .push((request_id.to_string(), response.clone()));
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn report_request(rid: &str) -> CommandRequest {
        CommandRequest {
            name: GET_MAX_MIN_REPORT.into(),
            request_id: rid.into(),
            payload: None,
        }
    }

    #[tokio::test]
    async fn readings_then_report() {
        let transport = RecordingTransport::default();
        let mut thermostat = Thermostat::new(&TelemetryConfig::default());
        let (reading_tx, reading_rx) = mpsc::channel(16);
        let (request_tx, request_rx) = mpsc::channel(16);

        for v in [20.0, 40.0, 30.0] {
            reading_tx.send(v).await.unwrap();
        }
        request_tx.send(report_request("9")).await.unwrap();
        drop(reading_tx);
        drop(request_tx);

        let stats = drive(
            &transport,
            &mut thermostat,
            &thermostat_commands(),
            reading_rx,
            request_rx,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(stats, LoopStats { telemetry_sent: 3, commands_handled: 1 });
        assert_eq!(
            *transport.telemetry.lock().unwrap(),
            vec![
                json!({ "temperature": 20.0 }),
                json!({ "temperature": 40.0 }),
                json!({ "temperature": 30.0 }),
            ]
        );
        assert_eq!(
            *transport.reported.lock().unwrap(),
            vec![
                json!({ "maxTempSinceLastReboot": 20.0 }),
                json!({ "maxTempSinceLastReboot": 40.0 }),
            ]
        );

        let responses = transport.responses.lock().unwrap();
        let (rid, resp) = &responses[0];
        assert_eq!(rid, "9");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["maxTemp"], 40.0);
        assert_eq!(resp.body["minTemp"], 20.0);
        assert_eq!(resp.body["avgTemp"], 9.0);
    }

    #[tokio::test]
    async fn unknown_command_answered_with_404() {
        let transport = RecordingTransport::default();
        let mut thermostat = Thermostat::new(&TelemetryConfig::default());
        let (reading_tx, reading_rx) = mpsc::channel(1);
        let (request_tx, request_rx) = mpsc::channel(1);
        request_tx
            .send(CommandRequest {
                name: "reboot".into(),
                request_id: "1".into(),
                payload: None,
            })
            .await
            .unwrap();
        drop(reading_tx);
        drop(request_tx);

        drive(
            &transport,
            &mut thermostat,
            &thermostat_commands(),
            reading_rx,
            request_rx,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(transport.responses.lock().unwrap()[0].1.status, 404);
    }

    #[tokio::test]
    async fn closed_streams_end_loop_without_shutdown() {
        let transport = RecordingTransport::default();
        let mut thermostat = Thermostat::new(&TelemetryConfig::default());
        let (reading_tx, reading_rx) = mpsc::channel::<f64>(1);
        let (request_tx, request_rx) = mpsc::channel(1);
        drop(reading_tx);
        drop(request_tx);

        let stats = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            drive(
                &transport,
                &mut thermostat,
                &thermostat_commands(),
                reading_rx,
                request_rx,
                std::future::pending(),
            ),
        )
        .await
        .expect("loop kept running after both streams closed")
        .unwrap();

        assert_eq!(stats, LoopStats::default());
    }

    #[tokio::test]
    async fn reading_below_initial_max_is_not_reported() {
        let transport = RecordingTransport::default();
        let mut thermostat =
            Thermostat::new(&TelemetryConfig::default()).with_reported_max(10.96);
        let (reading_tx, reading_rx) = mpsc::channel(4);
        let (request_tx, request_rx) = mpsc::channel::<CommandRequest>(1);
        for v in [10.0, 10.5, 11.0] {
            reading_tx.send(v).await.unwrap();
        }
        drop(reading_tx);
        drop(request_tx);

        drive(
            &transport,
            &mut thermostat,
            &thermostat_commands(),
            reading_rx,
            request_rx,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(transport.telemetry.lock().unwrap().len(), 3);
        assert_eq!(
            *transport.reported.lock().unwrap(),
            vec![json!({ "maxTempSinceLastReboot": 11.0 })]
        );
    }

    #[tokio::test]
    async fn shutdown_stops_loop() {
        let transport = RecordingTransport::default();
        let mut thermostat = Thermostat::new(&TelemetryConfig::default());
        let (_reading_tx, reading_rx) = mpsc::channel::<f64>(1);
        let (_request_tx, request_rx) = mpsc::channel(1);

        let stats = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            drive(
                &transport,
                &mut thermostat,
                &thermostat_commands(),
                reading_rx,
                request_rx,
                async {},
            ),
        )
        .await
        .expect("loop did not stop")
        .unwrap();

        assert_eq!(stats, LoopStats::default());
    }

    #[tokio::test]
    async fn telemetry_failure_ends_loop() {
        let transport = RecordingTransport {
            fail_telemetry: true,
            ..Default::default()
        };
        let mut thermostat = Thermostat::new(&TelemetryConfig::default());
        let (reading_tx, reading_rx) = mpsc::channel(1);
        let (_request_tx, request_rx) = mpsc::channel(1);
        reading_tx.send(25.0).await.unwrap();

        let err = drive(
            &transport,
            &mut thermostat,
            &thermostat_commands(),
            reading_rx,
            request_rx,
            std::future::pending(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("offline"));
        assert_eq!(thermostat.max(), Some(25.0));
    }
}
