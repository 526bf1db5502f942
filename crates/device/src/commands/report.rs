use chrono::Utc;
use serde_json::Value;

use super::dispatch::{CommandHandler, CommandResponse};
use crate::telemetry::Thermostat;

pub const GET_MAX_MIN_REPORT: &str = "getMaxMinReport";

pub struct MaxMinReportCommand;

impl CommandHandler for MaxMinReportCommand {
    fn handle(&self, thermostat: &Thermostat, payload: Option<&Value>) -> CommandResponse {
        if let Some(since) = payload {
            tracing::info!(%since, "max/min report requested from the given time to now");
        }
        let report = thermostat.report(Utc::now());
        tracing::info!(?report, "generated max/min report");
        match serde_json::to_value(&report) {
            Ok(body) => CommandResponse::ok(body),
            Err(e) => {
                tracing::error!(error = %e, "report serialization failed");
                CommandResponse {
                    status: 500,
                    body: Value::Object(Default::default()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryConfig;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn report_has_expected_fields() {
        let mut t = Thermostat::new(&TelemetryConfig::default());
        t.record(12.0);
        t.record(48.0);

        let resp = MaxMinReportCommand.handle(&t, Some(&json!("2026-10-19T00:00:00Z")));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["maxTemp"], 48.0);
        assert_eq!(resp.body["minTemp"], 12.0);
        assert_eq!(resp.body["avgTemp"], 6.0);
    }

    #[test]
    fn window_spans_size_times_interval() {
        let t = Thermostat::new(&TelemetryConfig {
            interval_seconds: 8,
            window_size: 10,
            ..Default::default()
        });
        let resp = MaxMinReportCommand.handle(&t, None);
        let start = DateTime::parse_from_rfc3339(resp.body["startTime"].as_str().unwrap()).unwrap();
        let end = DateTime::parse_from_rfc3339(resp.body["endTime"].as_str().unwrap()).unwrap();
        assert_eq!((end - start).num_seconds(), 80);
    }

    #[test]
    fn since_argument_is_not_validated() {
        let t = Thermostat::new(&TelemetryConfig::default());
        let resp = MaxMinReportCommand.handle(&t, Some(&json!({ "garbage": true })));
        assert_eq!(resp.status, 200);
    }
}
