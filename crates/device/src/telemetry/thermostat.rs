use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::extremes::RunningExtremes;
use super::window::MovingWindow;
use crate::config::TelemetryConfig;

/// Sensor state owned by the device loop.
#[derive(Debug, Clone)]
pub struct Thermostat {
    window: MovingWindow,
    extremes: RunningExtremes,
    reported_max: Option<f64>,
    interval_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxMinReport {
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub avg_temp: f64,
    pub start_time: String,
    pub end_time: String,
}

impl Thermostat {
    pub fn new(cfg: &TelemetryConfig) -> Self {
        Self {
            window: MovingWindow::new(cfg.window_size),
            extremes: RunningExtremes::new(),
            reported_max: None,
            interval_seconds: cfg.interval_seconds,
        }
    }

    /// Seeds the `maxTempSinceLastReboot` value already reported to the hub.
    pub fn with_reported_max(mut self, value: f64) -> Self {
        self.reported_max = Some(value);
        self
    }

    /// Returns `true` when the reading raises the reported maximum.
    pub fn record(&mut self, reading: f64) -> bool {
        self.extremes.observe(reading);
        self.window.push(reading);
        let raised = self.reported_max.map_or(true, |max| reading > max);
        if raised {
            self.reported_max = Some(reading);
        }
        raised
    }

    pub fn reported_max(&self) -> Option<f64> {
        self.reported_max
    }

    pub fn max(&self) -> Option<f64> {
        self.extremes.max()
    }

    pub fn min(&self) -> Option<f64> {
        self.extremes.min()
    }

    pub fn average(&self) -> f64 {
        self.window.average()
    }

    pub fn window_span(&self) -> chrono::Duration {
        let secs = (self.window.capacity() as u64).saturating_mul(self.interval_seconds);
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn report(&self, now: DateTime<Utc>) -> MaxMinReport {
        let start = now
            .checked_sub_signed(self.window_span())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        MaxMinReport {
            max_temp: self.max(),
            min_temp: self.min(),
            avg_temp: self.average(),
            start_time: start.to_rfc3339_opts(SecondsFormat::Micros, true),
            end_time: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}
