use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use crate::cli::Args;
use crate::commands::thermostat_commands;
use crate::config::{self, DeviceConfig};
use crate::device;
use crate::provisioning;
use crate::scheduler::{ScheduledTask, TaskHandle};
use crate::telemetry::{SimulatedThermometer, Thermostat, MAX_TEMP_SINCE_LAST_REBOOT};
use crate::transport::{HubClient, HubConnection, HubTransport};

pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match args.config {
        Some(ref path) => config::load_from_file(path)?,
        None => DeviceConfig::default(),
    };
    let security = config::resolve_security(&args.connection)?;

    tracing::info!(
        model_id = %config.model_id,
        interval_s = config.telemetry.interval_seconds,
        window = config.telemetry.window_size,
        "device configured"
    );

    let credentials = provisioning::obtain_credentials(&security, &config.model_id).await?;

    let HubConnection {
        client,
        commands: requests,
        event_loop,
    } = HubClient::connect(
        &credentials,
        &config.model_id,
        Duration::from_secs(config.sas_token_ttl_seconds),
    )
    .await?;

    client
        .report_properties(&json!({
            MAX_TEMP_SINCE_LAST_REBOOT: config.max_temp_since_last_reboot
        }))
        .await?;

    let (readings_tx, readings_rx) = mpsc::channel(16);
    let sampler = spawn_sampler(&config, readings_tx);
    tracing::info!("sending telemetry for temperature");

    let mut thermostat =
        Thermostat::new(&config.telemetry).with_reported_max(config.max_temp_since_last_reboot);
    let outcome = device::drive(
        &client,
        &mut thermostat,
        &thermostat_commands(),
        readings_rx,
        requests,
        crate::shutdown::wait_for_shutdown(),
    )
    .await;

    tracing::info!("shutting down");
    shut_down(sampler, &client).await;
    if tokio::time::timeout(Duration::from_secs(5), event_loop).await.is_err() {
        tracing::warn!("hub event loop did not stop in time");
    }

    let stats = outcome?;
    tracing::info!(
        telemetry_sent = stats.telemetry_sent,
        commands_handled = stats.commands_handled,
        "device stopped"
    );
    Ok(())
}

/// Stops the sampler before the hub session is closed.
pub async fn shut_down<T: HubTransport>(sampler: TaskHandle, transport: &T) {
    sampler.stop().await;
    if let Err(e) = transport.disconnect().await {
        tracing::warn!(error = %e, "disconnect failed");
    }
}

fn spawn_sampler(config: &DeviceConfig, tx: mpsc::Sender<f64>) -> TaskHandle {
    let sensor = Arc::new(SimulatedThermometer::new(
        config.telemetry.min_temp,
        config.telemetry.max_temp,
    ));
    ScheduledTask {
        interval: Duration::from_secs(config.telemetry.interval_seconds),
        sensor,
    }
    .spawn(tx)
}
