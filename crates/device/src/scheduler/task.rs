use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::telemetry::Sensor;

pub struct ScheduledTask {
    pub interval: Duration,
    pub sensor: Arc<dyn Sensor>,
}

pub struct TaskHandle {
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Aborts the sampler and waits until it has gone away.
    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

impl ScheduledTask {
    pub fn spawn(self, tx: mpsc::Sender<f64>) -> TaskHandle {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let reading = self.sensor.sample();
                tracing::trace!(reading, "sampled");
                if tx.send(reading).await.is_err() {
                    break;
                }
            }
        });
        TaskHandle { handle }
    }
}
