/// Completes on the console quit key, Ctrl-C, or SIGTERM.
pub async fn wait_for_shutdown() {
    tokio::select! {
        _ = crate::console::wait_for_quit() => tracing::info!("quit requested from console"),
        _ = wait_for_signal() => tracing::info!("termination signal received"),
    }
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                return ctrl_c().await;
            }
        };
        tokio::select! {
            _ = ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::Duration;

    async fn signal_ends_wait(name: &str) -> bool {
        let waiter = tokio::spawn(wait_for_signal());
        // let the waiter install its handlers before the signal arrives
        tokio::time::sleep(Duration::from_millis(100)).await;
        let status = Command::new("kill")
            .args([name, &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
        tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .is_ok()
    }

    #[tokio::test]
    async fn sigterm_and_ctrl_c_end_wait() {
        assert!(signal_ends_wait("-TERM").await, "SIGTERM ignored");
        assert!(signal_ends_wait("-INT").await, "SIGINT ignored");
    }
}
