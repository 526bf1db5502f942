use pnp_device::{cli, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("thermostat device starting");

    let args = cli::parse();
    let code = match run::run(args).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "device failed");
            1
        }
    };

    // the console thread may still be blocked on stdin, so skip the
    // runtime's wait for blocking tasks
    std::process::exit(code);
}
