pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod device;
pub mod provisioning;
pub mod run;
pub mod scheduler;
pub mod shutdown;
pub mod telemetry;
pub mod transport;
