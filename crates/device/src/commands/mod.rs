mod dispatch;
mod report;

pub use dispatch::{CommandHandler, CommandRegistry, CommandRequest, CommandResponse};
pub use report::{MaxMinReportCommand, GET_MAX_MIN_REPORT};

/// Registry with every command the thermostat model declares.
pub fn thermostat_commands() -> CommandRegistry {
    CommandRegistry::new().register(GET_MAX_MIN_REPORT, MaxMinReportCommand)
}
