mod extremes;
mod sensor;
mod thermostat;
mod window;

pub use extremes::RunningExtremes;
pub use sensor::{Sensor, SimulatedThermometer};
pub use thermostat::{MaxMinReport, Thermostat};
pub use window::MovingWindow;

pub const TEMPERATURE: &str = "temperature";
pub const MAX_TEMP_SINCE_LAST_REBOOT: &str = "maxTempSinceLastReboot";
