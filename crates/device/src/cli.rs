use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "pnp_thermostat",
    version,
    about = "Simulated Plug and Play thermostat device"
)]
pub struct Args {
    /// Optional YAML file with telemetry and model settings
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectionArgs {
    /// Connection strategy: `connectionString` or `DPS`
    #[arg(long, env = "IOTHUB_DEVICE_SECURITY_TYPE", value_name = "type")]
    pub security_type: Option<String>,

    /// Device connection string
    #[arg(
        long,
        env = "IOTHUB_DEVICE_CONNECTION_STRING",
        value_name = "str",
        hide_env_values = true
    )]
    pub connection_string: Option<String>,

    /// Provisioning service host
    #[arg(long, env = "IOTHUB_DEVICE_DPS_ENDPOINT", value_name = "host")]
    pub dps_endpoint: Option<String>,

    /// Provisioning id scope
    #[arg(long, env = "IOTHUB_DEVICE_DPS_ID_SCOPE", value_name = "scope")]
    pub dps_id_scope: Option<String>,

    /// Registration id used with the provisioning service
    #[arg(long, env = "IOTHUB_DEVICE_DPS_DEVICE_ID", value_name = "id")]
    pub dps_device_id: Option<String>,

    /// Base64 symmetric key for provisioning
    #[arg(
        long,
        env = "IOTHUB_DEVICE_DPS_DEVICE_KEY",
        value_name = "key",
        hide_env_values = true
    )]
    pub dps_device_key: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from([
            "pnp_thermostat",
            "--config",
            "/etc/thermostat.yml",
            "--security-type",
            "DPS",
            "--dps-id-scope",
            "0ne000A1B2C",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/thermostat.yml")));
        assert_eq!(args.connection.security_type.as_deref(), Some("DPS"));
        assert_eq!(args.connection.dps_id_scope.as_deref(), Some("0ne000A1B2C"));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
