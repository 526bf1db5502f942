pub mod connection_string;
pub mod crypto;
pub mod sas;

pub use connection_string::{ConnectionString, ConnectionStringError};
pub use sas::{SasError, SasTokenBuilder};
