mod client;
mod error;
pub mod topics;
mod traits;

pub use client::{HubClient, HubConnection};
pub use error::TransportError;
pub use traits::HubTransport;
