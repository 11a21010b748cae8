use std::io;

/// Configuration, setup and transmission failures.
///
/// Protocol validation failures are not errors: see [`crate::frames::probe_frame::RejectReason`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("cannot list network interfaces: {0}")]
    Interfaces(String),
    #[error("interface '{0}' not found")]
    InterfaceNotFound(String),
    #[error("cannot get mac address of '{0}'")]
    NoMacAddress(String),
    #[error("cannot open raw channel on '{name}': {source}")]
    Channel { name: String, source: io::Error },
    #[error("failed to transmit on '{name}': {source}")]
    Transmit { name: String, source: io::Error },
}
