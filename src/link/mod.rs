use std::future::Future;
use std::io;

use crate::error::Error;
use crate::frames::mac_addr::MacAddr;

#[cfg(test)]
pub mod memory;
#[cfg(target_os = "linux")]
pub mod raw_channel;
#[cfg(target_os = "linux")]
pub mod system;
pub mod wait;

/// A bidirectional channel carrying whole link-layer frames on one interface.
///
/// Each call moves exactly one frame; a successful call returns its length in bytes.
pub trait FrameChannel: Send + Sync + 'static {
    fn send(&self, frame: &[u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Receives the next frame into `buf`, truncating it if it doesn't fit.
    ///
    /// Dropping the returned future before completion must not lose a frame.
    fn recv(&self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;
}

/// A network interface resolved by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub index: u32,
    /// Hardware address as reported by the OS, if any.
    pub hw_addr: Option<String>,
}

/// Access to the OS link layer: interface lookup, address discovery and raw channels.
pub trait LinkLayer {
    type Channel: FrameChannel;

    fn resolve_interface(&self, name: &str) -> Result<Interface, Error>;

    fn local_mac(&self, interface: &Interface) -> Result<MacAddr, Error>;

    /// Opens a channel on `interface` that only carries frames of the given EtherType.
    fn open_channel(&self, interface: &Interface, ethertype: u16) -> Result<Self::Channel, Error>;
}
