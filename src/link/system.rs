use network_interface::{NetworkInterface, NetworkInterfaceConfig};

use crate::error::Error;
use crate::frames::mac_addr::MacAddr;
use crate::link::raw_channel::RawChannel;
use crate::link::{Interface, LinkLayer};

/// The host's own link layer.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemLink;

impl LinkLayer for SystemLink {
    type Channel = RawChannel;

    fn resolve_interface(&self, name: &str) -> Result<Interface, Error> {
        let devices = NetworkInterface::show().map_err(|e| Error::Interfaces(e.to_string()))?;
        find_interface(devices, name)
    }

    fn local_mac(&self, interface: &Interface) -> Result<MacAddr, Error> {
        mac_of(interface)
    }

    fn open_channel(&self, interface: &Interface, ethertype: u16) -> Result<RawChannel, Error> {
        RawChannel::open(interface, ethertype).map_err(|source| Error::Channel {
            name: interface.name.clone(),
            source,
        })
    }
}

fn find_interface(devices: Vec<NetworkInterface>, name: &str) -> Result<Interface, Error> {
    devices
        .into_iter()
        .find(|device| device.name == name)
        .map(|device| Interface {
            name: device.name,
            index: device.index,
            hw_addr: device.mac_addr,
        })
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// Parses the reported hardware address; interfaces without one (or with an all-zero one)
/// can't be used.
fn mac_of(interface: &Interface) -> Result<MacAddr, Error> {
    interface
        .hw_addr
        .as_deref()
        .and_then(|hw_addr| hw_addr.parse::<MacAddr>().ok())
        .filter(|mac| !mac.is_zero())
        .ok_or_else(|| Error::NoMacAddress(interface.name.clone()))
}
