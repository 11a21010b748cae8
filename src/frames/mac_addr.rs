pub use pnet_base::MacAddr;

/// Length of an Ethernet hardware address.
pub const MAC_LEN: usize = 6;

/// Reads an address from the first six bytes of `bytes`.
pub(crate) fn mac_from_slice(bytes: &[u8]) -> MacAddr {
    let mut octets = [0; MAC_LEN];
    octets.copy_from_slice(&bytes[..MAC_LEN]);
    MacAddr::from(octets)
}
