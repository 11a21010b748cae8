pub mod mac_addr;
pub mod probe_frame;
