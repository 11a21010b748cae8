//! Layer-2 reachability probing.
//!
//! A prober sends echo frames with a dedicated EtherType straight to a MAC address;
//! a responder listening on one or more interfaces mirrors every valid echo back.
//! No IP is involved, so the probe only tells whether the switching layer delivers.

pub mod cli;
pub mod error;
pub mod frames;
pub mod link;
pub mod logging;
pub mod prober;
pub mod responder;
pub mod shutdown;

pub use error::Error;
