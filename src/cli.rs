use std::time::Duration;

use clap::Parser;

use crate::frames::mac_addr::MacAddr;
use crate::frames::probe_frame::{HEADER_LEN, MAX_FRAME_LEN};
use crate::prober::session::ProbeConfig;

/// Layer-2 ping: sends echo frames to a MAC address and measures replies
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ProberArgs {
    /// Destination MAC address (xx:xx:xx:xx:xx:xx)
    #[arg(value_name = "DSTMAC")]
    pub destination: MacAddr,
    /// Outgoing interface name
    #[arg(short, long)]
    pub interface: String,
    /// Number of frames to send (0 means until interrupted)
    #[arg(short, long, default_value_t = 0)]
    pub count: u32,
    /// Size of each probe frame (bytes)
    #[arg(
        short,
        long,
        default_value_t = 64,
        value_parser = clap::value_parser!(u16).range(HEADER_LEN as i64..=MAX_FRAME_LEN as i64)
    )]
    pub size: u16,
    /// Interval between probes (seconds)
    #[arg(short = 'I', long, default_value = "1", value_parser = parse_seconds)]
    pub interval: Duration,
    /// Time to wait for each reply (seconds)
    #[arg(short = 'T', long, default_value = "1", value_parser = parse_seconds)]
    pub timeout: Duration,
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ProberArgs {
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            destination: self.destination,
            count: self.count,
            size: usize::from(self.size),
            interval: self.interval,
            timeout: self.timeout,
        }
    }
}

/// Layer-2 ping responder: answers echo frames on the given interfaces
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
pub struct ResponderArgs {
    /// Interfaces to answer on
    #[arg(value_name = "INTERFACE")]
    pub interfaces: Vec<String>,
    /// Print help
    #[arg(short, long)]
    pub help: bool,
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parses a non-negative number of seconds, rounded to whole milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("'{s}' is not a valid number of seconds"));
    }
    let millis = (seconds * 1000.0).round() as u64;
    Ok(Duration::from_millis(millis))
}
