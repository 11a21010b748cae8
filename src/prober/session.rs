use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::error::Error;
use crate::frames::mac_addr::MacAddr;
use crate::frames::probe_frame::{HEADER_LEN, MAX_FRAME_LEN};
use crate::link::Interface;

pub const DEFAULT_SIZE: usize = 64;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Operator-chosen parameters of a probe run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    pub destination: MacAddr,
    /// Number of probes to send; 0 means until interrupted.
    pub count: u32,
    /// Bytes per echo frame, header included.
    pub size: usize,
    pub interval: Duration,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(destination: MacAddr) -> Self {
        Self {
            destination,
            count: 0,
            size: DEFAULT_SIZE,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(HEADER_LEN..=MAX_FRAME_LEN).contains(&self.size) {
            return Err(Error::Config(format!(
                "frame size must be between {HEADER_LEN} and {MAX_FRAME_LEN} bytes (got {})",
                self.size
            )));
        }
        Ok(())
    }
}

/// Sent/received counters of a probe run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub sent: u32,
    pub received: u32,
}

impl Statistics {
    /// Percentage of probes left unanswered (0 when nothing was sent).
    pub fn loss(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        f64::from(self.sent - self.received) / f64::from(self.sent) * 100.0
    }

    /// Process exit status: the loss percentage rounded to an integer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn exit_code(&self) -> i32 {
        self.loss().round() as i32
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frame(s) sent, {} frame(s) received, {:.2}% lost",
            self.sent,
            self.received,
            self.loss()
        )
    }
}

/// State of one client run against a fixed destination.
#[derive(Clone, Debug)]
pub struct ProbeSession {
    pub config: ProbeConfig,
    pub interface: Interface,
    /// Address of the local interface, used as source and origin of every echo.
    pub source: MacAddr,
    pub stats: Statistics,
    sequence: u16,
}

impl ProbeSession {
    pub fn new(config: ProbeConfig, interface: Interface, source: MacAddr) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            interface,
            source,
            stats: Statistics::default(),
            sequence: 0,
        })
    }

    /// Sequence number of the next probe: 1 for the first one, then increasing.
    ///
    /// The 16-bit counter wraps after 65535.
    pub fn next_sequence(&mut self) -> u16 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    /// Whether the configured number of probes has been sent.
    pub fn is_exhausted(&self) -> bool {
        self.config.count > 0 && self.stats.sent >= self.config.count
    }
}
