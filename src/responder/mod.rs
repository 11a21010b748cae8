use std::fmt::{Display, Formatter};

use tokio_util::sync::CancellationToken;

use crate::frames::mac_addr::MacAddr;
use crate::frames::probe_frame::{FrameKind, ProbeFrame, MAX_FRAME_LEN};
use crate::link::wait::{wait_for_frame, Wait, POLL_SLICE};
use crate::link::FrameChannel;

pub mod supervisor;

/// Counters kept by a responder over its lifetime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponderStats {
    pub received: u64,
    pub replied: u64,
    pub discarded: u64,
    pub failed: u64,
}

impl Display for ResponderStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frame(s) received, {} replied, {} discarded, {} failed",
            self.received, self.replied, self.discarded, self.failed
        )
    }
}

/// Answers echo frames arriving on a single interface.
///
/// Owns its channel exclusively; the only state shared with other responders is the
/// cancellation token.
pub struct Responder<C> {
    name: String,
    local_mac: MacAddr,
    channel: C,
    cancel: CancellationToken,
    stats: ResponderStats,
}

impl<C: FrameChannel> Responder<C> {
    pub fn new(name: String, local_mac: MacAddr, channel: C, cancel: CancellationToken) -> Self {
        Self {
            name,
            local_mac,
            channel,
            cancel,
            stats: ResponderStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listens until cancelled, mirroring every valid echo back out the same channel.
    ///
    /// Failures to reply are logged and never stop the loop.
    pub async fn run(mut self) -> ResponderStats {
        tracing::info!("answering on {} ({})", self.name, self.local_mac);
        let mut buf = vec![0; MAX_FRAME_LEN];

        loop {
            let len = match wait_for_frame(&self.channel, &mut buf, POLL_SLICE, &self.cancel).await
            {
                Wait::Frame(len) => len,
                Wait::Idle => continue,
                Wait::Cancelled => break,
            };
            self.stats.received += 1;

            let Some(reply) = self.reply_for(&buf[..len]) else {
                self.stats.discarded += 1;
                continue;
            };

            match self.channel.send(&reply).await {
                Ok(_) => self.stats.replied += 1,
                Err(err) => {
                    self.stats.failed += 1;
                    tracing::warn!("failed to write reply frame on {}: {err}", self.name);
                }
            }
        }

        tracing::info!("responder for {} stopped: {}", self.name, self.stats);
        self.stats
    }

    /// Builds the reply to `frame`, if it is an echo this responder should answer.
    ///
    /// Only echoes sent to this interface's address or to broadcast are answered; a socket in
    /// promiscuous mode also delivers frames meant for other hosts. The reply is the echo byte
    /// for byte, with only the addresses and the type rewritten.
    pub fn reply_for(&self, frame: &[u8]) -> Option<Vec<u8>> {
        let echo = match ProbeFrame::decode(frame) {
            Ok(echo) => echo,
            Err(reason) => {
                tracing::debug!("discarding frame on {}: {reason}", self.name);
                return None;
            }
        };
        if echo.kind != FrameKind::Echo {
            return None;
        }
        if echo.dst != self.local_mac && !echo.dst.is_broadcast() {
            tracing::debug!("ignoring echo for {} on {}", echo.dst, self.name);
            return None;
        }

        let mut reply = frame.to_vec();
        echo.reply_from(self.local_mac).write_header(&mut reply);
        Some(reply)
    }
}
