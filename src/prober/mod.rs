//! Client side: sends sequential echo frames and waits for the matching replies.
//!
//! Each probe goes `SENDING -> AWAITING_REPLY -> (MATCHED | TIMED_OUT)`; the next one is
//! only sent once the current one is resolved, so at most one probe is ever in flight.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::frames::mac_addr::MacAddr;
use crate::frames::probe_frame::{FrameKind, ProbeFrame, MAX_FRAME_LEN};
use crate::link::wait::{sleep_or_cancel, wait_for_frame, Wait, POLL_SLICE};
use crate::link::FrameChannel;
use crate::prober::session::{ProbeSession, Statistics};

pub mod session;

/// How a single probe was resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum ProbeOutcome {
    Matched {
        sequence: u16,
        from: MacAddr,
        bytes: usize,
        rtt: Duration,
        waited: Duration,
    },
    TimedOut {
        sequence: u16,
        waited: Duration,
    },
    /// Cancellation arrived while the reply was awaited.
    Interrupted {
        sequence: u16,
        waited: Duration,
    },
}

impl ProbeOutcome {
    /// Time spent awaiting the reply.
    pub fn waited(&self) -> Duration {
        match self {
            ProbeOutcome::Matched { waited, .. }
            | ProbeOutcome::TimedOut { waited, .. }
            | ProbeOutcome::Interrupted { waited, .. } => *waited,
        }
    }

    pub fn sequence(&self) -> u16 {
        match self {
            ProbeOutcome::Matched { sequence, .. }
            | ProbeOutcome::TimedOut { sequence, .. }
            | ProbeOutcome::Interrupted { sequence, .. } => *sequence,
        }
    }
}

impl Display for ProbeOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Matched {
                sequence,
                from,
                bytes,
                rtt,
                ..
            } => write!(
                f,
                "{bytes} bytes from {from} seq={sequence} time={:.2} ms",
                rtt.as_secs_f64() * 1000.0
            ),
            ProbeOutcome::TimedOut { sequence, .. } => write!(f, "timeout for seq {sequence}"),
            ProbeOutcome::Interrupted { sequence, .. } => {
                write!(f, "interrupted at seq {sequence}")
            }
        }
    }
}

pub struct Prober<C> {
    session: ProbeSession,
    channel: C,
    cancel: CancellationToken,
    buf: Vec<u8>,
}

impl<C: FrameChannel> Prober<C> {
    pub fn new(session: ProbeSession, channel: C, cancel: CancellationToken) -> Self {
        Self {
            session,
            channel,
            cancel,
            buf: vec![0; MAX_FRAME_LEN],
        }
    }

    pub fn session(&self) -> &ProbeSession {
        &self.session
    }

    /// Runs probes until the configured count is reached or cancellation is requested,
    /// reporting each outcome and the final statistics on stdout.
    ///
    /// A failed transmission ends the run with an error.
    pub async fn run(&mut self) -> Result<Statistics, Error> {
        println!(
            "L2PING to {} from {} ({}) {} bytes frame",
            self.session.config.destination,
            self.session.source,
            self.session.interface.name,
            self.session.config.size
        );

        while !self.cancel.is_cancelled() {
            let outcome = self.probe_once().await?;
            match outcome {
                ProbeOutcome::Interrupted { .. } => break,
                _ => println!("{outcome}"),
            }

            if self.session.is_exhausted() {
                break;
            }

            let pause = self.session.config.interval.saturating_sub(outcome.waited());
            if !sleep_or_cancel(pause, &self.cancel).await {
                break;
            }
        }

        let stats = self.session.stats;
        println!("\n{stats}");
        Ok(stats)
    }

    /// Sends one echo frame and waits for its reply, at most for the configured timeout.
    pub async fn probe_once(&mut self) -> Result<ProbeOutcome, Error> {
        let sequence = self.session.next_sequence();
        let echo = ProbeFrame::echo(
            self.session.config.destination,
            self.session.source,
            sequence,
            now_micros(),
        );

        self.channel
            .send(&echo.encode(self.session.config.size))
            .await
            .map_err(|source| Error::Transmit {
                name: self.session.interface.name.clone(),
                source,
            })?;
        self.session.stats.sent += 1;
        tracing::trace!("echo seq={sequence} sent");

        let timeout = self.session.config.timeout;
        let started = Instant::now();
        loop {
            let waited = started.elapsed();
            if waited >= timeout {
                return Ok(ProbeOutcome::TimedOut { sequence, waited });
            }

            let slice = POLL_SLICE.min(timeout - waited);
            let len = match wait_for_frame(&self.channel, &mut self.buf, slice, &self.cancel).await
            {
                Wait::Frame(len) => len,
                Wait::Idle => continue,
                Wait::Cancelled => {
                    return Ok(ProbeOutcome::Interrupted {
                        sequence,
                        waited: started.elapsed(),
                    })
                }
            };

            let reply = match ProbeFrame::decode(&self.buf[..len]) {
                Ok(reply) => reply,
                Err(reason) => {
                    tracing::trace!("discarding frame: {reason}");
                    continue;
                }
            };
            if !self.is_reply_to(&reply, sequence) {
                tracing::trace!(
                    "discarding {:?} seq={} from {}",
                    reply.kind,
                    reply.sequence,
                    reply.src
                );
                continue;
            }

            self.session.stats.received += 1;
            return Ok(ProbeOutcome::Matched {
                sequence,
                from: reply.src,
                bytes: len,
                rtt: rtt_since(reply.timestamp),
                waited: started.elapsed(),
            });
        }
    }

    /// Only a reply from the probed destination carrying the outstanding sequence ends the wait.
    fn is_reply_to(&self, frame: &ProbeFrame, sequence: u16) -> bool {
        frame.kind == FrameKind::Reply
            && frame.sequence == sequence
            && frame.src == self.session.config.destination
    }
}

/// Microseconds since the Unix epoch, the unit of the frame timestamp.
pub fn now_micros() -> u64 {
    u64::try_from(Utc::now().timestamp_micros()).unwrap_or_default()
}

/// Time elapsed since `timestamp`, as echoed back by the responder.
fn rtt_since(timestamp: u64) -> Duration {
    Duration::from_micros(now_micros().saturating_sub(timestamp))
}
