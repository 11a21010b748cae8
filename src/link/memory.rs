use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

use crate::link::FrameChannel;

#[derive(Default)]
struct Faults {
    fail_sends: AtomicBool,
    fail_next_recv: AtomicBool,
}

/// In-memory frame channel, standing in for a raw socket in tests.
pub struct MemoryChannel {
    tx: UnboundedSender<Vec<u8>>,
    rx: Mutex<UnboundedReceiver<Vec<u8>>>,
    faults: Arc<Faults>,
}

/// The far side of a [`MemoryChannel`]: observes what it sends and injects what it receives.
pub struct Tap {
    inject: UnboundedSender<Vec<u8>>,
    sent: UnboundedReceiver<Vec<u8>>,
    faults: Arc<Faults>,
}

impl MemoryChannel {
    fn new(tx: UnboundedSender<Vec<u8>>, rx: UnboundedReceiver<Vec<u8>>) -> (Self, Arc<Faults>) {
        let faults = Arc::new(Faults::default());
        let channel = Self {
            tx,
            rx: Mutex::new(rx),
            faults: faults.clone(),
        };
        (channel, faults)
    }

    /// Two channels wired back to back, like two hosts on one segment.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = unbounded_channel();
        let (b_tx, a_rx) = unbounded_channel();
        let (a, _) = Self::new(a_tx, a_rx);
        let (b, _) = Self::new(b_tx, b_rx);
        (a, b)
    }

    pub fn tap() -> (Self, Tap) {
        let (tx, sent) = unbounded_channel();
        let (inject, rx) = unbounded_channel();
        let (channel, faults) = Self::new(tx, rx);
        (
            channel,
            Tap {
                inject,
                sent,
                faults,
            },
        )
    }
}

impl FrameChannel for MemoryChannel {
    async fn send(&self, frame: &[u8]) -> io::Result<usize> {
        if self.faults.fail_sends.load(Ordering::Relaxed) {
            return Err(io::Error::new(io::ErrorKind::Other, "link down"));
        }
        self.tx
            .send(frame.to_vec())
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
        Ok(frame.len())
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        if self.faults.fail_next_recv.swap(false, Ordering::Relaxed) {
            return Err(io::Error::new(io::ErrorKind::Other, "receive failed"));
        }
        let frame = self
            .rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| io::Error::from(io::ErrorKind::BrokenPipe))?;
        let len = frame.len().min(buf.len());
        buf[..len].copy_from_slice(&frame[..len]);
        Ok(len)
    }
}

impl Tap {
    pub fn inject(&self, frame: &[u8]) {
        let _ = self.inject.send(frame.to_vec());
    }

    pub async fn next_sent(&mut self) -> Option<Vec<u8>> {
        self.sent.recv().await
    }

    pub fn try_next_sent(&mut self) -> Option<Vec<u8>> {
        self.sent.try_recv().ok()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.faults.fail_sends.store(fail, Ordering::Relaxed);
    }

    pub fn fail_next_recv(&self) {
        self.faults.fail_next_recv.store(true, Ordering::Relaxed);
    }
}
