use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::link::FrameChannel;

/// Length of one polling slice: the longest a loop goes without re-checking cancellation.
pub const POLL_SLICE: Duration = Duration::from_millis(100);

/// Result of a single bounded wait on a channel.
#[derive(Debug, PartialEq, Eq)]
pub enum Wait {
    /// A frame of the given length was written to the buffer.
    Frame(usize),
    /// Nothing usable arrived before the slice ended.
    Idle,
    /// Cancellation was requested.
    Cancelled,
}

/// Waits up to `slice` for one frame, waking immediately if `cancel` fires.
///
/// A failed receive is logged and the rest of the slice is spent idle.
pub async fn wait_for_frame<C: FrameChannel>(
    channel: &C,
    buf: &mut [u8],
    slice: Duration,
    cancel: &CancellationToken,
) -> Wait {
    let deadline = Instant::now() + slice;

    let received = tokio::select! {
        biased;
        () = cancel.cancelled() => return Wait::Cancelled,
        res = channel.recv(buf) => res,
        () = sleep_until(deadline) => return Wait::Idle,
    };

    match received {
        Ok(len) => Wait::Frame(len),
        Err(err) => {
            tracing::debug!("receive failed: {err}");
            tokio::select! {
                biased;
                () = cancel.cancelled() => Wait::Cancelled,
                () = sleep_until(deadline) => Wait::Idle,
            }
        }
    }
}

/// Sleeps for `duration` unless cancelled first; returns `false` on cancellation.
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::link::memory::MemoryChannel;
    use crate::link::wait::{sleep_or_cancel, wait_for_frame, Wait, POLL_SLICE};

    #[tokio::test(start_paused = true)]
    async fn test_wait_idle_after_one_slice() {
        let (channel, _tap) = MemoryChannel::tap();
        let cancel = CancellationToken::new();
        let mut buf = [0; 64];

        let start = Instant::now();
        let wait = wait_for_frame(&channel, &mut buf, POLL_SLICE, &cancel).await;

        assert_eq!(wait, Wait::Idle);
        assert_eq!(start.elapsed(), POLL_SLICE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_frame() {
        let (channel, tap) = MemoryChannel::tap();
        let cancel = CancellationToken::new();
        let mut buf = [0; 64];

        tap.inject(b"hello");
        let wait = wait_for_frame(&channel, &mut buf, POLL_SLICE, &cancel).await;

        assert_eq!(wait, Wait::Frame(5));
        assert_eq!(&buf[..5], b"hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_wakes_on_cancel() {
        let (channel, _tap) = MemoryChannel::tap();
        let cancel = CancellationToken::new();
        let mut buf = [0; 64];

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let wait = wait_for_frame(&channel, &mut buf, Duration::from_secs(60), &cancel).await;

        assert_eq!(wait, Wait::Cancelled);
        assert!(start.elapsed() < POLL_SLICE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_treats_receive_error_as_idle() {
        let (channel, tap) = MemoryChannel::tap();
        let cancel = CancellationToken::new();
        let mut buf = [0; 64];

        tap.fail_next_recv();
        let start = Instant::now();
        let wait = wait_for_frame(&channel, &mut buf, POLL_SLICE, &cancel).await;

        assert_eq!(wait, Wait::Idle);
        assert_eq!(start.elapsed(), POLL_SLICE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_cancel() {
        let cancel = CancellationToken::new();
        assert!(sleep_or_cancel(Duration::from_millis(500), &cancel).await);

        cancel.cancel();
        assert!(!sleep_or_cancel(Duration::from_secs(60), &cancel).await);
    }
}
