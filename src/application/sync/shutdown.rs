//! Cooperative stop signal for the ingestion loop

use tokio::sync::watch;
use tokio::time::{sleep, Duration};

/// Sender side, held by whoever decides the daemon should stop
#[derive(Debug)]
pub struct StopHandle {
    sender: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.sender.send_replace(true);
    }
}

/// Receiver side, polled by the loop between batches and blocks
#[derive(Debug, Clone)]
pub struct StopSignal {
    receiver: watch::Receiver<bool>,
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (sender, receiver) = watch::channel(false);
    (StopHandle { sender }, StopSignal { receiver })
}

impl StopSignal {
    /// A signal nobody can trigger
    pub fn never() -> Self {
        stop_channel().1
    }

    pub fn is_stopped(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Sleep for `duration` unless a stop arrives first. Returns whether the
    /// loop should stop.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }

        let mut receiver = self.receiver.clone();
        let sender_gone = tokio::select! {
            _ = sleep(duration) => false,
            changed = receiver.wait_for(|stopped| *stopped) => changed.is_err(),
        };
        if sender_gone {
            sleep(duration).await;
        }

        self.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_interrupts_sleep() {
        let (handle, signal) = stop_channel();
        let stop_later = async {
            sleep(Duration::from_millis(10)).await;
            handle.stop();
        };
        let (stopped, _) = tokio::join!(
            tokio::time::timeout(Duration::from_secs(5), signal.sleep(Duration::from_secs(60))),
            stop_later
        );
        assert!(stopped.unwrap());
    }

    #[tokio::test]
    async fn test_never_signal_sleeps_through() {
        let signal = StopSignal::never();
        assert!(!signal.sleep(Duration::from_millis(5)).await);
    }
}
