//! Fixed-period tick source.
//!
//! Each started stream runs as its own tokio task and is owned through a
//! [`TickHandle`]. Ticks carry the generation they were started with, so a
//! consumer can drop ticks that were already buffered when a stream got
//! cancelled.

use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

pub struct TickDriver {
    period: Duration,
}

impl TickDriver {
    pub fn new(period: Duration) -> Self {
        TickDriver { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawns a task sending one [`Tick`] per period into `tx`, the first one
    /// a full period from now. The channel should be bounded so a slow
    /// consumer holds the timer back instead of piling up ticks.
    pub fn start(&self, generation: u64, tx: Sender<Tick>) -> TickHandle {
        let period = self.period;
        let first = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut timer = interval_at(first, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;
                log::trace!("tick (generation {})", generation);
                if tx.send(Tick { generation }).await.is_err() {
                    // Receiver gone, nothing left to drive.
                    break;
                }
            }
        });

        TickHandle { generation, task: Some(task) }
    }
}

/// Owning handle of a running tick stream. Cancelled explicitly with
/// [`TickHandle::cancel`], or implicitly when dropped.
pub struct TickHandle {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            log::debug!("cancelling tick stream {}", self.generation);
            task.abort();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    const PERIOD: Duration = Duration::from_millis(250);

    // Lets the spawned tick task run up to its next await point.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let (tx, mut rx) = mpsc::channel(1);
        let _handle = TickDriver::new(PERIOD).start(1, tx);

        tokio::time::advance(PERIOD - Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        tokio::time::advance(Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Ok(Tick { generation: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_repeat_every_period() {
        let (tx, mut rx) = mpsc::channel(1);
        let _handle = TickDriver::new(PERIOD).start(7, tx);

        for _ in 0..3 {
            tokio::time::advance(PERIOD).await;
            settle().await;
            assert_eq!(rx.try_recv(), Ok(Tick { generation: 7 }));
            assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_stream() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = TickDriver::new(PERIOD).start(1, tx);

        handle.cancel();
        tokio::time::advance(PERIOD * 3).await;
        settle().await;

        // The task owned the only sender, so the channel closes.
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (tx, mut rx) = mpsc::channel(1);
        drop(TickDriver::new(PERIOD).start(1, tx));

        tokio::time::advance(PERIOD * 2).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_single_stream() {
        let (tx, mut rx) = mpsc::channel(4);
        let driver = TickDriver::new(PERIOD);

        let first = driver.start(1, tx.clone());
        first.cancel();
        let second = driver.start(2, tx);
        assert_eq!(second.generation(), 2);

        for _ in 0..3 {
            tokio::time::advance(PERIOD).await;
            settle().await;
            assert_eq!(rx.try_recv(), Ok(Tick { generation: 2 }));
            assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        }
    }
}
