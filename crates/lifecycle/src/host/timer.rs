//! Recurring timer service

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Future produced by one timer tick
pub type TickFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Work run on every tick
pub type TickTask = Arc<dyn Fn() -> TickFuture + Send + Sync>;

/// Owned handle to a live recurring timer.
///
/// Dropping the handle does not stop the timer; pass it to
/// [`TimerService::cancel`].
#[derive(Debug)]
pub struct TimerHandle {
    id: u64,
    token: CancellationToken,
}

impl TimerHandle {
    pub fn new(id: u64, token: CancellationToken) -> Self {
        Self { id, token }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Schedules recurring work
pub trait TimerService: Send + Sync {
    /// Run `task` every `interval`, first one full interval from now
    fn schedule(&self, interval: Duration, task: TickTask) -> TimerHandle;

    /// Stop the timer behind `handle`, aborting a tick that is still running
    fn cancel(&self, handle: TimerHandle) {
        debug!("Cancelling timer {}", handle.id);
        handle.token.cancel();
    }
}

/// [`TimerService`] backed by tokio intervals.
///
/// Each tick spawns the task instead of awaiting it, so a tick that never
/// completes (a version check while offline) does not hold back later ticks.
/// A tick still running when the next one fires is aborted, which keeps at
/// most one tick task alive per timer.
#[derive(Debug)]
pub struct TokioTimerService {
    runtime: Handle,
    next_id: AtomicU64,
}

impl TokioTimerService {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
        }
    }
}

impl TimerService for TokioTimerService {
    fn schedule(&self, interval: Duration, task: TickTask) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let cancel = token.clone();
        let period = interval.max(Duration::from_millis(1));
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut running: Option<JoinHandle<()>> = None;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        if let Some(tick) = running.take() {
                            tick.abort();
                        }
                        debug!("Timer {} stopped", id);
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Some(previous) = running.take().filter(|tick| !tick.is_finished()) {
                            debug!("Timer {}: previous tick still running, aborting it", id);
                            previous.abort();
                        }
                        running = Some(runtime.spawn(task()));
                    }
                }
            }
        });

        debug!("Scheduled timer {} every {:?}", id, period);
        TimerHandle::new(id, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_task() -> (TickTask, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let task: TickTask = Arc::new(move || -> TickFuture {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        });
        (task, count)
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_full_interval() {
        let timers = TokioTimerService::new(Handle::current());
        let (task, count) = counting_task();
        let _handle = timers.schedule(Duration::from_secs(60), task);

        tokio::time::sleep(Duration::from_secs(59)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let timers = TokioTimerService::new(Handle::current());
        let (task, count) = counting_task();
        let handle = timers.schedule(Duration::from_secs(10), task);

        tokio::time::sleep(Duration::from_secs(11)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        timers.cancel(handle);
        tokio::time::sleep(Duration::from_secs(100)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    /// Counts hung ticks that were torn down
    struct Dropped(Arc<AtomicUsize>);

    impl Drop for Dropped {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_tick_does_not_block_next() {
        let timers = TokioTimerService::new(Handle::current());
        let started = Arc::new(AtomicUsize::new(0));
        let dropped = Arc::new(AtomicUsize::new(0));
        let (starts, drops) = (Arc::clone(&started), Arc::clone(&dropped));
        let task: TickTask = Arc::new(move || -> TickFuture {
            let starts = Arc::clone(&starts);
            let guard = Dropped(Arc::clone(&drops));
            Box::pin(async move {
                starts.fetch_add(1, Ordering::SeqCst);
                let _guard = guard;
                std::future::pending::<()>().await;
            })
        });
        let handle = timers.schedule(Duration::from_secs(5), task);

        tokio::time::sleep(Duration::from_secs(16)).await;
        settle().await;
        assert_eq!(started.load(Ordering::SeqCst), 3);
        // Ticks at 5s and 10s were replaced by their successors
        assert_eq!(dropped.load(Ordering::SeqCst), 2);

        timers.cancel(handle);
        settle().await;
        assert_eq!(dropped.load(Ordering::SeqCst), 3);
    }
}
