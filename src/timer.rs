//! Cancelable timers backing the trickle and the finishing delay.
//!
//! A [`Timer`] owns a task spawned on the current tokio runtime. Dropping or
//! cancelling it aborts the task. Every timer also carries a unique id, which
//! callbacks compare against the slot they were stored in: a callback that
//! woke up just before its timer was replaced sees a different id and backs
//! off.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

use crate::error::{Error, Result};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one scheduled timer.
pub(crate) type TimerId = u64;

/// Handle to a scheduled task; aborts it on drop.
#[derive(Debug)]
pub(crate) struct Timer {
    id: TimerId,
    period: Option<Duration>,
    handle: AbortHandle,
}

impl Timer {
    /// Reserves the id for a timer about to be spawned, so the task body can
    /// capture it.
    pub(crate) fn next_id() -> TimerId {
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    }

    /// Spawns `task` on the current runtime under the given id.
    pub(crate) fn spawn<F>(id: TimerId, task: F) -> Result<Self>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let handle = runtime.spawn(task).abort_handle();
        Ok(Self {
            id,
            period: None,
            handle,
        })
    }

    /// Runs `callback` once after `delay`.
    pub(crate) fn after<F>(id: TimerId, delay: Duration, callback: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        Self::spawn(id, async move {
            tokio::time::sleep_until(deadline).await;
            trace!(timer = id, "timer fired");
            callback();
        })
    }

    /// Runs `callback` every `period`, starting one period from now.
    ///
    /// The loop ends when `callback` returns `false`.
    pub(crate) fn every<F>(id: TimerId, period: Duration, mut callback: F) -> Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let first = Instant::now() + period;
        let mut timer = Self::spawn(id, async move {
            let mut ticks = interval_at(first, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                trace!(timer = id, "timer tick");
                if !callback() {
                    break;
                }
            }
        })?;
        timer.period = Some(period);
        Ok(timer)
    }

    pub(crate) fn id(&self) -> TimerId {
        self.id
    }

    /// The repeat period, for timers created with [`Timer::every`].
    pub(crate) fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Aborts the task.
    pub(crate) fn cancel(self) {
        drop(self);
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
