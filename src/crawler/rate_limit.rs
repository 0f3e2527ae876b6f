//! Request pacing
//!
//! [`RateLimitedFetcher`] spaces requests from every crawl unit by a fixed
//! delay. Units queue on a fair mutex around one shared timer, so requests
//! go out in arrival order, one per tick.

use crate::crawler::fetcher::Fetcher;
use crate::model::{Page, Task};
use crate::FetchError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Shortest spacing a rate limiter will use
pub const MIN_DELAY: Duration = Duration::from_millis(1);

/// Longest spacing a rate limiter will use
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// A component holding a timer that must be released when the crawl ends
pub trait Stopper {
    fn stop(&self);
}

/// Wraps a fetcher so that requests are issued at most once per `delay`
pub struct RateLimitedFetcher<F> {
    inner: F,
    delay: Duration,
    ticker: Mutex<Option<Interval>>,
    stopped: AtomicBool,
}

impl<F: Fetcher> RateLimitedFetcher<F> {
    /// Creates a rate limited fetcher
    ///
    /// Must be called inside a tokio runtime. `delay` is clamped to
    /// [`MIN_DELAY`]..=[`MAX_DELAY`].
    pub fn new(delay: Duration, inner: F) -> Self {
        let delay = delay.clamp(MIN_DELAY, MAX_DELAY);
        let mut ticker = interval(delay);
        // A slow fetch must not be followed by a burst of catch-up requests.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            inner,
            delay,
            ticker: Mutex::new(Some(ticker)),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for RateLimitedFetcher<F> {
    async fn fetch(&self, task: &Task) -> Page {
        {
            let mut ticker = self.ticker.lock().await;
            if self.stopped.load(Ordering::Acquire) {
                ticker.take();
            }
            match ticker.as_mut() {
                Some(ticker) => {
                    ticker.tick().await;
                }
                None => return Page::failed_task(task, FetchError::LimiterStopped),
            }
        }
        self.inner.fetch(task).await
    }
}

impl<F> Stopper for RateLimitedFetcher<F> {
    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        // A fetch waiting on the tick holds the lock; the timer is then
        // dropped by the next fetch to acquire it.
        if let Ok(mut ticker) = self.ticker.try_lock() {
            ticker.take();
        }
        tracing::debug!("Rate limiter stopped");
    }
}
