//! Delayed execution for reconnect attempts
//!
//! The supervisor never sleeps on a caller's task; reconnect attempts
//! are handed to a [`Scheduler`] as independent units of work. The
//! scheduler is injectable so tests can fire attempts deterministically.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A unit of work handed to a [`Scheduler`].
pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs a task after a delay, off any caller's execution context.
pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed
    fn schedule(&self, delay: Duration, task: ScheduledTask);
}

/// [`Scheduler`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn runs_task_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        TokioScheduler.schedule(
            Duration::from_millis(50),
            Box::pin(async move {
                flag.store(true, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(49)).await;
        assert!(!fired.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }
}
