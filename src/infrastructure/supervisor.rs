//! Restart-on-exit supervision for background tasks.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Run `make()` in its own task and start it again `restart_delay` after it
/// returns or panics. Cancellation of the inner task ends supervision.
pub async fn supervise<F, Fut>(name: &'static str, restart_delay: Duration, mut make: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut restarts: u64 = 0;
    loop {
        if restarts == 0 {
            info!(task = name, "Task started");
        } else {
            info!(task = name, restarts, "Task restarted");
        }

        match tokio::spawn(make()).await {
            Ok(()) => warn!(task = name, "Task exited"),
            Err(err) if err.is_panic() => error!(task = name, "Task panicked"),
            Err(_) => {
                info!(task = name, "Task cancelled, supervision stopped");
                return;
            }
        }

        restarts += 1;
        sleep(restart_delay).await;
    }
}

/// Spawn [`supervise`] as a detached background task.
pub fn spawn_supervised<F, Fut>(name: &'static str, restart_delay: Duration, make: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(supervise(name, restart_delay, make))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn restarts_after_exit_and_panic() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let handle = spawn_supervised("flaky", Duration::from_millis(5), move || {
            let counter = Arc::clone(&counter);
            async move {
                let run = counter.fetch_add(1, Ordering::SeqCst);
                if run % 2 == 0 {
                    panic!("run {run} failed");
                }
            }
        });

        for _ in 0..200 {
            if runs.load(Ordering::SeqCst) >= 4 {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }
        handle.abort();

        assert!(runs.load(Ordering::SeqCst) >= 4);
    }
}
