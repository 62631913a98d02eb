//! Bounded worker pool over a shared FIFO queue.
//!
//! K workers pop tasks until the queue is empty. Each worker checks the
//! cancellation token before taking a task; once cancelled, no new task
//! starts, in-flight tasks finish, and whatever is left in the queue is
//! counted as cancelled.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::status::WarmStatus;
use super::task::{TaskRunner, WarmTask};

/// How often a running pass logs its progress.
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Runs `tasks` on `workers` concurrent workers, updating `status` as
/// tasks finish. Returns when every worker has exited.
pub(crate) async fn run_pool<R: TaskRunner>(
    tasks: Vec<WarmTask>,
    runner: Arc<R>,
    workers: usize,
    cancellation: CancellationToken,
    status: Arc<Mutex<WarmStatus>>,
) {
    let workers = workers.clamp(1, tasks.len().max(1));
    let queue = Arc::new(Mutex::new(VecDeque::from(tasks)));

    let mut set = JoinSet::new();
    for worker_id in 0..workers {
        set.spawn(worker(
            worker_id,
            Arc::clone(&queue),
            Arc::clone(&runner),
            cancellation.clone(),
            Arc::clone(&status),
        ));
    }
    debug!(workers, "Warming workers started");

    let mut progress = tokio::time::interval(PROGRESS_LOG_INTERVAL);
    progress.tick().await;

    loop {
        tokio::select! {
            joined = set.join_next() => match joined {
                None => break,
                Some(Ok(())) => {}
                Some(Err(e)) => {
                    // The worker died while holding a task.
                    warn!(error = %e, "Warming worker aborted");
                    status.lock().failed += 1;
                }
            },

            _ = progress.tick() => {
                let s = status.lock().clone();
                info!(
                    total = s.total,
                    completed = s.completed,
                    failed = s.failed,
                    "Warming progress"
                );
            }
        }
    }

    let drained = queue.lock().drain(..).count();
    if drained > 0 {
        status.lock().cancelled += drained;
        debug!(drained, "Queued tasks cancelled");
    }
}

async fn worker<R: TaskRunner>(
    worker_id: usize,
    queue: Arc<Mutex<VecDeque<WarmTask>>>,
    runner: Arc<R>,
    cancellation: CancellationToken,
    status: Arc<Mutex<WarmStatus>>,
) {
    loop {
        if cancellation.is_cancelled() {
            debug!(worker_id, "Warming worker stopping on cancellation");
            break;
        }

        let Some(task) = queue.lock().pop_front() else {
            break;
        };

        match runner.run(&task).await {
            Ok(()) => {
                status.lock().completed += 1;
            }
            Err(e) => {
                warn!(worker_id, task = %task, error = %e, "Warming task failed");
                status.lock().failed += 1;
            }
        }
    }
}
