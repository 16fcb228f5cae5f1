use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_TASK_LIFECYCLE;
use crate::config::EngineConfig;

use super::dispatcher::Dispatcher;
use super::messages::{JobRequest, JobResult, TaskResponse};

/// Spawn the single computation thread. It runs jobs one at a time, in arrival
/// order, until the job channel closes.
pub fn spawn_worker_thread(
    rx: Receiver<JobRequest>,
    tx: Sender<JobResult>,
    config: EngineConfig,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("compute-worker".to_string())
        .spawn(move || {
            let emit_progress = config.emit_progress;
            let dispatcher = Dispatcher::new(config);

            while let Ok(job) = rx.recv() {
                let start = Instant::now();
                let id = job.request.id.clone();

                #[cfg(debug_assertions)]
                if PRINT_TASK_LIFECYCLE {
                    log::info!("[{}] start {}", id, job.request.task.kind());
                }

                let mut report = |fraction: f64| {
                    if emit_progress {
                        let _ = tx.send(JobResult {
                            response: TaskResponse::progress(id.as_str(), fraction),
                            duration_ms: start.elapsed().as_millis(),
                        });
                    }
                };

                // 1. Run the heavy calculation (never panics out of here)
                let response = dispatcher.handle_request(job.request, &job.cancel, &mut report);

                let result = JobResult {
                    response,
                    duration_ms: start.elapsed().as_millis(),
                };

                // 2. Hand it back. A closed channel means the engine is gone.
                if tx.send(result).is_err() {
                    log::warn!("Result channel closed; compute worker stopping");
                    break;
                }
            }
        })
}
