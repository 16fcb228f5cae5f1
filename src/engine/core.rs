use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::EngineConfig;

use super::dispatcher::decode_request;
use super::errors::TaskError;
use super::messages::{JobRequest, JobResult, ResponseBody, TaskRequest, TaskResponse};
use super::state::TaskState;
use super::worker;

/// Host side of the computation engine.
///
/// Owns the worker thread, forwards requests to it, tracks in-flight ids and
/// their cancellation tokens, and hands responses back in arrival order.
pub struct ComputeEngine {
    /// In-flight tasks by request id
    tasks: HashMap<String, TaskState>,

    /// Responses produced on this side (rejected submissions)
    local: VecDeque<TaskResponse>,

    /// Worker Communication
    job_tx: Option<Sender<JobRequest>>,
    result_rx: Receiver<JobResult>,
    worker: Option<JoinHandle<()>>,

    config: EngineConfig,
}

impl ComputeEngine {
    /// Spawn the worker thread.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let (job_tx, job_rx) = channel::<JobRequest>();
        let (result_tx, result_rx) = channel::<JobResult>();

        let handle = worker::spawn_worker_thread(job_rx, result_tx, config.clone())
            .context("Failed to spawn compute worker thread")?;

        log::info!(
            "Compute engine started (sort threshold {}, chunk size {}, parallel chunks: {})",
            config.sort.direct_sort_threshold,
            config.sort.chunk_size,
            config.sort.parallel_chunks
        );

        Ok(Self {
            tasks: HashMap::new(),
            local: VecDeque::new(),
            job_tx: Some(job_tx),
            result_rx,
            worker: Some(handle),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Queue a typed request. Returns `false` if it was refused; the refusal is
    /// delivered as an `error` response like any other outcome.
    pub fn submit(&mut self, request: TaskRequest) -> bool {
        if self.tasks.contains_key(&request.id) {
            log::warn!("Refusing duplicate in-flight id '{}'", request.id);
            let error = TaskError::DuplicateId(request.id.clone());
            self.local
                .push_back(TaskResponse::error(request.id, error.to_string()));
            return false;
        }

        let state = TaskState::new(request.task.kind());
        let job = JobRequest {
            cancel: state.cancel.clone(),
            request,
        };
        let id = job.request.id.clone();

        let sent = match &self.job_tx {
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        };
        if !sent {
            log::error!("Compute worker unavailable; dropping task {}", id);
            self.local
                .push_back(TaskResponse::error(id, TaskError::WorkerUnavailable.to_string()));
            return false;
        }

        self.tasks.insert(id, state);
        true
    }

    /// Decode a raw `{id, type, payload}` message and queue it.
    /// Undecodable messages are answered right away without reaching the worker.
    pub fn submit_message(&mut self, message: Value) -> bool {
        match decode_request(message) {
            Ok(request) => self.submit(request),
            Err((id, error)) => {
                log::warn!("Rejected task message (id '{}'): {}", id, error);
                self.local
                    .push_back(TaskResponse::error(id, error.to_string()));
                false
            }
        }
    }

    /// Ask an in-flight task to stop. Returns `false` for unknown ids.
    /// The task still produces exactly one terminal response.
    pub fn cancel(&mut self, id: &str) -> bool {
        match self.tasks.get(id) {
            Some(state) => {
                log::info!("Cancelling task {}", id);
                state.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Next response if one is ready.
    pub fn try_recv(&mut self) -> Option<TaskResponse> {
        if let Some(response) = self.local.pop_front() {
            return Some(response);
        }
        match self.result_rx.try_recv() {
            Ok(result) => Some(self.handle_job_result(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.fail_orphaned_task(),
        }
    }

    /// Wait up to `timeout` for the next response.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<TaskResponse> {
        if let Some(response) = self.local.pop_front() {
            return Some(response);
        }
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(self.handle_job_result(result)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => self.fail_orphaned_task(),
        }
    }

    /// Number of tasks submitted but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// No task running or queued and no response waiting to be read.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty() && self.local.is_empty()
    }

    /// Latest progress fraction seen for an in-flight task.
    pub fn progress_of(&self, id: &str) -> Option<f64> {
        self.tasks.get(id).and_then(|state| state.last_progress)
    }

    // --- INTERNAL LOGIC ---

    fn handle_job_result(&mut self, result: JobResult) -> TaskResponse {
        let response = result.response;

        if let ResponseBody::Progress { progress } = response.body {
            if let Some(state) = self.tasks.get_mut(&response.id) {
                state.last_progress = Some(progress);
            }
            return response;
        }

        if let Some(state) = self.tasks.remove(&response.id) {
            log::debug!(
                "[{}] {} finished in {} ms ({} ms since submit)",
                response.id,
                state.kind,
                result.duration_ms,
                state.submitted_at.elapsed().as_millis()
            );
        }

        if let ResponseBody::Error { error } = &response.body {
            log::debug!("Task {} failed: {}", response.id, error);
        }

        response
    }

    // The worker only hangs up if its thread died. Answer the oldest
    // outstanding task so no request is left without a terminal response.
    fn fail_orphaned_task(&mut self) -> Option<TaskResponse> {
        let oldest = self
            .tasks
            .iter()
            .min_by_key(|(_, state)| state.submitted_at)
            .map(|(id, _)| id.clone())?;
        self.tasks.remove(&oldest);
        log::error!("Compute worker exited with task {} outstanding", oldest);
        Some(TaskResponse::error(
            oldest,
            TaskError::WorkerUnavailable.to_string(),
        ))
    }
}

impl Drop for ComputeEngine {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop once the current job is done.
        self.job_tx.take();
        for state in self.tasks.values() {
            state.cancel.cancel();
        }
        if let Some(handle) = self.worker.take() {
            let started = Instant::now();
            if handle.join().is_err() {
                log::error!("Compute worker thread panicked");
            }
            log::debug!(
                "Compute worker joined after {} ms",
                started.elapsed().as_millis()
            );
        }
    }
}
