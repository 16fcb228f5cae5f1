use std::time::Instant;

use crate::kernel::CancelToken;

use super::messages::TaskKind;

/// Bookkeeping for one submitted task until its terminal response arrives.
#[derive(Debug, Clone)]
pub struct TaskState {
    pub kind: TaskKind,
    pub submitted_at: Instant,

    /// Shared with the worker. Tripping it asks the running task to stop.
    pub cancel: CancelToken,

    /// Progress reported so far, if the task reports any
    pub last_progress: Option<f64>,
}

impl TaskState {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            submitted_at: Instant::now(),
            cancel: CancelToken::new(),
            last_progress: None,
        }
    }
}
