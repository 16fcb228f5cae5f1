use std::error::Error;
use std::fmt;

use super::messages::TaskKind;

/// Protocol-level failures. Kernel failures travel as `anyhow::Error` and are
/// rendered by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    MalformedEnvelope(String),
    UnknownTaskType(String),
    MalformedPayload { kind: TaskKind, reason: String },
    DuplicateId(String),
    Cancelled(String),
    Panicked { kind: TaskKind, message: String },
    WorkerUnavailable,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskError::MalformedEnvelope(reason) => write!(f, "Malformed task message: {}", reason),
            TaskError::UnknownTaskType(kind) => write!(f, "Unknown task type: {}", kind),
            TaskError::MalformedPayload { kind, reason } => {
                write!(f, "Malformed payload for {}: {}", kind, reason)
            }
            TaskError::DuplicateId(id) => {
                write!(f, "A task with id '{}' is already in flight", id)
            }
            TaskError::Cancelled(id) => write!(f, "Task {} cancelled", id),
            TaskError::Panicked { kind, message } => {
                write!(f, "{} aborted unexpectedly: {}", kind, message)
            }
            TaskError::WorkerUnavailable => write!(f, "Computation worker is not running"),
        }
    }
}

impl Error for TaskError {}
