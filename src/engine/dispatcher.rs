use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use anyhow::Result;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::kernel::{
    CancelToken, Cancelled, aggregate_price_data, calculate_bollinger_bands, calculate_ma,
    calculate_rsi, filter_items, sort_large,
};

use super::errors::TaskError;
use super::messages::{RawEnvelope, Task, TaskKind, TaskOutput, TaskRequest, TaskResponse};

/// Turn a raw `{id, type, payload}` message into a typed request.
/// On failure the error carries whatever id could be recovered ("" if none).
pub fn decode_request(message: Value) -> Result<TaskRequest, (String, TaskError)> {
    let id = message
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let envelope: RawEnvelope = serde_json::from_value(message)
        .map_err(|e| (id.clone(), TaskError::MalformedEnvelope(e.to_string())))?;

    let Some(tag) = envelope.kind else {
        return Err((
            id,
            TaskError::MalformedEnvelope("missing field `type`".to_string()),
        ));
    };
    let kind = TaskKind::from_str(&tag).map_err(|_| (id.clone(), TaskError::UnknownTaskType(tag)))?;
    let task = Task::decode(kind, envelope.payload).map_err(|e| (id.clone(), e))?;

    Ok(TaskRequest::new(envelope.id, task))
}

/// Runs one task at a time and always answers with exactly one terminal response.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode and run a raw message.
    pub fn handle_message(
        &self,
        message: Value,
        cancel: &CancelToken,
        progress: &mut dyn FnMut(f64),
    ) -> TaskResponse {
        match decode_request(message) {
            Ok(request) => self.handle_request(request, cancel, progress),
            Err((id, error)) => TaskResponse::error(id, error.to_string()),
        }
    }

    /// Run a typed request. Kernel errors and panics become `error` responses.
    pub fn handle_request(
        &self,
        request: TaskRequest,
        cancel: &CancelToken,
        progress: &mut dyn FnMut(f64),
    ) -> TaskResponse {
        let TaskRequest { id, task } = request;
        let kind = task.kind();

        if cancel.is_cancelled() {
            return TaskResponse::error(&id, TaskError::Cancelled(id.clone()).to_string());
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_task(task, cancel, progress)));

        match outcome {
            Ok(Ok(output)) => TaskResponse::result(id, output),
            Ok(Err(e)) if e.is::<Cancelled>() => {
                TaskResponse::error(&id, TaskError::Cancelled(id.clone()).to_string())
            }
            Ok(Err(e)) => TaskResponse::error(id, format!("{} failed: {:#}", kind, e)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("{} task {} panicked: {}", kind, id, message);
                TaskResponse::error(id, TaskError::Panicked { kind, message }.to_string())
            }
        }
    }

    /// The task table: one arm per task kind.
    pub fn run_task(
        &self,
        task: Task,
        cancel: &CancelToken,
        progress: &mut dyn FnMut(f64),
    ) -> Result<TaskOutput> {
        let defaults = &self.config.indicators;
        let check_every = self.config.scan.check_every;

        Ok(match task {
            Task::CalculateMa(p) => TaskOutput::Series(calculate_ma(&p.data, p.period)?),
            Task::CalculateRsi(p) => {
                let period = p.period.unwrap_or(defaults.rsi_period);
                TaskOutput::Series(calculate_rsi(&p.data, period)?)
            }
            Task::CalculateBollingerBands(p) => {
                let period = p.period.unwrap_or(defaults.bollinger_period);
                let std_dev = p.std_dev.unwrap_or(defaults.bollinger_std_dev);
                TaskOutput::Bands(calculate_bollinger_bands(&p.data, period, std_dev)?)
            }
            Task::SortLargeArray(p) => {
                let comparator = p.comparator.unwrap_or_default();
                let sorted = sort_large(
                    p.data,
                    |a, b| comparator.compare(a, b),
                    &self.config.sort,
                    cancel,
                    progress,
                )?;
                TaskOutput::Items(sorted)
            }
            Task::FilterLargeDataset(p) => {
                p.predicate.validate()?;
                let kept = filter_items(
                    &p.data,
                    |item, index| p.predicate.matches(item, index),
                    cancel,
                    check_every,
                )?;
                TaskOutput::Items(kept)
            }
            Task::AggregatePriceData(p) => {
                TaskOutput::Bars(aggregate_price_data(&p.prices, p.interval, cancel, check_every)?)
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
