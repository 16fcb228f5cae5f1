use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Number, Value};

use crate::domain::{OhlcvBar, PricePoint, SharedSeries};
use crate::kernel::{BollingerBands, ComparatorSpec, PredicateSpec};

use super::errors::TaskError;

/// Wire tag of every task kind the engine understands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum TaskKind {
    #[strum(serialize = "calculateMA")]
    CalculateMa,
    #[strum(serialize = "calculateRSI")]
    CalculateRsi,
    #[strum(serialize = "calculateBollingerBands")]
    CalculateBollingerBands,
    #[strum(serialize = "sortLargeArray")]
    SortLargeArray,
    #[strum(serialize = "filterLargeDataset")]
    FilterLargeDataset,
    #[strum(serialize = "aggregatePriceData")]
    AggregatePriceData,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MaPayload {
    pub data: SharedSeries,
    pub period: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RsiPayload {
    pub data: SharedSeries,
    #[serde(default)]
    pub period: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BollingerPayload {
    pub data: SharedSeries,
    #[serde(default)]
    pub period: Option<usize>,
    #[serde(default, rename = "stdDev")]
    pub std_dev: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SortPayload {
    pub data: Vec<Value>,
    #[serde(default)]
    pub comparator: Option<ComparatorSpec>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FilterPayload {
    pub data: Vec<Value>,
    pub predicate: PredicateSpec,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AggregatePayload {
    pub prices: Vec<PricePoint>,
    #[serde(deserialize_with = "whole_number")]
    pub interval: i64,
}

// JSON senders often write integers as `60000.0`; accept those, reject fractions.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(D::Error::custom(format!("expected a whole number, got {}", number))),
    }
}

/// A decoded task. One variant per [`TaskKind`].
#[derive(Debug, Clone)]
pub enum Task {
    CalculateMa(MaPayload),
    CalculateRsi(RsiPayload),
    CalculateBollingerBands(BollingerPayload),
    SortLargeArray(SortPayload),
    FilterLargeDataset(FilterPayload),
    AggregatePriceData(AggregatePayload),
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::CalculateMa(_) => TaskKind::CalculateMa,
            Task::CalculateRsi(_) => TaskKind::CalculateRsi,
            Task::CalculateBollingerBands(_) => TaskKind::CalculateBollingerBands,
            Task::SortLargeArray(_) => TaskKind::SortLargeArray,
            Task::FilterLargeDataset(_) => TaskKind::FilterLargeDataset,
            Task::AggregatePriceData(_) => TaskKind::AggregatePriceData,
        }
    }

    /// Decode the payload for an already-identified task kind.
    pub fn decode(kind: TaskKind, payload: Value) -> Result<Task, TaskError> {
        fn typed<T: serde::de::DeserializeOwned>(kind: TaskKind, payload: Value) -> Result<T, TaskError> {
            serde_json::from_value(payload).map_err(|e| TaskError::MalformedPayload {
                kind,
                reason: e.to_string(),
            })
        }

        Ok(match kind {
            TaskKind::CalculateMa => Task::CalculateMa(typed(kind, payload)?),
            TaskKind::CalculateRsi => Task::CalculateRsi(typed(kind, payload)?),
            TaskKind::CalculateBollingerBands => {
                Task::CalculateBollingerBands(typed(kind, payload)?)
            }
            TaskKind::SortLargeArray => Task::SortLargeArray(typed(kind, payload)?),
            TaskKind::FilterLargeDataset => Task::FilterLargeDataset(typed(kind, payload)?),
            TaskKind::AggregatePriceData => Task::AggregatePriceData(typed(kind, payload)?),
        })
    }
}

/// A request to run one task, correlated by the caller-assigned `id`
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub id: String,
    pub task: Task,
}

impl TaskRequest {
    pub fn new(id: impl Into<String>, task: Task) -> Self {
        Self {
            id: id.into(),
            task,
        }
    }
}

/// The `{id, type, payload}` shape before the payload is interpreted.
#[derive(Deserialize, Debug)]
pub(crate) struct RawEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

/// Result values. Missing indicator positions are `NaN`, serialized as `null`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TaskOutput {
    Series(Vec<f64>),
    Bands(BollingerBands),
    Items(Vec<Value>),
    Bars(Vec<OhlcvBar>),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseBody {
    Result { result: TaskOutput },
    Error { error: String },
    Progress { progress: f64 },
}

/// One message back to the caller. `id` always echoes the request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TaskResponse {
    pub id: String,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl TaskResponse {
    pub fn result(id: impl Into<String>, result: TaskOutput) -> Self {
        Self {
            id: id.into(),
            body: ResponseBody::Result { result },
        }
    }

    pub fn error(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: ResponseBody::Error {
                error: error.into(),
            },
        }
    }

    pub fn progress(id: impl Into<String>, progress: f64) -> Self {
        Self {
            id: id.into(),
            body: ResponseBody::Progress {
                progress: progress.clamp(0.0, 1.0),
            },
        }
    }

    /// `result` and `error` end a task; `progress` never does.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.body, ResponseBody::Progress { .. })
    }
}

/// Sent from the engine to the worker thread
#[derive(Debug)]
pub struct JobRequest {
    pub request: TaskRequest,
    pub cancel: crate::kernel::CancelToken,
}

/// Returned by the worker
#[derive(Debug, Clone)]
pub struct JobResult {
    pub response: TaskResponse,
    // Time since the worker picked the job up
    pub duration_ms: u128,
}
