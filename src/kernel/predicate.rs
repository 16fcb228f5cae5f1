use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::comparator::{field_of, natural_order};

/// Built-in, index-aware filter predicates.
///
/// Numeric comparisons read either the item itself or `field` of an object item;
/// a value that is not a JSON number never matches them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PredicateSpec {
    Gt {
        value: f64,
        #[serde(default)]
        field: Option<String>,
    },
    Gte {
        value: f64,
        #[serde(default)]
        field: Option<String>,
    },
    Lt {
        value: f64,
        #[serde(default)]
        field: Option<String>,
    },
    Lte {
        value: f64,
        #[serde(default)]
        field: Option<String>,
    },
    /// Inclusive on both ends
    Between {
        min: f64,
        max: f64,
        #[serde(default)]
        field: Option<String>,
    },
    Eq {
        value: Value,
        #[serde(default)]
        field: Option<String>,
    },
    /// The value is a number. Missing indicator outputs arrive as `null` and fail this.
    IsFinite {
        #[serde(default)]
        field: Option<String>,
    },
    /// Item index in `start..end`
    IndexRange { start: usize, end: usize },
    /// Every `n`th item starting at `offset`
    EveryNth {
        n: usize,
        #[serde(default)]
        offset: usize,
    },
    And { predicates: Vec<PredicateSpec> },
    Or { predicates: Vec<PredicateSpec> },
    Not { predicate: Box<PredicateSpec> },
}

impl PredicateSpec {
    /// Catch arguments that cannot match sensibly before scanning any data.
    pub fn validate(&self) -> Result<()> {
        match self {
            PredicateSpec::Between { min, max, .. } if min > max => {
                bail!("between: min ({}) is greater than max ({})", min, max)
            }
            PredicateSpec::EveryNth { n: 0, .. } => bail!("everyNth: n must be >= 1"),
            PredicateSpec::And { predicates } | PredicateSpec::Or { predicates } => {
                predicates.iter().try_for_each(PredicateSpec::validate)
            }
            PredicateSpec::Not { predicate } => predicate.validate(),
            _ => Ok(()),
        }
    }

    pub fn matches(&self, item: &Value, index: usize) -> bool {
        match self {
            PredicateSpec::Gt { value, field } => number_at(item, field).is_some_and(|x| x > *value),
            PredicateSpec::Gte { value, field } => {
                number_at(item, field).is_some_and(|x| x >= *value)
            }
            PredicateSpec::Lt { value, field } => number_at(item, field).is_some_and(|x| x < *value),
            PredicateSpec::Lte { value, field } => {
                number_at(item, field).is_some_and(|x| x <= *value)
            }
            PredicateSpec::Between { min, max, field } => {
                number_at(item, field).is_some_and(|x| (*min..=*max).contains(&x))
            }
            PredicateSpec::Eq { value, field } => {
                natural_order(target(item, field), value).is_eq() && same_kind(target(item, field), value)
            }
            PredicateSpec::IsFinite { field } => number_at(item, field).is_some(),
            PredicateSpec::IndexRange { start, end } => (*start..*end).contains(&index),
            PredicateSpec::EveryNth { n, offset } => {
                index >= *offset && (index - offset) % (*n).max(1) == 0
            }
            PredicateSpec::And { predicates } => predicates.iter().all(|p| p.matches(item, index)),
            PredicateSpec::Or { predicates } => predicates.iter().any(|p| p.matches(item, index)),
            PredicateSpec::Not { predicate } => !predicate.matches(item, index),
        }
    }
}

fn target<'a>(item: &'a Value, field: &Option<String>) -> &'a Value {
    match field {
        Some(name) => field_of(item, name),
        None => item,
    }
}

fn number_at(item: &Value, field: &Option<String>) -> Option<f64> {
    target(item, field).as_f64()
}

// Objects compare equal under the natural order, so equality needs a structural check for them.
fn same_kind(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(_), _) | (_, Value::Object(_)) => a == b,
        _ => true,
    }
}
