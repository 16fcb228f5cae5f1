use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Built-in orderings a remote caller can ask the sorter to use.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ComparatorSpec {
    /// Natural ascending order (see [`natural_order`])
    #[default]
    Natural,
    /// Natural descending order
    Reverse,
    /// Natural order of one field of each object; items without it sort as `null`
    ByField {
        field: String,
        #[serde(default)]
        descending: bool,
    },
}

impl ComparatorSpec {
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match self {
            ComparatorSpec::Natural => natural_order(a, b),
            ComparatorSpec::Reverse => natural_order(b, a),
            ComparatorSpec::ByField { field, descending } => {
                let ord = natural_order(field_of(a, field), field_of(b, field));
                if *descending { ord.reverse() } else { ord }
            }
        }
    }
}

pub(crate) fn field_of<'a>(item: &'a Value, field: &str) -> &'a Value {
    item.get(field).unwrap_or(&Value::Null)
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values:
/// `null < bool < number < string < array < object`.
/// Numbers compare by exact numeric value, strings lexicographically, arrays element by
/// element. Objects compare equal to each other.
pub fn natural_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(a, b)| natural_order(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn exact_int(n: &Number) -> Option<i128> {
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

/// Integers compare exactly, including against floats beyond 2^53, so the
/// order stays transitive across mixed number representations.
fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (exact_int(x), exact_int(y)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(i), None) => compare_int_float(i, y.as_f64().unwrap_or(f64::NAN)),
        (None, Some(i)) => compare_int_float(i, x.as_f64().unwrap_or(f64::NAN)).reverse(),
        (None, None) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    }
}

fn compare_int_float(i: i128, f: f64) -> Ordering {
    // Rounding i to f64 is monotonic, so a strict answer here is exact.
    // On a tie f is integral and no wider than u64, so the i128 cast is lossless.
    match (i as f64).partial_cmp(&f) {
        Some(Ordering::Equal) => i.cmp(&(f as i128)),
        Some(ord) => ord,
        None => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mixed_types_rank() {
        let mut items = vec![json!("b"), json!(3), json!(null), json!(true), json!(-1.5), json!("a")];
        items.sort_by(natural_order);
        assert_eq!(items, vec![json!(null), json!(true), json!(-1.5), json!(3), json!("a"), json!("b")]);
    }

    #[test]
    fn large_integers_keep_precision() {
        let a = json!(9_007_199_254_740_993_i64);
        let b = json!(9_007_199_254_740_992_i64);
        assert_eq!(natural_order(&a, &b), Ordering::Greater);
    }

    #[test]
    fn integers_and_floats_order_consistently_past_f64_precision() {
        let int_993 = json!(9_007_199_254_740_993_u64);
        let int_992 = json!(9_007_199_254_740_992_u64);
        let float_992 = json!(9_007_199_254_740_992.0_f64);
        assert_eq!(natural_order(&int_993, &float_992), Ordering::Greater);
        assert_eq!(natural_order(&float_992, &int_993), Ordering::Less);
        assert_eq!(natural_order(&int_992, &float_992), Ordering::Equal);

        let mut items = vec![
            int_993.clone(),
            float_992.clone(),
            int_992.clone(),
            int_993.clone(),
            float_992.clone(),
        ];
        items.sort_by(natural_order);
        assert!(items.windows(2).all(|w| natural_order(&w[0], &w[1]).is_le()));
        assert_eq!(items[3], int_993);
        assert_eq!(items[4], int_993);
        assert_eq!(natural_order(&json!(-1), &json!(u64::MAX)), Ordering::Less);
        assert_eq!(natural_order(&json!(2.5), &json!(2)), Ordering::Greater);
    }

    #[test]
    fn by_field_descending() {
        let spec: ComparatorSpec =
            serde_json::from_value(json!({"kind": "byField", "field": "price", "descending": true}))
                .unwrap();
        let mut items = vec![json!({"price": 1}), json!({"price": 5}), json!({"other": 0})];
        items.sort_by(|a, b| spec.compare(a, b));
        assert_eq!(items, vec![json!({"price": 5}), json!({"price": 1}), json!({"other": 0})]);
    }

    #[test]
    fn arrays_compare_lexicographically() {
        assert_eq!(natural_order(&json!([1, 2]), &json!([1, 2, 0])), Ordering::Less);
        assert_eq!(natural_order(&json!([2]), &json!([1, 9])), Ordering::Greater);
    }
}
