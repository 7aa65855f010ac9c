//! Set-as-list operations.
//!
//! The backend only stores strings, so a unique-membership collection is kept
//! as a JSON array. Insertion and removal deliberately compare differently:
//!
//! - [`push_unique`] compares by value, under which objects match regardless
//!   of key order.
//! - [`remove_by_json_text`] compares serialized JSON text, under which
//!   `{"a":1,"b":2}` and `{"b":2,"a":1}` are different elements.
//!
//! Both treat a JSON number as a number: `1` and `1.0` are the same element.

use serde_json::{Number, Value};

/// Largest magnitude at which every whole `f64` is an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Append `item` to the list held in `current` unless an equal element is
/// already there. Anything that is not an array counts as an empty list.
pub fn push_unique(current: Value, item: Value) -> Vec<Value> {
    let mut list = match current {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    if !list.iter().any(|element| same_value(element, &item)) {
        list.push(item);
    }
    list
}

/// Drop every element whose JSON text equals that of `item`, keeping the
/// order of the rest.
pub fn remove_by_json_text(list: Vec<Value>, item: &Value) -> Vec<Value> {
    let target = json_text(item);
    list.into_iter()
        .filter(|element| json_text(element) != target)
        .collect()
}

/// Value equality with numbers compared numerically.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => same_number(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

fn same_number(x: &Number, y: &Number) -> bool {
    if x.is_f64() || y.is_f64() {
        x.as_f64() == y.as_f64()
    } else {
        x == y
    }
}

/// Serialized text with whole-valued floats written as integers, so `1.0`
/// and `1` produce the same text.
fn json_text(value: &Value) -> String {
    normalize_numbers(value).to_string()
}

fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), normalize_numbers(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
