//! Dotted-path lookups over loosely typed village documents.
//!
//! Lookups never fail: a missing segment or a value that cannot be read as a number resolves to
//! `0.0`, and text lookups resolve to an empty string.

use serde_json::Value;

pub fn resolve(record: &Value, path: &str) -> f64 {
    lookup(record, path).map(coerce_number).unwrap_or(0.0)
}

pub fn resolve_text(record: &Value, path: &str) -> String {
    lookup(record, path).map(coerce_text).unwrap_or_default()
}

pub(crate) fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |node, segment| match node {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

pub(crate) fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(flag) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };

    if number.is_finite() {
        number
    } else {
        0.0
    }
}

pub(crate) fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "health": { "jumlah_puskesmas": 2, "doctors": "5" },
            "economy": { "markets": null, "primary_income": "Pertanian, Perdagangan" },
            "disease": { "infectious_cases": "NaN", "dbd_cases": "  12 " },
            "flags": { "has_clinic": true },
            "posts": [3, 4]
        })
    }

    #[test]
    fn walks_nested_objects() {
        let record = sample();
        assert_eq!(resolve(&record, "health.jumlah_puskesmas"), 2.0);
        assert_eq!(resolve(&record, "health.doctors"), 5.0);
        assert_eq!(resolve(&record, "disease.dbd_cases"), 12.0);
        assert_eq!(resolve(&record, "posts.1"), 4.0);
    }

    #[test]
    fn missing_or_malformed_values_resolve_to_zero() {
        let record = sample();
        assert_eq!(resolve(&record, "security.posts"), 0.0);
        assert_eq!(resolve(&record, "health.jumlah_puskesmas.extra"), 0.0);
        assert_eq!(resolve(&record, "economy.markets"), 0.0);
        assert_eq!(resolve(&record, "economy.primary_income"), 0.0);
        assert_eq!(resolve(&record, "disease.infectious_cases"), 0.0);
        assert_eq!(resolve(&record, "health"), 0.0);
        assert_eq!(resolve(&record, ""), 0.0);
    }

    #[test]
    fn booleans_count_as_one_or_zero() {
        assert_eq!(resolve(&sample(), "flags.has_clinic"), 1.0);
    }

    #[test]
    fn text_lookups_default_to_empty() {
        let record = sample();
        assert_eq!(
            resolve_text(&record, "economy.primary_income"),
            "Pertanian, Perdagangan"
        );
        assert_eq!(resolve_text(&record, "health.jumlah_puskesmas"), "2");
        assert_eq!(resolve_text(&record, "economy.markets"), "");
        assert_eq!(resolve_text(&record, "digital.signal_strength"), "");
    }
}
