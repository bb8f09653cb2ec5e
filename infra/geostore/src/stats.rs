use crate::layer::Layer;
use crate::model::{LayerSet, value_text};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Dashboard aggregates over the households and facilities layers.
///
/// `households_with_seniors` and `households_with_pwd` repeat `vulnerable_households`:
/// the survey records a single combined `senior/PWD` answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_households: usize,
    pub total_residents: i64,
    pub total_facilities: usize,
    pub vulnerable_households: usize,
    pub households_with_seniors: usize,
    pub households_with_pwd: usize,
    pub purok_distribution: BTreeMap<String, usize>,
    pub facility_types: BTreeMap<String, usize>,
}

/// Computes [`Statistics`] from collections already in memory.
#[must_use]
pub fn statistics(layers: &LayerSet) -> Statistics {
    let households = layers.get(Layer::Households);
    let facilities = layers.get(Layer::Facilities);

    let mut stats = Statistics {
        total_households: households.len(),
        total_facilities: facilities.len(),
        ..Statistics::default()
    };

    for feature in &households.features {
        let properties = &feature.properties;

        if let Some(count) = properties.get("Residents").and_then(resident_count) {
            stats.total_residents = stats.total_residents.saturating_add(count);
        }

        if properties.get("senior/PWD").is_some_and(is_yes) {
            stats.vulnerable_households += 1;
        }

        let purok = truthy_text(properties.get("purok"))
            .or_else(|| truthy_text(properties.get("Purok")));
        if let Some(purok) = purok {
            *stats.purok_distribution.entry(purok).or_default() += 1;
        }
    }

    stats.households_with_seniors = stats.vulnerable_households;
    stats.households_with_pwd = stats.vulnerable_households;

    for feature in &facilities.features {
        let kind = match feature.properties.get("Facility") {
            None | Some(Value::Null) => "Unknown".to_owned(),
            Some(value) => value_text(value).unwrap_or_else(|| value.to_string()),
        };
        *stats.facility_types.entry(kind).or_default() += 1;
    }

    stats
}

/// Integers count as-is, floats are truncated, strings are parsed after trimming.
/// Booleans are not head counts and are ignored.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resident_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn is_yes(value: &Value) -> bool {
    matches!(value, Value::String(text) if text.to_uppercase() == "YES")
}

/// A `true` purok is keyed with its JSON spelling, `"true"`.
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64().is_some_and(|f| f != 0.0) => {
            Some(number.to_string())
        },
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn residents_coercion() {
        assert_eq!(resident_count(&json!(5)), Some(5));
        assert_eq!(resident_count(&json!(" 7 ")), Some(7));
        assert_eq!(resident_count(&json!(3.9)), Some(3));
        assert_eq!(resident_count(&json!("bad")), None);
        assert_eq!(resident_count(&json!(true)), None);
        assert_eq!(resident_count(&Value::Null), None);
    }

    #[test]
    fn senior_flag_is_case_insensitive() {
        assert!(is_yes(&json!("yes")));
        assert!(is_yes(&json!("Yes")));
        assert!(!is_yes(&json!("NO")));
        assert!(!is_yes(&json!(true)));
    }

    #[test]
    fn empty_purok_is_skipped() {
        assert_eq!(truthy_text(Some(&json!(""))), None);
        assert_eq!(truthy_text(Some(&json!(0))), None);
        assert_eq!(truthy_text(Some(&json!(3))), Some("3".to_owned()));
        assert_eq!(truthy_text(None), None);
    }

    #[test]
    fn boolean_values_keep_json_semantics() {
        assert_eq!(resident_count(&json!(false)), None);
        assert_eq!(truthy_text(Some(&json!(true))), Some("true".to_owned()));
        assert_eq!(truthy_text(Some(&json!(false))), None);
    }
}
