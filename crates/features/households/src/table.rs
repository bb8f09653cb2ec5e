use cagpile_derive::api_model;
use cagpile_geostore::{FeatureCollection, Statistics, numeric_id, value_text};
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One row of the household table
#[api_model]
#[derive(Clone, PartialEq)]
pub(crate) struct HouseholdRow {
    #[schema(value_type = Object)]
    pub(crate) household_id: Value,
    #[schema(value_type = Object)]
    pub(crate) head_of_household: Value,
    #[schema(value_type = Object)]
    pub(crate) num_residents: Value,
    /// `Yes` or `No`
    pub(crate) has_seniors_pwd: String,
    #[schema(value_type = Object)]
    pub(crate) contact: Value,
    #[schema(value_type = Object)]
    pub(crate) family_name: Value,
}

/// Flattens the households layer into table rows, numeric ids first in ascending order,
/// then the remaining ids by their text.
pub(crate) fn household_rows(households: &FeatureCollection) -> Vec<HouseholdRow> {
    let mut rows: Vec<HouseholdRow> = households
        .features
        .iter()
        .map(|feature| {
            let properties = &feature.properties;
            let field = |key: &str, default: Value| properties.get(key).cloned().unwrap_or(default);
            let flagged = properties.get("senior/PWD").and_then(Value::as_str) == Some("YES");

            HouseholdRow {
                household_id: field("id", json!("N/A")),
                head_of_household: field("Owner", json!("N/A")),
                num_residents: field("Residents", json!(0)),
                has_seniors_pwd: (if flagged { "Yes" } else { "No" }).to_owned(),
                contact: field("Contact no", json!("N/A")),
                family_name: field("Family nm", json!("N/A")),
            }
        })
        .collect();

    rows.sort_by(|a, b| compare_ids(&a.household_id, &b.household_id));
    rows
}

fn compare_ids(a: &Value, b: &Value) -> Ordering {
    match (numeric_id(a), numeric_id(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => id_text(a).cmp(&id_text(b)),
    }
}

fn id_text(value: &Value) -> String {
    value_text(value).unwrap_or_else(|| value.to_string())
}

/// Dashboard statistics
#[api_model]
pub(crate) struct StatisticsResponse {
    pub(crate) total_households: usize,
    pub(crate) total_residents: i64,
    pub(crate) total_facilities: usize,
    pub(crate) vulnerable_households: usize,
    /// Same count as `vulnerable_households`
    pub(crate) households_with_seniors: usize,
    /// Same count as `vulnerable_households`
    pub(crate) households_with_pwd: usize,
    pub(crate) purok_distribution: BTreeMap<String, usize>,
    pub(crate) facility_types: BTreeMap<String, usize>,
}

impl From<Statistics> for StatisticsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            total_households: stats.total_households,
            total_residents: stats.total_residents,
            total_facilities: stats.total_facilities,
            vulnerable_households: stats.vulnerable_households,
            households_with_seniors: stats.households_with_seniors,
            households_with_pwd: stats.households_with_pwd,
            purok_distribution: stats.purok_distribution,
            facility_types: stats.facility_types,
        }
    }
}
