//! Validation of the household add/edit forms.

use crate::error::HouseholdsError;
use cagpile_derive::api_model;
use cagpile_geostore::{Properties, value_text};
use serde_json::{Value, json};

const ID_PREFIX: &str = "CPL-";

/// Household form as submitted by the records pages.
///
/// Scalar fields may arrive as JSON strings (HTML form values) or as numbers.
#[api_model]
#[derive(Default, Clone)]
pub(crate) struct HouseholdForm {
    /// `CPL-0042` or `42`; required when creating
    #[schema(value_type = Option<String>)]
    pub(crate) household_id: Option<Value>,
    pub(crate) head_of_household: Option<String>,
    /// Defaults to 1
    #[schema(value_type = Option<String>)]
    pub(crate) num_residents: Option<Value>,
    /// `"true"` when the household has a senior citizen or a person with disability
    #[schema(value_type = Option<String>)]
    pub(crate) has_seniors_pwd: Option<Value>,
    pub(crate) family_name: Option<String>,
    pub(crate) contact: Option<String>,
    #[schema(value_type = Option<String>)]
    pub(crate) purok: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub(crate) latitude: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub(crate) longitude: Option<Value>,
}

/// A validated form, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HouseholdRecord {
    pub(crate) properties: Properties,
    /// GeoJSON `Point` at `[longitude, latitude]`.
    pub(crate) geometry: Value,
}

impl HouseholdForm {
    /// Validates a new household. The numeric id is stored under `properties.id`.
    pub(crate) fn into_new_record(
        self,
        default_location: (f64, f64),
    ) -> Result<(i64, HouseholdRecord), HouseholdsError> {
        let id = household_number(self.household_id.as_ref())?;
        let mut record = self.into_record(default_location, false)?;

        let mut properties = Properties::new();
        properties.insert("id".to_owned(), json!(id));
        properties.append(&mut record.properties);
        record.properties = properties;

        Ok((id, record))
    }

    /// Validates an edit. `purok` is always written, blank when not given.
    pub(crate) fn into_update(
        self,
        default_location: (f64, f64),
    ) -> Result<HouseholdRecord, HouseholdsError> {
        self.into_record(default_location, true)
    }

    fn into_record(
        self,
        (default_lat, default_lon): (f64, f64),
        always_purok: bool,
    ) -> Result<HouseholdRecord, HouseholdsError> {
        let residents = match &self.num_residents {
            None | Some(Value::Null) => 1,
            Some(value) => integer(value).ok_or(HouseholdsError::validation(HouseholdsError::NUMERIC))?,
        };
        let latitude = coordinate(self.latitude.as_ref(), default_lat)?;
        let longitude = coordinate(self.longitude.as_ref(), default_lon)?;

        let owner = trimmed(self.head_of_household.as_deref());
        if owner.is_empty() {
            return Err(HouseholdsError::validation(HouseholdsError::HEAD_REQUIRED));
        }

        let senior = match &self.has_seniors_pwd {
            Some(Value::String(flag)) if flag == "true" => "YES",
            Some(Value::Bool(true)) => "YES",
            _ => "NO",
        };

        let mut properties = Properties::new();
        properties.insert("Owner".to_owned(), json!(owner));
        properties.insert("Residents".to_owned(), json!(residents));
        properties.insert("senior/PWD".to_owned(), json!(senior));
        properties.insert("Family nm".to_owned(), json!(trimmed(self.family_name.as_deref())));
        properties.insert("Contact no".to_owned(), json!(trimmed(self.contact.as_deref())));

        let purok = self.purok.as_ref().and_then(value_text).unwrap_or_default();
        if always_purok || !purok.is_empty() {
            properties.insert("purok".to_owned(), json!(purok));
        }

        Ok(HouseholdRecord {
            properties,
            geometry: json!({ "type": "Point", "coordinates": [longitude, latitude] }),
        })
    }
}

fn household_number(value: Option<&Value>) -> Result<i64, HouseholdsError> {
    let text = value.and_then(value_text).unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(HouseholdsError::validation(HouseholdsError::ID_REQUIRED));
    }

    let digits = text.strip_prefix(ID_PREFIX).unwrap_or(text);
    digits.trim().parse().map_err(|_| HouseholdsError::validation(HouseholdsError::NUMERIC))
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn coordinate(value: Option<&Value>, default: f64) -> Result<f64, HouseholdsError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or(HouseholdsError::validation(HouseholdsError::NUMERIC))
}

fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_owned()
}
