//! GeoJSON documents as stored on disk.
//!
//! Only the parts the service interprets are typed. Geometry stays an opaque JSON value
//! and every foreign member of a collection or feature (`name`, `crs`, `bbox`, ...) is
//! carried through a save untouched.

use crate::layer::Layer;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// The free-form attribute map of a feature.
pub type Properties = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

/// A `FeatureCollection` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: CollectionKind,
    #[serde(flatten)]
    pub foreign: Map<String, Value>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self { features, ..Self::default() }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Drops every feature whose id matches and returns how many were removed.
    pub fn remove(&mut self, id: &FeatureId) -> usize {
        let before = self.features.len();
        self.features.retain(|feature| !feature.has_id(id));
        before - self.features.len()
    }

    #[must_use]
    pub fn find(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.has_id(id))
    }

    pub fn find_mut(&mut self, id: &FeatureId) -> Option<&mut Feature> {
        self.features.iter_mut().find(|feature| feature.has_id(id))
    }

    /// One past the largest numeric id in the collection, or 1 when there is none.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.features
            .iter()
            .filter_map(|feature| feature.properties.get("id").and_then(numeric_id))
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }
}

/// A single GeoJSON `Feature`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(flatten)]
    pub foreign: Map<String, Value>,
}

impl Feature {
    #[must_use]
    pub fn new(properties: Properties, geometry: Option<Value>) -> Self {
        Self { properties, geometry, ..Self::default() }
    }

    /// The identifier read from `properties.id`, if it is usable for matching.
    #[must_use]
    pub fn id(&self) -> Option<FeatureId> {
        self.properties.get("id").and_then(FeatureId::from_value)
    }

    #[must_use]
    pub fn has_id(&self, id: &FeatureId) -> bool {
        self.id().is_some_and(|own| own == *id)
    }

    /// Shallow merge: keys from `patch` overwrite, every other key is kept.
    pub fn merge_properties(&mut self, patch: Properties) {
        for (key, value) in patch {
            self.properties.insert(key, value);
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

/// The textual form of a feature identifier.
///
/// Ids are compared by their text, so `"3"` posted by a form and `3` stored in a file
/// refer to the same feature. Strings are used as-is, numbers by their JSON text and
/// booleans as `true`/`false`. A missing or `null` id never matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(String);

impl FeatureId {
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value_text(value).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FeatureId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for FeatureId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for FeatureId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FeatureId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| de::Error::custom("feature id must be a string, number or boolean"))
    }
}

/// Text of a scalar JSON value. `null`, arrays and objects have none.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A non-negative integer id, given either as a JSON integer or an all-digit string.
#[must_use]
pub fn numeric_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => numeric_text(text),
        _ => None,
    }
}

fn numeric_text(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// The four collections read together, for statistics and the map view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSet {
    layers: [FeatureCollection; 4],
}

impl LayerSet {
    #[must_use]
    pub fn get(&self, layer: Layer) -> &FeatureCollection {
        &self.layers[layer.index()]
    }

    pub fn insert(&mut self, layer: Layer, collection: FeatureCollection) {
        self.layers[layer.index()] = collection;
    }
}
