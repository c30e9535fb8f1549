use crate::utils::error::{BarError, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned identifier of a bar, exposed as `_id` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarId(Uuid);

impl BarId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for BarId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for BarId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Every persisted field of a bar except its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarFields {
    pub name: String,
    pub address: String,
    #[serde(deserialize_with = "whole_number")]
    pub postal_code: i64,
    pub neighbourhood: String,
    pub location: String,
    pub place_types: Vec<String>,
    pub rating: f64,
    pub smoking_type: String,
    pub opening_hours: Map<String, Value>,
    pub thumb_photos: Vec<String>,
    pub large_photos: Vec<String>,
    pub place_id: String,
    pub status: String,
}

pub const DEFAULT_STATUS: &str = "pending";

impl Default for BarFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            postal_code: 0,
            neighbourhood: String::new(),
            location: String::new(),
            place_types: Vec::new(),
            rating: 0.0,
            smoking_type: String::new(),
            opening_hours: Map::new(),
            thumb_photos: Vec::new(),
            large_photos: Vec::new(),
            place_id: String::new(),
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

impl BarFields {
    /// Merges the supplied fields over the documented defaults.
    ///
    /// `name` is the only required field; everything else falls back to its
    /// default when omitted.
    pub fn from_patch(patch: &BarPatch) -> Result<Self> {
        match patch.name.as_deref() {
            Some(name) if !name.is_empty() => {}
            _ => return Err(BarError::validation("name is required")),
        }

        let mut fields = Self::default();
        patch.apply_to(&mut fields);
        Ok(fields)
    }
}

/// `10999` and `10999.0` are the same postal code; `10999.5` is not one.
fn number_as_i64(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn whole_number<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number_as_i64(&number)
        .ok_or_else(|| de::Error::custom(format!("expected a whole number, got {}", number)))
}

fn optional_whole_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(|number| {
            number_as_i64(&number).ok_or_else(|| {
                de::Error::custom(format!("expected a whole number, got {}", number))
            })
        })
        .transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "_id")]
    pub id: BarId,
    #[serde(flatten)]
    pub fields: BarFields,
}

impl Bar {
    pub fn new(id: BarId, fields: BarFields) -> Self {
        Self { id, fields }
    }
}

/// A partial set of bar fields.
///
/// Used both as create input (merged over defaults) and as update input
/// (only the supplied fields are replaced). Fields the schema does not
/// declare are dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl BarPatch {
    pub fn apply_to(&self, fields: &mut BarFields) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut fields.name, &self.name);
        set(&mut fields.address, &self.address);
        set(&mut fields.postal_code, &self.postal_code);
        set(&mut fields.neighbourhood, &self.neighbourhood);
        set(&mut fields.location, &self.location);
        set(&mut fields.place_types, &self.place_types);
        set(&mut fields.rating, &self.rating);
        set(&mut fields.smoking_type, &self.smoking_type);
        set(&mut fields.opening_hours, &self.opening_hours);
        set(&mut fields.thumb_photos, &self.thumb_photos);
        set(&mut fields.large_photos, &self.large_photos);
        set(&mut fields.place_id, &self.place_id);
        set(&mut fields.status, &self.status);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /bar/update`: the target id plus the fields to replace.
#[derive(Debug, Clone, Deserialize)]
pub struct BarUpdate {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub patch: BarPatch,
}

/// Exact-match query over document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarFilter {
    fields: Map<String, Value>,
}

impl BarFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn neighbourhood(name: &str) -> Self {
        Self::new().where_eq("neighbourhood", name)
    }

    pub fn matches(&self, fields: &BarFields) -> serde_json::Result<bool> {
        let document = serde_json::to_value(fields)?;
        Ok(self
            .fields
            .iter()
            .all(|(key, expected)| document.get(key) == Some(expected)))
    }

    /// The filter as a JSON object, suitable for document containment queries.
    pub fn as_document(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
