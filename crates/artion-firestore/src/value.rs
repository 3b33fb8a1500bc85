//! Typed wire values.
//!
//! Firestore's JSON encoding tags every value with its type
//! (`{"stringValue": "x"}`, `{"integerValue": "3"}`, ...). These types mirror
//! that encoding and convert explicitly to and from [`FieldValue`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use artion_core::value::format_timestamp;
use artion_core::{Document, DocumentId, Error, FieldValue, Fields, GeoPoint, Result};
use chrono::{DateTime, Utc};

/// A single encoded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum WireValue {
    NullValue(()),
    BooleanValue(bool),
    /// 64-bit integers travel as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<WireValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapValue {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, WireValue>,
}

/// A document resource as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireDocument {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, WireValue>,
    #[allow(dead_code)]
    pub create_time: Option<String>,
    #[allow(dead_code)]
    pub update_time: Option<String>,
}

/// Request body carrying only fields.
#[derive(Debug, Serialize)]
pub(crate) struct DocumentBody {
    pub fields: BTreeMap<String, WireValue>,
}

impl DocumentBody {
    pub fn new(fields: &Fields) -> Self {
        Self {
            fields: encode_fields(fields),
        }
    }
}

impl WireDocument {
    /// The document id: the last segment of the resource name.
    pub fn id(&self) -> Result<DocumentId> {
        let segment = self.name.rsplit('/').next().unwrap_or_default();
        DocumentId::new(segment)
            .map_err(|e| Error::wire(format!("bad document name '{}': {}", self.name, e)))
    }

    pub fn into_document(self) -> Result<Document> {
        let id = self.id()?;
        let fields = decode_fields(self.fields)?;
        Ok(Document::new(id, fields))
    }
}

impl From<&FieldValue> for WireValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => WireValue::NullValue(()),
            FieldValue::Bool(b) => WireValue::BooleanValue(*b),
            FieldValue::Integer(i) => WireValue::IntegerValue(i.to_string()),
            FieldValue::Double(d) => WireValue::DoubleValue(*d),
            FieldValue::String(s) => WireValue::StringValue(s.clone()),
            FieldValue::Timestamp(ts) => WireValue::TimestampValue(format_timestamp(ts)),
            FieldValue::Bytes(b) => WireValue::BytesValue(b.clone()),
            FieldValue::Reference(name) => WireValue::ReferenceValue(name.clone()),
            FieldValue::GeoPoint(point) => WireValue::GeoPointValue(*point),
            FieldValue::Array(items) => WireValue::ArrayValue(ArrayValue {
                values: items.iter().map(WireValue::from).collect(),
            }),
            FieldValue::Map(fields) => WireValue::MapValue(MapValue {
                fields: encode_fields(fields),
            }),
        }
    }
}

impl TryFrom<WireValue> for FieldValue {
    type Error = Error;

    fn try_from(value: WireValue) -> Result<Self> {
        Ok(match value {
            WireValue::NullValue(()) => FieldValue::Null,
            WireValue::BooleanValue(b) => FieldValue::Bool(b),
            WireValue::IntegerValue(s) => FieldValue::Integer(
                s.parse()
                    .map_err(|_| Error::wire(format!("integerValue '{}' is not an int64", s)))?,
            ),
            WireValue::DoubleValue(d) => FieldValue::Double(d),
            WireValue::TimestampValue(s) => FieldValue::Timestamp(
                DateTime::parse_from_rfc3339(&s)
                    .map_err(|e| Error::wire(format!("timestampValue '{}': {}", s, e)))?
                    .with_timezone(&Utc),
            ),
            WireValue::StringValue(s) => FieldValue::String(s),
            WireValue::BytesValue(b) => FieldValue::Bytes(b),
            WireValue::ReferenceValue(name) => FieldValue::Reference(name),
            WireValue::GeoPointValue(point) => FieldValue::GeoPoint(point),
            WireValue::ArrayValue(array) => FieldValue::Array(
                array
                    .values
                    .into_iter()
                    .map(FieldValue::try_from)
                    .collect::<Result<_>>()?,
            ),
            WireValue::MapValue(map) => FieldValue::Map(decode_fields(map.fields)?),
        })
    }
}

pub(crate) fn encode_fields(fields: &Fields) -> BTreeMap<String, WireValue> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), WireValue::from(v)))
        .collect()
}

pub(crate) fn decode_fields(fields: BTreeMap<String, WireValue>) -> Result<Fields> {
    fields
        .into_iter()
        .map(|(k, v)| Ok::<_, Error>((k, FieldValue::try_from(v)?)))
        .collect()
}
