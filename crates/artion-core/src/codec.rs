//! Record codec: typed projections of schema-less documents.
//!
//! A [`FromDocument`] implementation either produces a complete record or
//! reports the first field that was missing or mistyped. Batch reads use
//! [`decode_all`], which drops undecodable documents instead of failing the
//! whole batch.

use thiserror::Error;
use tracing::debug;

use crate::document::Document;
use crate::value::{FieldValue, Fields};

/// A document did not have the shape a record type requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {reason}")]
pub struct DecodeError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What was wrong with it.
    pub reason: String,
}

impl DecodeError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: "missing".to_string(),
        }
    }

    pub fn mistyped(field: impl Into<String>, expected: &str, found: &FieldValue) -> Self {
        Self {
            field: field.into(),
            reason: format!("expected {}, found {}", expected, found.type_name()),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Conversion from a raw document into a typed record.
pub trait FromDocument: Sized {
    /// Build the record, or report why the document is incomplete.
    fn from_document(doc: &Document) -> Result<Self, DecodeError>;
}

impl FromDocument for Document {
    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        Ok(doc.clone())
    }
}

/// Decode every document, silently dropping the ones that do not fit `R`.
pub fn decode_all<R: FromDocument>(docs: &[Document]) -> Vec<R> {
    docs.iter().filter_map(decode_one).collect()
}

/// Decode one document, logging and discarding a shape mismatch.
pub fn decode_one<R: FromDocument>(doc: &Document) -> Option<R> {
    match R::from_document(doc) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(id = %doc.id, error = %e, "Dropping undecodable document");
            None
        }
    }
}

/// Typed, path-aware access to a set of fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    fields: &'a Fields,
    prefix: Option<&'a str>,
}

impl<'a> FieldReader<'a> {
    /// Read from the given fields.
    pub fn new(fields: &'a Fields) -> Self {
        Self {
            fields,
            prefix: None,
        }
    }

    fn nested(fields: &'a Fields, prefix: &'a str) -> Self {
        Self {
            fields,
            prefix: Some(prefix),
        }
    }

    fn path(&self, name: &str) -> String {
        match self.prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_string(),
        }
    }

    /// Get a field that must be present.
    pub fn require(&self, name: &str) -> Result<&'a FieldValue, DecodeError> {
        self.fields
            .get(name)
            .ok_or_else(|| DecodeError::missing(self.path(name)))
    }

    pub fn require_str(&self, name: &str) -> Result<&'a str, DecodeError> {
        match self.require(name)? {
            FieldValue::String(s) => Ok(s),
            other => Err(DecodeError::mistyped(self.path(name), "string", other)),
        }
    }

    pub fn require_f64(&self, name: &str) -> Result<f64, DecodeError> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| DecodeError::mistyped(self.path(name), "number", value))
    }

    /// A number stored either natively or as a numeric string.
    pub fn require_numeric(&self, name: &str) -> Result<f64, DecodeError> {
        match self.require(name)? {
            FieldValue::String(s) => s.trim().parse::<f64>().map_err(|_| {
                DecodeError::invalid(self.path(name), format!("'{}' is not a number", s))
            }),
            other => other
                .as_f64()
                .ok_or_else(|| DecodeError::mistyped(self.path(name), "number", other)),
        }
    }

    pub fn require_array(&self, name: &str) -> Result<&'a [FieldValue], DecodeError> {
        match self.require(name)? {
            FieldValue::Array(items) => Ok(items),
            other => Err(DecodeError::mistyped(self.path(name), "array", other)),
        }
    }

    /// An array whose every element is a string.
    pub fn require_str_array(&self, name: &str) -> Result<Vec<String>, DecodeError> {
        self.require_array(name)?
            .iter()
            .map(|item| match item {
                FieldValue::String(s) => Ok(s.clone()),
                other => Err(DecodeError::mistyped(self.path(name), "array of strings", other)),
            })
            .collect()
    }

    /// A nested map, read with its own path prefix.
    pub fn require_map(&self, name: &'a str) -> Result<FieldReader<'a>, DecodeError> {
        match self.require(name)? {
            FieldValue::Map(fields) => Ok(FieldReader::nested(fields, name)),
            other => Err(DecodeError::mistyped(self.path(name), "map", other)),
        }
    }

    /// The first element of an array of maps.
    pub fn require_first_map(&self, name: &'a str) -> Result<FieldReader<'a>, DecodeError> {
        match self.require_array(name)?.first() {
            Some(FieldValue::Map(fields)) => Ok(FieldReader::nested(fields, name)),
            Some(other) => Err(DecodeError::mistyped(self.path(name), "array of maps", other)),
            None => Err(DecodeError::invalid(self.path(name), "empty array")),
        }
    }

    /// A string field; absent or mistyped reads as `None`.
    pub fn optional_str(&self, name: &str) -> Option<&'a str> {
        self.fields.get(name).and_then(FieldValue::as_str)
    }

    /// A number field; absent or mistyped reads as `None`.
    pub fn optional_f64(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_f64)
    }

    /// An integer field; doubles are truncated, absent or mistyped reads as `None`.
    pub fn optional_i64(&self, name: &str) -> Option<i64> {
        match self.fields.get(name)? {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Double(d) if d.is_finite() => Some(*d as i64),
            _ => None,
        }
    }

    /// A string array; absent reads as empty, non-string elements are skipped.
    pub fn optional_str_array(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .and_then(FieldValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
