//! Document id type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated, opaque document identifier.
///
/// Ids are assigned by the backend on create. Callers should not assume
/// anything about their structure beyond being a single path segment.
///
/// # Example
///
/// ```
/// use artion_core::DocumentId;
///
/// let id = DocumentId::new("Qm9vdGhGZXN0MjAyMw").unwrap();
/// assert_eq!(id.as_str(), "Qm9vdGhGZXN0MjAyMw");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new document id, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, too long, contains `/`,
    /// or is reserved.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        super::check_segment(&s).map_err(|reason| InvalidInputError::DocumentId {
            value: s.clone(),
            reason,
        })?;
        Ok(Self(s))
    }

    /// Generate a random 20-character id, the same length the backend uses
    /// for auto-assigned ids.
    pub fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(20);
        Self(id)
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
