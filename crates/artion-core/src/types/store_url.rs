//! Store URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use super::{CollectionName, DocumentId};
use crate::error::{Error, InvalidInputError};

/// A validated document store URL.
///
/// Either a network base URL pointing at a Firestore `documents` resource
/// (`https://firestore.googleapis.com/v1/projects/<p>/databases/<d>/documents`)
/// or a local filesystem store (`file:///path/to/store`).
///
/// # Example
///
/// ```
/// use artion_core::{CollectionName, StoreUrl};
///
/// let store = StoreUrl::new(
///     "https://firestore.googleapis.com/v1/projects/artion/databases/(default)/documents",
/// ).unwrap();
/// let news = CollectionName::new("news").unwrap();
/// assert_eq!(
///     store.collection_url(&news),
///     "https://firestore.googleapis.com/v1/projects/artion/databases/(default)/documents/news",
/// );
///
/// let local = StoreUrl::new("file:///tmp/artion").unwrap();
/// assert!(local.is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreUrl(Url);

impl StoreUrl {
    /// Create a new store URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut url = Url::parse(s).map_err(|e| InvalidInputError::StoreUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: drop trailing slash on the base path
        if url.path().len() > 1 && url.path().ends_with('/') {
            let trimmed = url.path().trim_end_matches('/').to_string();
            url.set_path(&trimmed);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Returns the URL of a collection resource.
    pub fn collection_url(&self, collection: &CollectionName) -> String {
        self.with_segments(&[collection.as_str()])
    }

    /// Returns the URL of a single document resource.
    pub fn document_url(&self, collection: &CollectionName, id: &DocumentId) -> String {
        self.with_segments(&[collection.as_str(), id.as_str()])
    }

    /// Returns the URL of the structured query endpoint.
    pub fn run_query_url(&self) -> String {
        format!("{}:runQuery", self.0.as_str().trim_end_matches('/'))
    }

    /// Returns the backend resource name of a document.
    ///
    /// For a base of `.../v1/projects/p/databases/d/documents` this is
    /// `projects/p/databases/d/documents/<collection>/<id>`.
    pub fn document_name(&self, collection: &CollectionName, id: &DocumentId) -> String {
        let path = self.0.path().trim_start_matches('/');
        let root = match path.find("projects/") {
            Some(idx) => &path[idx..],
            None => path,
        };
        let root = root.trim_end_matches('/');
        if root.is_empty() {
            format!("{}/{}", collection, id)
        } else {
            format!("{}/{}/{}", root, collection, id)
        }
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns true if this is a local filesystem store (file:// URL).
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    /// Returns true if this is a network store (http:// or https:// URL).
    pub fn is_network(&self) -> bool {
        let scheme = self.0.scheme();
        scheme == "http" || scheme == "https"
    }

    /// Returns the filesystem path for file:// URLs.
    ///
    /// Returns `None` for non-file URLs.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    fn with_segments(&self, segments: &[&str]) -> String {
        let mut url = self.0.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::StoreUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();

        if scheme == "file" {
            if url.path().is_empty() || url.path() == "/" {
                return Err(InvalidInputError::StoreUrl {
                    value: original.to_string(),
                    reason: "file:// URL must have a path".to_string(),
                }
                .into());
            }
            return Ok(());
        }

        // Must be HTTPS (or HTTP for localhost)
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::StoreUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::StoreUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoreUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for StoreUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for StoreUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StoreUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
