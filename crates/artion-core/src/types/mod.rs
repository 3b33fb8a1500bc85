//! Validated identifier types.
//!
//! These types enforce backend naming rules at construction time so that
//! invalid names never reach the wire.

mod collection_name;
mod document_id;
mod store_url;

pub use collection_name::CollectionName;
pub use document_id::DocumentId;
pub use store_url::StoreUrl;

/// Maximum length in bytes of a collection name or document id.
const MAX_SEGMENT_BYTES: usize = 1500;

/// Validate a single path segment (collection name or document id).
///
/// Returns the reason on failure.
fn check_segment(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("cannot be empty".to_string());
    }

    if s.len() > MAX_SEGMENT_BYTES {
        return Err(format!(
            "exceeds maximum length of {} bytes",
            MAX_SEGMENT_BYTES
        ));
    }

    if s == "." || s == ".." {
        return Err("cannot be '.' or '..'".to_string());
    }

    if s.contains('/') {
        return Err("cannot contain '/'".to_string());
    }

    if s.len() > 4 && s.starts_with("__") && s.ends_with("__") {
        return Err("names of the form __x__ are reserved".to_string());
    }

    Ok(())
}
