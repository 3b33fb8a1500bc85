//! User profiles.

use serde::Serialize;

use crate::codec::{DecodeError, FromDocument};
use crate::document::Document;
use crate::types::DocumentId;
use crate::value::{FieldValue, Fields};

/// Field holding the ids of the news a user collected.
pub const COLLECTED_NEWS_FIELD: &str = "collectNewsID";
/// Field holding the ids of the exhibitions a user collected.
pub const COLLECTED_EXHIBITIONS_FIELD: &str = "collectExhibitionID";
/// Field holding the user's past searches.
pub const SEARCH_HISTORY_FIELD: &str = "collectSearchHistory";
/// Field holding the display name. Older documents use `name`.
pub const USERNAME_FIELD: &str = "username";

/// A user document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: DocumentId,
    pub name: String,
    pub email: String,
    pub birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub head_image: Option<String>,
    pub collected_exhibitions: Vec<String>,
    pub collected_news: Vec<String>,
    pub search_history: Vec<String>,
    pub hobbies: Vec<String>,
}

impl FromDocument for UserProfile {
    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        let reader = doc.reader();
        let owned = |name: &str| reader.optional_str(name).map(str::to_string);
        let name = match (reader.optional_str(USERNAME_FIELD), reader.optional_str("name")) {
            (Some(name), _) | (None, Some(name)) => name,
            (None, None) => reader.require_str(USERNAME_FIELD)?,
        };

        Ok(Self {
            id: doc.id.clone(),
            name: name.to_string(),
            email: reader.require_str("email")?.to_string(),
            birth: owned("birth"),
            gender: owned("gender"),
            phone: owned("phone"),
            head_image: owned("headImage"),
            collected_exhibitions: reader.optional_str_array(COLLECTED_EXHIBITIONS_FIELD),
            collected_news: reader.optional_str_array(COLLECTED_NEWS_FIELD),
            search_history: reader.optional_str_array(SEARCH_HISTORY_FIELD),
            hobbies: reader.optional_str_array("habbyStore"),
        })
    }
}

impl UserProfile {
    /// The personal details, as written on save. Collected ids, search
    /// history and hobbies are left to their own updates.
    pub fn info_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(USERNAME_FIELD.to_string(), self.name.as_str().into());
        fields.insert("email".to_string(), self.email.as_str().into());
        let optional = [
            ("birth", &self.birth),
            ("gender", &self.gender),
            ("phone", &self.phone),
            ("headImage", &self.head_image),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                fields.insert(key.to_string(), FieldValue::from(value.as_str()));
            }
        }
        fields
    }
}
