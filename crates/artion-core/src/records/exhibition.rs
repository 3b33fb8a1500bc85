//! Exhibition records.

use chrono::NaiveDate;
use serde::Serialize;

use crate::codec::{DecodeError, FromDocument};
use crate::document::Document;
use crate::types::DocumentId;
use crate::value::GeoPoint;

/// Format of `startDate` as stored in the `exhibitions` collection.
pub const START_DATE_FORMAT: &str = "%Y/%m/%d";

/// An exhibition listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exhibition {
    pub id: DocumentId,
    pub title: String,
    /// Cover image URL; `None` when the listing has no image.
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    /// Organising agencies, joined.
    pub agency: String,
    /// The official presenting unit.
    pub official: String,
    pub show: ShowInfo,
    pub view_count: Option<i64>,
    pub hit_rate: Option<f64>,
    pub rating: Option<f64>,
}

/// Venue and ticketing details of the first showing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowInfo {
    pub price: String,
    pub time: String,
    pub location_name: String,
    pub address: String,
    pub location: GeoPoint,
}

impl Exhibition {
    /// The city, taken as the first three characters of the venue name.
    pub fn city(&self) -> String {
        self.show.location_name.chars().take(3).collect()
    }
}

impl FromDocument for Exhibition {
    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        let reader = doc.reader();

        let raw_date = reader.require_str("startDate")?;
        let start_date = NaiveDate::parse_from_str(raw_date, START_DATE_FORMAT).map_err(|e| {
            DecodeError::invalid("startDate", format!("'{}' is not a yyyy/MM/dd date: {}", raw_date, e))
        })?;

        let image_url = reader.require_str("imageUrl")?;

        let first_show = reader.require_first_map("showInfo")?;
        let show = ShowInfo {
            price: first_show.require_str("price")?.to_string(),
            time: first_show.require_str("time")?.to_string(),
            location_name: first_show.require_str("locationName")?.to_string(),
            address: first_show.require_str("location")?.to_string(),
            location: GeoPoint {
                latitude: first_show.require_numeric("latitude")?,
                longitude: first_show.require_numeric("longitude")?,
            },
        };

        Ok(Self {
            id: doc.id.clone(),
            title: reader.require_str("title")?.to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
            start_date,
            agency: reader.require_str_array("subUnit")?.concat(),
            official: reader.require_str("showUnit")?.to_string(),
            show,
            view_count: reader.optional_i64("viewCount"),
            hit_rate: reader.optional_f64("hitRate"),
            rating: reader.optional_f64("rating"),
        })
    }
}
