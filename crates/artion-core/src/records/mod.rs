//! Domain records decoded from the app's collections.

mod exhibition;
mod news;
mod user;

pub use exhibition::{Exhibition, START_DATE_FORMAT, ShowInfo};
pub use crate::value::GeoPoint;
pub use news::News;
pub use user::{
    COLLECTED_EXHIBITIONS_FIELD, COLLECTED_NEWS_FIELD, SEARCH_HISTORY_FIELD, USERNAME_FIELD,
    UserProfile,
};
