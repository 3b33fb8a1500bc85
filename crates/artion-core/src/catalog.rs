//! Application views over the exhibition, news and user collections.

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::client::{Collection, Database, Page, PageRequest};
use crate::query::{Direction, Filter, PageCursor};
use crate::records::{
    COLLECTED_EXHIBITIONS_FIELD, COLLECTED_NEWS_FIELD, Exhibition, News, SEARCH_HISTORY_FIELD,
    START_DATE_FORMAT, UserProfile,
};
use crate::traits::DocumentStore;
use crate::types::DocumentId;
use crate::Result;

pub const EXHIBITIONS: &str = "exhibitions";
pub const NEWS: &str = "news";
pub const USERS: &str = "users";

/// Rating threshold of the "highly rated" view when the caller has none.
pub const DEFAULT_MIN_RATING: f64 = 4.0;

/// Equality filters for browsing exhibitions. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExhibitionFilter {
    pub hobby: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
}

impl ExhibitionFilter {
    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if let Some(hobby) = &self.hobby {
            filters.push(Filter::eq("habby", hobby.as_str()));
        }
        if let Some(category) = &self.category {
            filters.push(Filter::eq("category", category.as_str()));
        }
        if let Some(date) = self.start_date {
            filters.push(Filter::eq("startDate", date.format(START_DATE_FORMAT).to_string()));
        }
        filters
    }
}

/// The app's read views, built on one [`Database`].
pub struct Catalog<S: ?Sized> {
    exhibitions: Collection<S>,
    news: Collection<S>,
    users: Collection<S>,
}

impl<S: DocumentStore + ?Sized> Catalog<S> {
    pub fn new(db: &Database<S>) -> Result<Self> {
        Ok(Self {
            exhibitions: db.collection(EXHIBITIONS)?,
            news: db.collection(NEWS)?,
            users: db.collection(USERS)?,
        })
    }

    pub fn exhibitions(&self) -> &Collection<S> {
        &self.exhibitions
    }

    pub fn news(&self) -> &Collection<S> {
        &self.news
    }

    pub fn users(&self) -> &Collection<S> {
        &self.users
    }

    /// Most viewed exhibitions.
    pub async fn popular(&self, limit: u32) -> Result<Vec<Exhibition>> {
        self.exhibitions
            .ranked(&[], "viewCount", Direction::Descending, limit)
            .await
    }

    /// Exhibitions with the highest hit rate.
    pub async fn hot(&self, limit: u32) -> Result<Vec<Exhibition>> {
        self.exhibitions
            .ranked(&[], "hitRate", Direction::Descending, limit)
            .await
    }

    /// Exhibitions rated at least `min_rating`, best first.
    pub async fn top_rated(&self, min_rating: f64, limit: u32) -> Result<Vec<Exhibition>> {
        self.exhibitions
            .ranked(
                &[Filter::gte("rating", min_rating)],
                "rating",
                Direction::Descending,
                limit,
            )
            .await
    }

    /// Exhibitions by start date, earliest first.
    pub async fn upcoming(&self, limit: u32) -> Result<Vec<Exhibition>> {
        self.exhibitions
            .ranked(&[], "startDate", Direction::Ascending, limit)
            .await
    }

    /// A pseudo-random pick of exhibitions.
    pub async fn featured(&self, count: u32) -> Result<Vec<Exhibition>> {
        self.exhibitions.sample(count).await
    }

    /// A pseudo-random pick of news.
    pub async fn news_highlights(&self, count: u32) -> Result<Vec<News>> {
        self.news.sample(count).await
    }

    /// One page of exhibitions matching `filter`, ordered by start date.
    ///
    /// When the filter pins the start date the ordering is dropped, since
    /// the backend refuses to order on a field constrained by equality.
    pub async fn browse(
        &self,
        filter: &ExhibitionFilter,
        page_size: u32,
        cursor: Option<PageCursor>,
    ) -> Result<Page<Exhibition>> {
        let mut request = PageRequest::new(page_size).after(cursor);
        request.filters = filter.filters();
        if filter.start_date.is_none() {
            request = request.order_by("startDate", Direction::Ascending);
        }
        self.exhibitions.paged(&request).await
    }

    /// The news a user collected. A missing user has collected nothing.
    pub async fn collected_news(&self, user_id: &DocumentId) -> Result<Vec<News>> {
        self.news
            .resolver()
            .resolve_field(&self.users, user_id, COLLECTED_NEWS_FIELD)
            .await
    }

    /// The exhibitions a user collected.
    pub async fn collected_exhibitions(&self, user_id: &DocumentId) -> Result<Vec<Exhibition>> {
        self.exhibitions
            .resolver()
            .resolve_field(&self.users, user_id, COLLECTED_EXHIBITIONS_FIELD)
            .await
    }

    /// A user's profile. Missing or malformed documents read as `None`.
    pub async fn profile(&self, user_id: &DocumentId) -> Result<Option<UserProfile>> {
        self.users.read_as(user_id).await
    }

    /// Write back a profile's personal details. The user must exist.
    #[instrument(skip(self, profile), fields(user = %profile.id))]
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        debug!("Saving profile");
        self.users.update(&profile.id, &profile.info_fields()).await
    }

    /// The user's past searches, newest last.
    #[instrument(skip(self))]
    pub async fn search_history(&self, user_id: &DocumentId) -> Result<Vec<String>> {
        let Some(user) = self.users.read(user_id).await? else {
            warn!("User not found");
            return Ok(Vec::new());
        };
        Ok(user.reader().optional_str_array(SEARCH_HISTORY_FIELD))
    }
}

impl<S: ?Sized> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            exhibitions: self.exhibitions.clone(),
            news: self.news.clone(),
            users: self.users.clone(),
        }
    }
}
