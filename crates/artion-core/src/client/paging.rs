//! Cursor pagination.
//!
//! Pages resume strictly after the last document of the previous page, so
//! no prior results are re-scanned. Exhaustion is count based: a page that
//! fetched fewer documents than requested is the last one.

use tracing::{debug, instrument};

use super::Collection;
use crate::codec::{self, FromDocument};
use crate::error::{Error, InvalidInputError};
use crate::query::{Direction, Filter, OrderBy, PageCursor};
use crate::traits::DocumentStore;
use crate::Result;

/// Parameters for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page_size: u32,
    pub cursor: Option<PageCursor>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
}

impl PageRequest {
    /// First page of `page_size` documents in natural order.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            cursor: None,
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(OrderBy::new(field, direction));
        self
    }

    pub fn after(mut self, cursor: Option<PageCursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// The request for the page following `page`, or `None` if `page` was the last.
    pub fn next<R>(&self, page: &Page<R>) -> Option<PageRequest> {
        if page.is_last() {
            return None;
        }
        Some(self.clone().after(page.next_cursor.clone()))
    }
}

/// One page of decoded records.
#[derive(Debug, Clone)]
pub struct Page<R> {
    /// The decoded records. May be shorter than `fetched` when documents
    /// failed to decode.
    pub records: Vec<R>,

    /// Number of raw documents the backend returned for this page.
    pub fetched: usize,

    /// The page size that was requested.
    pub page_size: u32,

    /// Points at the last fetched document; `None` only for an empty page.
    pub next_cursor: Option<PageCursor>,
}

impl<R> Page<R> {
    /// True when the backend returned fewer documents than requested.
    pub fn is_last(&self) -> bool {
        self.fetched < self.page_size as usize
    }
}

impl<S: DocumentStore + ?Sized> Collection<S> {
    /// Fetch one page.
    ///
    /// A cursor from a differently shaped request is rejected before any
    /// backend call.
    #[instrument(skip(self, request), fields(collection = %self.name, page_size = request.page_size))]
    pub async fn paged<R: FromDocument>(&self, request: &PageRequest) -> Result<Page<R>> {
        if request.page_size == 0 {
            return Err(Error::InvalidInput(InvalidInputError::ZeroPageSize));
        }

        let shape = self
            .query()
            .filters_from(request.filters.iter().cloned())
            .with_order(request.order.clone());

        let mut query = shape.clone().limit(request.page_size);
        if let Some(cursor) = &request.cursor {
            query = query.start_after(cursor.clone());
        }

        let docs = self.execute(&query).await?;
        let next_cursor = docs
            .last()
            .map(|last| PageCursor::after_document(&shape, last));
        let records = codec::decode_all(&docs);

        debug!(fetched = docs.len(), decoded = records.len(), "Fetched page");

        Ok(Page {
            records,
            fetched: docs.len(),
            page_size: request.page_size,
            next_cursor,
        })
    }

    /// Follow cursors from `request` until the last page, collecting every record.
    pub async fn paged_all<R: FromDocument>(&self, request: &PageRequest) -> Result<Vec<R>> {
        let mut request = request.clone();
        let mut records = Vec::new();

        loop {
            let page = self.paged::<R>(&request).await?;
            let next = request.next(&page);
            records.extend(page.records);
            match next {
                Some(next) => request = next,
                None => return Ok(records),
            }
        }
    }
}
