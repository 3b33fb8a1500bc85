//! Shared fixtures for the client integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use artion_core::error::TransportError;
use artion_core::value::fields_from_json;
use artion_core::{
    CollectionName, Database, Document, DocumentId, DocumentStore, Error, Fields, MemoryStore,
    Query, Result,
};
use serde_json::Value;
use tokio::sync::Barrier;

/// Wraps a [`MemoryStore`], counting calls and failing on request.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing_ids: Mutex<HashSet<String>>,
    fail_trial_reads: AtomicBool,
    fail_queries: AtomicBool,
    read_gate: Mutex<Option<Arc<Barrier>>>,
    read_delays: Mutex<HashMap<String, Duration>>,
    pub gets: AtomicUsize,
    pub queries: Mutex<Vec<Option<u32>>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads of `id` fail with a transport error.
    pub fn fail_reads_of(&self, id: &str) {
        self.failing_ids.lock().unwrap().insert(id.to_string());
    }

    /// Every read waits until `readers` reads are waiting together.
    pub fn gate_reads(&self, readers: usize) {
        *self.read_gate.lock().unwrap() = Some(Arc::new(Barrier::new(readers)));
    }

    /// Reads of `id` take `delay` to complete.
    pub fn delay_reads_of(&self, id: &str, delay: Duration) {
        self.read_delays.lock().unwrap().insert(id.to_string(), delay);
    }

    /// Queries with limit 1 fail.
    pub fn fail_trial_reads(&self) {
        self.fail_trial_reads.store(true, Ordering::SeqCst);
    }

    /// Every query fails.
    pub fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    /// The limits of every query seen so far, in call order.
    pub fn query_limits(&self) -> Vec<Option<u32>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn seed(&self, collection: &str, id: &str, value: Value) {
        self.inner.put(
            &CollectionName::new(collection).unwrap(),
            DocumentId::new(id).unwrap(),
            fields(value),
        );
    }
}

fn unavailable() -> Error {
    Error::Transport(TransportError::Connection {
        message: "backend unavailable".to_string(),
    })
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId> {
        self.inner.insert(collection, fields).await
    }

    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>> {
        self.gets.fetch_add(1, Ordering::SeqCst);

        let gate = self.read_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        let delay = self.read_delays.lock().unwrap().get(id.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_ids.lock().unwrap().contains(id.as_str()) {
            return Err(unavailable());
        }
        self.inner.get(collection, id).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        self.queries.lock().unwrap().push(query.limit_value());
        if self.fail_queries.load(Ordering::SeqCst)
            || (self.fail_trial_reads.load(Ordering::SeqCst) && query.limit_value() == Some(1))
        {
            return Err(unavailable());
        }
        self.inner.query(query).await
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()> {
        self.inner.delete(collection, id).await
    }
}

pub fn fields(value: Value) -> Fields {
    fields_from_json(value).expect("fixture must be a JSON object")
}

pub fn database() -> (Arc<FlakyStore>, Database<FlakyStore>) {
    let store = Arc::new(FlakyStore::new());
    (Arc::clone(&store), Database::new(store))
}

/// A well-formed exhibition document.
pub fn exhibition(title: &str, view_count: i64, start_date: &str) -> Value {
    serde_json::json!({
        "title": title,
        "imageUrl": format!("https://img.example/{}.png", title),
        "startDate": start_date,
        "subUnit": ["Ministry of Culture"],
        "showUnit": "National Museum",
        "showInfo": [{
            "price": "free",
            "time": "09:00-17:00",
            "locationName": "臺北市立美術館",
            "location": "中山北路三段181號",
            "latitude": "25.0724",
            "longitude": "121.5247"
        }],
        "viewCount": view_count,
        "hitRate": view_count as f64 / 100.0,
        "rating": 3.0 + (view_count % 3) as f64
    })
}

pub fn news(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "date": "2023-08-01",
        "author": "Editor",
        "image": "",
        "description": format!("About {}", title)
    })
}
