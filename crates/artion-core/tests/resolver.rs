//! Reference resolution tests.

mod common;

use std::time::Duration;

use artion_core::{Document, DocumentId, News};
use common::database;
use serde_json::json;

fn ids(raw: &[&str]) -> Vec<DocumentId> {
    raw.iter().map(|id| DocumentId::new(*id).unwrap()).collect()
}

#[tokio::test]
async fn failed_read_is_omitted() {
    let (store, db) = database();
    for id in ["a", "b", "c"] {
        store.seed("news", id, common::news(id));
    }
    store.fail_reads_of("b");

    let resolved: Vec<News> = db
        .collection("news")
        .unwrap()
        .resolver()
        .resolve(&ids(&["a", "b", "c"]))
        .await;

    let mut titles: Vec<_> = resolved.iter().map(|n| n.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["a", "c"]);
    assert_eq!(store.get_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn reads_are_in_flight_together() {
    let (store, db) = database();
    for id in ["a", "b", "c"] {
        store.seed("news", id, common::news(id));
    }
    // Each read blocks until all three are waiting at once.
    store.gate_reads(3);

    let resolver = db.collection("news").unwrap().resolver();
    let resolved: Vec<News> = tokio::time::timeout(
        Duration::from_secs(2),
        resolver.resolve(&ids(&["a", "b", "c"])),
    )
    .await
    .expect("reads were issued one at a time");
    assert_eq!(resolved.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn results_follow_arrival_order() {
    let (store, db) = database();
    for id in ["a", "b", "c"] {
        store.seed("news", id, common::news(id));
    }
    store.delay_reads_of("a", Duration::from_millis(30));
    store.delay_reads_of("b", Duration::from_millis(10));
    store.delay_reads_of("c", Duration::from_millis(20));

    let resolved: Vec<News> = db
        .collection("news")
        .unwrap()
        .resolver()
        .resolve(&ids(&["a", "b", "c"]))
        .await;

    let titles: Vec<_> = resolved.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn missing_and_undecodable_are_omitted() {
    let (store, db) = database();
    store.seed("news", "a", common::news("a"));
    store.seed("news", "broken", json!({"title": "no author"}));

    let resolved: Vec<News> = db
        .collection("news")
        .unwrap()
        .resolver()
        .resolve(&ids(&["a", "ghost", "broken"]))
        .await;
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id.as_str(), "a");
}

#[tokio::test]
async fn no_ids_means_no_reads() {
    let (store, db) = database();
    let resolved: Vec<Document> = db
        .collection("news")
        .unwrap()
        .resolver()
        .resolve(&[])
        .await;
    assert!(resolved.is_empty());
    assert_eq!(store.get_count(), 0);
}

#[tokio::test]
async fn duplicates_are_read_each_time() {
    let (store, db) = database();
    store.seed("news", "a", common::news("a"));

    let resolved: Vec<Document> = db
        .collection("news")
        .unwrap()
        .resolver()
        .resolve(&ids(&["a", "a"]))
        .await;
    assert_eq!(resolved.len(), 2);
    assert_eq!(store.get_count(), 2);
}

#[tokio::test]
async fn resolve_field_follows_parent_ids() {
    let (store, db) = database();
    store.seed("news", "n1", common::news("first"));
    store.seed("news", "n2", common::news("second"));
    store.seed(
        "users",
        "u1",
        json!({"name": "Mei", "email": "mei@example.com", "collectNewsID": ["n1", "n2", "gone", "a/b"]}),
    );

    let users = db.collection("users").unwrap();
    let news = db.collection("news").unwrap();
    let resolved: Vec<News> = news
        .resolver()
        .resolve_field(&users, &"u1".parse().unwrap(), "collectNewsID")
        .await
        .unwrap();
    assert_eq!(resolved.len(), 2);
}

#[tokio::test]
async fn resolve_field_with_missing_parent_or_field_is_empty() {
    let (store, db) = database();
    store.seed("users", "u1", json!({"name": "Mei"}));
    store.seed("users", "u2", json!({"collectNewsID": "n1"}));

    let users = db.collection("users").unwrap();
    let resolver = db.collection("news").unwrap().resolver();

    for parent in ["ghost", "u1", "u2"] {
        let resolved: Vec<Document> = resolver
            .resolve_field(&users, &parent.parse().unwrap(), "collectNewsID")
            .await
            .unwrap();
        assert!(resolved.is_empty(), "parent {}", parent);
    }
}

#[tokio::test]
async fn resolve_field_fails_when_parent_read_fails() {
    let (store, db) = database();
    store.seed("users", "u1", json!({"collectNewsID": ["n1"]}));
    store.fail_reads_of("u1");

    let users = db.collection("users").unwrap();
    let result = db
        .collection("news")
        .unwrap()
        .resolver()
        .resolve_field::<Document>(&users, &"u1".parse().unwrap(), "collectNewsID")
        .await;
    assert!(result.is_err());
}
