//! artion-firestore - Firestore REST backed [`DocumentStore`](artion_core::DocumentStore).
//!
//! Talks to a `.../v1/projects/<project>/databases/<db>/documents` base URL:
//! documents are created, read, patched and deleted through their resource
//! URLs and queries go through `:runQuery`.

mod client;
mod query;
mod store;
mod value;

pub use store::{FirestoreStore, FirestoreStoreBuilder};
