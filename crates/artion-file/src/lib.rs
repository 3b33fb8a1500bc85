//! artion-file - Filesystem-backed document store.
//!
//! Useful for offline development and tests: every document is a JSON file
//! and queries run through the same evaluator as the in-memory store.

mod store;

pub use store::FileStore;
