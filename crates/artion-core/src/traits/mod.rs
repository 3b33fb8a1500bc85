//! Core traits for document store backends.

mod store;

pub use store::DocumentStore;
