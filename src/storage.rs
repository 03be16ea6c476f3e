//! Persistence layer
//!
//! Embedded per-user collection storage behind an async trait, with an
//! in-memory fallback.

pub mod collection;

pub use collection::{
    open_store, CollectionStore, InMemoryCollectionStore, RedbCollectionStore,
};
