//! Query/mutation cache for content store reads.
//!
//! Reads are cached under a key derived from the operation name and its
//! argument. A successful write invalidates every cached read in its
//! resource family as a unit, and the family's next read refetches from
//! the store. Concurrent reads of one key share a single in-flight fetch.

pub mod query;

pub use query::{Family, QueryCache, QueryKey};
