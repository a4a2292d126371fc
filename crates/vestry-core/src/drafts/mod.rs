//! Draft persistence layer.
//!
//! Every editable admin form gets a crash-proof, restart-proof staging
//! area scoped to a string key. `Draft` holds the in-memory value and
//! mirrors every mutation to a `DraftStorage` backend; storage faults and
//! unparseable persisted payloads degrade silently to the caller-supplied
//! initial value.

pub mod draft;
pub mod storage;

pub use draft::Draft;
pub use storage::{DraftStorage, FileStorage, MemoryStorage};
