//! Remote content store access.
//!
//! The content store is the system of record for all parish content; the
//! client only ever holds transient copies. `ContentStore` is the RPC
//! contract the rest of the crate programs against, and `StoreClient` is
//! the HTTP implementation. Keeping the contract behind a trait lets the
//! service layer run against an in-memory store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Announcement, MassTiming, MediaItem, MediaType, Prayer, SpiritualMessage};

pub mod client;
pub mod error;

pub use client::StoreClient;
pub use error::StoreError;

/// Request/response contract of the remote content store.
///
/// Reads return current store state; singleton reads answer `None` when
/// the record has never been written. Writes append (`add_*`) or upsert
/// (`update_*`) and return nothing.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_mass_schedule(&self) -> Result<Vec<MassTiming>, StoreError>;
    async fn add_mass_timing(
        &self,
        day: &str,
        time: &str,
        service_type: &str,
    ) -> Result<(), StoreError>;
    async fn count_mass_schedule(&self) -> Result<u64, StoreError>;

    async fn get_prayers_by_language(&self, language: &str) -> Result<Vec<Prayer>, StoreError>;
    async fn add_prayer(
        &self,
        title: &str,
        language: &str,
        content: &str,
    ) -> Result<(), StoreError>;
    async fn count_prayers(&self) -> Result<u64, StoreError>;

    async fn get_media_gallery(&self) -> Result<Vec<MediaItem>, StoreError>;
    async fn add_media_item(
        &self,
        media_type: MediaType,
        url: &str,
        caption: &str,
    ) -> Result<(), StoreError>;
    async fn count_media_gallery(&self) -> Result<u64, StoreError>;

    async fn get_announcement(&self) -> Result<Option<Announcement>, StoreError>;
    async fn update_announcement(
        &self,
        text: &str,
        event_date: DateTime<Utc>,
        active: bool,
    ) -> Result<(), StoreError>;

    async fn get_spiritual_message(&self) -> Result<Option<SpiritualMessage>, StoreError>;
    async fn update_spiritual_message(
        &self,
        title: &str,
        author: &str,
        full_text: &str,
    ) -> Result<(), StoreError>;
}
