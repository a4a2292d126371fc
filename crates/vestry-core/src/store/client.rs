//! HTTP client for the parish content store.
//!
//! The store exposes a small RPC-style surface: every operation is a JSON
//! POST to `{base}/api/v1/{method}` with a camelCase parameter object.
//! Reads answer the resource (singletons answer `null` when absent);
//! writes answer an empty body.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::debug;

use super::{ContentStore, StoreError};
use crate::models::{Announcement, MassTiming, MediaItem, MediaType, Prayer, SpiritualMessage};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API path prefix on the store host.
const API_PREFIX: &str = "api/v1";

/// Content store client. Clone is cheap - reqwest::Client uses Arc
/// internally for connection pooling.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, method)
    }

    /// Check if a response is successful, mapping failures to the error
    /// taxonomy with the body attached.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::from_status(status, &body))
        }
    }

    async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.method_url(method);
        let response = self.client.post(&url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        debug!(method, "Store response received");
        serde_json::from_str(&text)
            .map_err(|e| StoreError::InvalidResponse(format!("{} from {}", e, method)))
    }

    /// Writes answer an empty or `null` body; only the status matters.
    async fn call_unit<B: Serialize>(&self, method: &str, body: &B) -> Result<(), StoreError> {
        let url = self.method_url(method);
        let response = self.client.post(&url).json(body).send().await?;
        Self::check_response(response).await?;
        debug!(method, "Store write acknowledged");
        Ok(())
    }
}

#[async_trait]
impl ContentStore for StoreClient {
    async fn get_mass_schedule(&self) -> Result<Vec<MassTiming>, StoreError> {
        self.call("getMassSchedule", &json!({})).await
    }

    async fn add_mass_timing(
        &self,
        day: &str,
        time: &str,
        service_type: &str,
    ) -> Result<(), StoreError> {
        self.call_unit(
            "addMassTiming",
            &json!({ "day": day, "time": time, "serviceType": service_type }),
        )
        .await
    }

    async fn count_mass_schedule(&self) -> Result<u64, StoreError> {
        self.call("countMassSchedule", &json!({})).await
    }

    async fn get_prayers_by_language(&self, language: &str) -> Result<Vec<Prayer>, StoreError> {
        self.call("getPrayersByLanguage", &json!({ "language": language }))
            .await
    }

    async fn add_prayer(
        &self,
        title: &str,
        language: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        self.call_unit(
            "addPrayer",
            &json!({ "title": title, "language": language, "content": content }),
        )
        .await
    }

    async fn count_prayers(&self) -> Result<u64, StoreError> {
        self.call("countPrayers", &json!({})).await
    }

    async fn get_media_gallery(&self) -> Result<Vec<MediaItem>, StoreError> {
        self.call("getMediaGallery", &json!({})).await
    }

    async fn add_media_item(
        &self,
        media_type: MediaType,
        url: &str,
        caption: &str,
    ) -> Result<(), StoreError> {
        self.call_unit(
            "addMediaItem",
            &json!({ "mediaType": media_type, "url": url, "caption": caption }),
        )
        .await
    }

    async fn count_media_gallery(&self) -> Result<u64, StoreError> {
        self.call("countMediaGallery", &json!({})).await
    }

    async fn get_announcement(&self) -> Result<Option<Announcement>, StoreError> {
        self.call("getAnnouncement", &json!({})).await
    }

    async fn update_announcement(
        &self,
        text: &str,
        event_date: DateTime<Utc>,
        active: bool,
    ) -> Result<(), StoreError> {
        self.call_unit(
            "updateAnnouncement",
            &json!({ "text": text, "eventDate": event_date, "active": active }),
        )
        .await
    }

    async fn get_spiritual_message(&self) -> Result<Option<SpiritualMessage>, StoreError> {
        self.call("getSpiritualMessage", &json!({})).await
    }

    async fn update_spiritual_message(
        &self,
        title: &str,
        author: &str,
        full_text: &str,
    ) -> Result<(), StoreError> {
        self.call_unit(
            "updateSpiritualMessage",
            &json!({ "title": title, "author": author, "fullText": full_text }),
        )
        .await
    }
}
