//! Typed read/write surface over the content store.
//!
//! Reads go through the query cache; writes invalidate their resource
//! family on success, so the family's next read reflects the write. The
//! service tolerates the store connection not yet being ready: reads
//! degrade to empty results (never cached), writes fail fast with
//! `StoreError::NotReady`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use futures::future::try_join3;
use tracing::{debug, info};

use crate::cache::{Family, QueryCache, QueryKey};
use crate::models::{
    sort_mass_schedule, Announcement, MassTiming, MediaItem, MediaType, Prayer, SpiritualMessage,
};
use crate::store::{ContentStore, StoreError};

/// Per-collection item counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentCounts {
    pub mass_schedule: u64,
    pub prayers: u64,
    pub media_gallery: u64,
}

pub struct ContentService {
    store: RwLock<Option<Arc<dyn ContentStore>>>,
    cache: QueryCache,
}

impl ContentService {
    /// A service with no store connection yet. Reads answer empty until
    /// `connect` is called; writes fail fast.
    pub fn disconnected() -> Self {
        Self {
            store: RwLock::new(None),
            cache: QueryCache::new(),
        }
    }

    pub fn connected(store: Arc<dyn ContentStore>) -> Self {
        let service = Self::disconnected();
        service.connect(store);
        service
    }

    pub fn connect(&self, store: Arc<dyn ContentStore>) {
        info!("Content store connection established");
        *self.write_lock() = Some(store);
    }

    pub fn is_ready(&self) -> bool {
        self.read_lock().is_some()
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Option<Arc<dyn ContentStore>>> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Option<Arc<dyn ContentStore>>> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    fn store(&self) -> Option<Arc<dyn ContentStore>> {
        self.read_lock().clone()
    }

    fn require_store(&self) -> Result<Arc<dyn ContentStore>, StoreError> {
        self.store().ok_or(StoreError::NotReady)
    }

    // ===== Reads =====

    /// The weekly mass schedule, grouped Sunday through Saturday and
    /// ordered by time within each day.
    pub async fn mass_schedule(&self) -> Result<Vec<MassTiming>, StoreError> {
        let Some(store) = self.store() else {
            debug!("Store not ready; returning empty mass schedule");
            return Ok(Vec::new());
        };
        let key = QueryKey::new(Family::MassSchedule, "getMassSchedule");
        let mut schedule = self
            .cache
            .fetch(key, move || async move { store.get_mass_schedule().await })
            .await?;
        sort_mass_schedule(&mut schedule);
        Ok(schedule)
    }

    pub async fn prayers_by_language(&self, language: &str) -> Result<Vec<Prayer>, StoreError> {
        let Some(store) = self.store() else {
            return Ok(Vec::new());
        };
        let key = QueryKey::with_arg(Family::Prayers, "getPrayersByLanguage", language);
        let language = language.to_string();
        self.cache
            .fetch(key, move || async move {
                store.get_prayers_by_language(&language).await
            })
            .await
    }

    pub async fn media_gallery(&self) -> Result<Vec<MediaItem>, StoreError> {
        let Some(store) = self.store() else {
            return Ok(Vec::new());
        };
        let key = QueryKey::new(Family::MediaGallery, "getMediaGallery");
        self.cache
            .fetch(key, move || async move { store.get_media_gallery().await })
            .await
    }

    pub async fn announcement(&self) -> Result<Option<Announcement>, StoreError> {
        let Some(store) = self.store() else {
            return Ok(None);
        };
        let key = QueryKey::new(Family::Announcement, "getAnnouncement");
        self.cache
            .fetch(key, move || async move { store.get_announcement().await })
            .await
    }

    pub async fn spiritual_message(&self) -> Result<Option<SpiritualMessage>, StoreError> {
        let Some(store) = self.store() else {
            return Ok(None);
        };
        let key = QueryKey::new(Family::SpiritualMessage, "getSpiritualMessage");
        self.cache
            .fetch(key, move || async move { store.get_spiritual_message().await })
            .await
    }

    pub async fn count_mass_schedule(&self) -> Result<u64, StoreError> {
        let Some(store) = self.store() else {
            return Ok(0);
        };
        let key = QueryKey::new(Family::MassSchedule, "countMassSchedule");
        self.cache
            .fetch(key, move || async move { store.count_mass_schedule().await })
            .await
    }

    pub async fn count_prayers(&self) -> Result<u64, StoreError> {
        let Some(store) = self.store() else {
            return Ok(0);
        };
        let key = QueryKey::new(Family::Prayers, "countPrayers");
        self.cache
            .fetch(key, move || async move { store.count_prayers().await })
            .await
    }

    pub async fn count_media_gallery(&self) -> Result<u64, StoreError> {
        let Some(store) = self.store() else {
            return Ok(0);
        };
        let key = QueryKey::new(Family::MediaGallery, "countMediaGallery");
        self.cache
            .fetch(key, move || async move { store.count_media_gallery().await })
            .await
    }

    /// All three collection counts, fetched concurrently.
    pub async fn counts(&self) -> Result<ContentCounts, StoreError> {
        let (mass_schedule, prayers, media_gallery) = try_join3(
            self.count_mass_schedule(),
            self.count_prayers(),
            self.count_media_gallery(),
        )
        .await?;
        Ok(ContentCounts {
            mass_schedule,
            prayers,
            media_gallery,
        })
    }

    // ===== Writes =====

    pub async fn add_mass_timing(
        &self,
        day: &str,
        time: &str,
        service_type: &str,
    ) -> Result<(), StoreError> {
        let store = self.require_store()?;
        store.add_mass_timing(day, time, service_type).await?;
        info!(day, time, service_type, "Mass timing added");
        self.cache.invalidate(Family::MassSchedule);
        Ok(())
    }

    pub async fn add_prayer(
        &self,
        title: &str,
        language: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        let store = self.require_store()?;
        store.add_prayer(title, language, content).await?;
        info!(title, language, "Prayer added");
        self.cache.invalidate(Family::Prayers);
        Ok(())
    }

    pub async fn add_media_item(
        &self,
        media_type: MediaType,
        url: &str,
        caption: &str,
    ) -> Result<(), StoreError> {
        let store = self.require_store()?;
        store.add_media_item(media_type, url, caption).await?;
        info!(media_type = %media_type, caption, "Media item added");
        self.cache.invalidate(Family::MediaGallery);
        Ok(())
    }

    pub async fn update_announcement(
        &self,
        text: &str,
        event_date: DateTime<Utc>,
        active: bool,
    ) -> Result<(), StoreError> {
        let store = self.require_store()?;
        store.update_announcement(text, event_date, active).await?;
        info!(active, "Announcement updated");
        self.cache.invalidate(Family::Announcement);
        Ok(())
    }

    pub async fn update_spiritual_message(
        &self,
        title: &str,
        author: &str,
        full_text: &str,
    ) -> Result<(), StoreError> {
        let store = self.require_store()?;
        store.update_spiritual_message(title, author, full_text).await?;
        info!(title, author, "Spiritual message updated");
        self.cache.invalidate(Family::SpiritualMessage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AnnouncementEditor;
    use crate::drafts::{DraftStorage, MemoryStorage};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStore {
        schedule: Mutex<Vec<MassTiming>>,
        prayers: Mutex<Vec<Prayer>>,
        media: Mutex<Vec<MediaItem>>,
        announcement: Mutex<Option<Announcement>>,
        message: Mutex<Option<SpiritualMessage>>,
        schedule_fetches: AtomicUsize,
        prayer_fetches: AtomicUsize,
        announcement_fetches: AtomicUsize,
        announcement_updates: AtomicUsize,
    }

    #[async_trait]
    impl ContentStore for MockStore {
        async fn get_mass_schedule(&self) -> Result<Vec<MassTiming>, StoreError> {
            self.schedule_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.schedule.lock().unwrap().clone())
        }

        async fn add_mass_timing(
            &self,
            day: &str,
            time: &str,
            service_type: &str,
        ) -> Result<(), StoreError> {
            self.schedule.lock().unwrap().push(MassTiming {
                day: day.to_string(),
                time: time.to_string(),
                service_type: service_type.to_string(),
            });
            Ok(())
        }

        async fn count_mass_schedule(&self) -> Result<u64, StoreError> {
            Ok(self.schedule.lock().unwrap().len() as u64)
        }

        async fn get_prayers_by_language(&self, language: &str) -> Result<Vec<Prayer>, StoreError> {
            self.prayer_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .prayers
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.language == language)
                .cloned()
                .collect())
        }

        async fn add_prayer(
            &self,
            title: &str,
            language: &str,
            content: &str,
        ) -> Result<(), StoreError> {
            self.prayers.lock().unwrap().push(Prayer {
                title: title.to_string(),
                language: language.to_string(),
                content: content.to_string(),
            });
            Ok(())
        }

        async fn count_prayers(&self) -> Result<u64, StoreError> {
            Ok(self.prayers.lock().unwrap().len() as u64)
        }

        async fn get_media_gallery(&self) -> Result<Vec<MediaItem>, StoreError> {
            Ok(self.media.lock().unwrap().clone())
        }

        async fn add_media_item(
            &self,
            media_type: MediaType,
            url: &str,
            caption: &str,
        ) -> Result<(), StoreError> {
            self.media.lock().unwrap().push(MediaItem {
                url: url.to_string(),
                caption: caption.to_string(),
                media_type,
            });
            Ok(())
        }

        async fn count_media_gallery(&self) -> Result<u64, StoreError> {
            Ok(self.media.lock().unwrap().len() as u64)
        }

        async fn get_announcement(&self) -> Result<Option<Announcement>, StoreError> {
            self.announcement_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.announcement.lock().unwrap().clone())
        }

        async fn update_announcement(
            &self,
            text: &str,
            event_date: DateTime<Utc>,
            active: bool,
        ) -> Result<(), StoreError> {
            self.announcement_updates.fetch_add(1, Ordering::SeqCst);
            *self.announcement.lock().unwrap() = Some(Announcement {
                text: text.to_string(),
                event_date: Some(event_date),
                active,
            });
            Ok(())
        }

        async fn get_spiritual_message(&self) -> Result<Option<SpiritualMessage>, StoreError> {
            Ok(self.message.lock().unwrap().clone())
        }

        async fn update_spiritual_message(
            &self,
            title: &str,
            author: &str,
            full_text: &str,
        ) -> Result<(), StoreError> {
            *self.message.lock().unwrap() = Some(SpiritualMessage {
                title: title.to_string(),
                date: Utc::now(),
                full_text: full_text.to_string(),
                author: author.to_string(),
            });
            Ok(())
        }
    }

    fn service_with_mock() -> (ContentService, Arc<MockStore>) {
        let store = Arc::new(MockStore::default());
        let service = ContentService::connected(store.clone());
        (service, store)
    }

    #[tokio::test]
    async fn test_reads_degrade_when_disconnected() {
        let service = ContentService::disconnected();
        assert!(!service.is_ready());
        assert!(service.mass_schedule().await.unwrap().is_empty());
        assert!(service.announcement().await.unwrap().is_none());
        assert_eq!(service.counts().await.unwrap(), ContentCounts::default());
    }

    #[tokio::test]
    async fn test_writes_fail_fast_when_disconnected() {
        let service = ContentService::disconnected();
        let err = service
            .add_mass_timing("Sunday", "06:30", "Telugu Mass")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotReady));
    }

    #[tokio::test]
    async fn test_repeat_reads_hit_the_cache() {
        let (service, store) = service_with_mock();
        service.mass_schedule().await.unwrap();
        service.mass_schedule().await.unwrap();
        assert_eq!(store.schedule_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_mass_timing_invalidates_schedule_reads() {
        let (service, store) = service_with_mock();

        assert!(service.mass_schedule().await.unwrap().is_empty());
        service
            .add_mass_timing("Sunday", "06:30", "Telugu Mass")
            .await
            .unwrap();

        let schedule = service.mass_schedule().await.unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].service_type, "Telugu Mass");
        assert_eq!(store.schedule_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_schedule_reads_are_sorted() {
        let (service, _) = service_with_mock();
        service
            .add_mass_timing("Saturday", "18:00", "Confession")
            .await
            .unwrap();
        service
            .add_mass_timing("Sunday", "08:30", "English Mass")
            .await
            .unwrap();
        service
            .add_mass_timing("Sunday", "06:30", "Telugu Mass")
            .await
            .unwrap();

        let schedule = service.mass_schedule().await.unwrap();
        let order: Vec<(&str, &str)> = schedule
            .iter()
            .map(|t| (t.day.as_str(), t.time.as_str()))
            .collect();
        assert_eq!(
            order,
            [("Sunday", "06:30"), ("Sunday", "08:30"), ("Saturday", "18:00")]
        );
    }

    #[tokio::test]
    async fn test_writes_leave_other_families_cached() {
        let (service, store) = service_with_mock();

        service.prayers_by_language("Telugu").await.unwrap();
        service
            .add_mass_timing("Sunday", "06:30", "Telugu Mass")
            .await
            .unwrap();
        service.prayers_by_language("Telugu").await.unwrap();

        assert_eq!(store.prayer_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_prayer_invalidates_every_language() {
        let (service, store) = service_with_mock();

        service.prayers_by_language("Telugu").await.unwrap();
        service.prayers_by_language("English").await.unwrap();
        service
            .add_prayer("Hail Mary", "English", "Hail Mary, full of grace...")
            .await
            .unwrap();

        let english = service.prayers_by_language("English").await.unwrap();
        assert_eq!(english.len(), 1);
        let telugu = service.prayers_by_language("Telugu").await.unwrap();
        assert!(telugu.is_empty());
        assert_eq!(store.prayer_fetches.load(Ordering::SeqCst), 4);
    }

    /// The full announcement flow: nothing published, the admin stages a
    /// draft, publishes it, and the next read reflects the new banner.
    #[tokio::test]
    async fn test_announcement_publish_flow() {
        let (service, store) = service_with_mock();
        let storage = Arc::new(MemoryStorage::new());

        assert!(service.announcement().await.unwrap().is_none());

        let mut editor = AnnouncementEditor::new(storage.clone());
        editor.edit(|d| {
            d.text = "Feast of the Holy Rosary starts Oct 7th".to_string();
            d.event_date = chrono::NaiveDate::from_ymd_opt(2026, 10, 7);
            d.active = true;
        });
        editor.submit(&service).await.unwrap();

        assert_eq!(store.announcement_updates.load(Ordering::SeqCst), 1);

        let published = service.announcement().await.unwrap().expect("published");
        assert_eq!(published.text, "Feast of the Holy Rosary starts Oct 7th");
        assert!(published.active);
        assert_eq!(
            published.event_date,
            Some(Utc.with_ymd_and_hms(2026, 10, 7, 0, 0, 0).unwrap())
        );
        assert!(published.is_visible());

        // Submit cleared the staged draft.
        assert!(editor.draft().text.is_empty());
        assert_eq!(storage.get("announcement_draft"), None);

        // One invalidate-then-refetch cycle: absent read + post-publish read.
        assert_eq!(store.announcement_fetches.load(Ordering::SeqCst), 2);
    }
}
