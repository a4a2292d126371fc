use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drafts::{Draft, DraftStorage};
use crate::models::Announcement;
use crate::service::ContentService;
use crate::store::StoreError;

pub const ANNOUNCEMENT_DRAFT_KEY: &str = "announcement_draft";

/// Form state for the announcement banner. The date is held as a bare
/// calendar date; publishing expands it to midnight UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    pub text: String,
    pub event_date: Option<NaiveDate>,
    pub active: bool,
}

impl AnnouncementDraft {
    /// Untouched means no text and no date. An intentionally blanked
    /// draft is indistinguishable from this state and will be re-seeded
    /// on the next first observation of server data.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.event_date.is_none()
    }

    fn from_server(existing: &Announcement) -> Self {
        Self {
            text: existing.text.clone(),
            event_date: existing.event_date.map(|d| d.date_naive()),
            active: existing.active,
        }
    }
}

/// Editor for the announcement banner.
pub struct AnnouncementEditor {
    draft: Draft<AnnouncementDraft>,
    hydrated: bool,
}

impl AnnouncementEditor {
    pub fn new(storage: Arc<dyn DraftStorage>) -> Self {
        Self {
            draft: Draft::new(storage, ANNOUNCEMENT_DRAFT_KEY, AnnouncementDraft::default()),
            hydrated: false,
        }
    }

    pub fn draft(&self) -> &AnnouncementDraft {
        self.draft.get()
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut AnnouncementDraft)) {
        self.draft.update(|prev| {
            let mut next = prev.clone();
            f(&mut next);
            next
        });
    }

    /// Seed the draft from server state the first time it is observed,
    /// and only while nothing has been typed yet. Later refetches never
    /// overwrite in-progress edits.
    pub fn observe_server(&mut self, existing: &Announcement) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;
        if self.draft.get().is_empty() {
            self.draft.set(AnnouncementDraft::from_server(existing));
        }
    }

    /// Explicitly replace the draft with the saved server record.
    pub fn load_existing(&mut self, existing: &Announcement) {
        self.draft.set(AnnouncementDraft::from_server(existing));
    }

    pub fn discard(&mut self) {
        self.draft.clear();
    }

    /// Publish the staged banner. An unset event date falls back to the
    /// current instant. The draft is cleared only on success.
    pub async fn submit(&mut self, service: &ContentService) -> Result<(), StoreError> {
        let staged = self.draft.get().clone();
        let event_date = match staged.event_date {
            Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
            None => Utc::now(),
        };
        service
            .update_announcement(&staged.text, event_date, staged.active)
            .await?;
        self.draft.clear();
        Ok(())
    }
}
