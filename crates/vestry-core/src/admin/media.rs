use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::drafts::{Draft, DraftStorage};
use crate::models::{data_url, MediaType};
use crate::service::ContentService;
use crate::store::StoreError;

pub const MEDIA_GALLERY_DRAFT_KEY: &str = "media_gallery_draft";

/// Add-form draft for a new gallery item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDraft {
    pub media_type: MediaType,
    pub url: String,
    pub caption: String,
}

impl Default for MediaDraft {
    fn default() -> Self {
        Self {
            media_type: MediaType::Video,
            url: String::new(),
            caption: String::new(),
        }
    }
}

/// Editor for the media gallery. An add-form like the mass schedule:
/// server state is never loaded into the draft.
pub struct MediaEditor {
    draft: Draft<MediaDraft>,
}

impl MediaEditor {
    pub fn new(storage: Arc<dyn DraftStorage>) -> Self {
        Self {
            draft: Draft::new(storage, MEDIA_GALLERY_DRAFT_KEY, MediaDraft::default()),
        }
    }

    pub fn draft(&self) -> &MediaDraft {
        self.draft.get()
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut MediaDraft)) {
        self.draft.update(|prev| {
            let mut next = prev.clone();
            f(&mut next);
            next
        });
    }

    /// Stage a local image as an inline data URL.
    pub fn attach_image(&mut self, mime: &str, bytes: &[u8]) {
        let url = data_url(mime, bytes);
        self.edit(|d| {
            d.media_type = MediaType::Image;
            d.url = url;
        });
    }

    pub fn discard(&mut self) {
        self.draft.clear();
    }

    /// Send the staged item to the store. The draft is cleared only on
    /// success.
    pub async fn submit(&mut self, service: &ContentService) -> Result<(), StoreError> {
        let staged = self.draft.get().clone();
        service
            .add_media_item(staged.media_type, &staged.url, &staged.caption)
            .await?;
        self.draft.clear();
        Ok(())
    }
}
