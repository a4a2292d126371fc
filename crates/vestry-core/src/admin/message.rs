use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::drafts::{Draft, DraftStorage};
use crate::models::SpiritualMessage;
use crate::service::ContentService;
use crate::store::StoreError;

pub const SPIRITUAL_MESSAGE_DRAFT_KEY: &str = "spiritual_message_draft";

/// Form state for the spiritual message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub title: String,
    pub author: String,
    pub full_text: String,
}

impl MessageDraft {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.author.is_empty() && self.full_text.is_empty()
    }

    fn from_server(existing: &SpiritualMessage) -> Self {
        Self {
            title: existing.title.clone(),
            author: existing.author.clone(),
            full_text: existing.full_text.clone(),
        }
    }
}

/// Editor for the spiritual message.
pub struct SpiritualMessageEditor {
    draft: Draft<MessageDraft>,
    hydrated: bool,
}

impl SpiritualMessageEditor {
    pub fn new(storage: Arc<dyn DraftStorage>) -> Self {
        Self {
            draft: Draft::new(storage, SPIRITUAL_MESSAGE_DRAFT_KEY, MessageDraft::default()),
            hydrated: false,
        }
    }

    pub fn draft(&self) -> &MessageDraft {
        self.draft.get()
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut MessageDraft)) {
        self.draft.update(|prev| {
            let mut next = prev.clone();
            f(&mut next);
            next
        });
    }

    /// Seed the draft from server state the first time it is observed,
    /// and only while all three fields are still empty.
    pub fn observe_server(&mut self, existing: &SpiritualMessage) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;
        if self.draft.get().is_empty() {
            self.draft.set(MessageDraft::from_server(existing));
        }
    }

    /// Explicitly replace the draft with the saved server record.
    pub fn load_existing(&mut self, existing: &SpiritualMessage) {
        self.draft.set(MessageDraft::from_server(existing));
    }

    pub fn discard(&mut self) {
        self.draft.clear();
    }

    /// Publish the staged message; the store stamps the date. The draft
    /// is cleared only on success.
    pub async fn submit(&mut self, service: &ContentService) -> Result<(), StoreError> {
        let staged = self.draft.get().clone();
        service
            .update_spiritual_message(&staged.title, &staged.author, &staged.full_text)
            .await?;
        self.draft.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::MemoryStorage;
    use chrono::Utc;

    fn server_message(title: &str) -> SpiritualMessage {
        SpiritualMessage {
            title: title.to_string(),
            date: Utc::now(),
            full_text: "The rosary is a treasury of graces.".to_string(),
            author: "Fr. Anthony".to_string(),
        }
    }

    #[test]
    fn test_hydrates_only_when_all_fields_empty() {
        let storage: Arc<dyn DraftStorage> = Arc::new(MemoryStorage::new());
        let mut editor = SpiritualMessageEditor::new(storage);

        editor.edit(|d| d.author = "Fr. Joseph".to_string());
        editor.observe_server(&server_message("On Prayer"));

        // A single touched field blocks hydration entirely.
        assert_eq!(editor.draft().author, "Fr. Joseph");
        assert!(editor.draft().title.is_empty());
    }

    #[test]
    fn test_hydration_happens_once() {
        let storage: Arc<dyn DraftStorage> = Arc::new(MemoryStorage::new());
        let mut editor = SpiritualMessageEditor::new(storage);

        editor.observe_server(&server_message("On Prayer"));
        editor.observe_server(&server_message("Replaced on server"));

        assert_eq!(editor.draft().title, "On Prayer");
        assert_eq!(editor.draft().author, "Fr. Anthony");
    }
}
