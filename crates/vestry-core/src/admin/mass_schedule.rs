use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::drafts::{Draft, DraftStorage};
use crate::service::ContentService;
use crate::store::StoreError;

pub const MASS_SCHEDULE_DRAFT_KEY: &str = "mass_schedule_draft";

/// Add-form draft for a new mass timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassTimingDraft {
    pub day: String,
    pub time: String,
    pub service_type: String,
}

impl Default for MassTimingDraft {
    fn default() -> Self {
        Self {
            day: "Sunday".to_string(),
            time: "06:30".to_string(),
            service_type: "Telugu Mass".to_string(),
        }
    }
}

/// Editor for the mass schedule. A pure add-form: the draft always starts
/// from the form defaults, never from server state.
pub struct MassScheduleEditor {
    draft: Draft<MassTimingDraft>,
}

impl MassScheduleEditor {
    pub fn new(storage: Arc<dyn DraftStorage>) -> Self {
        Self {
            draft: Draft::new(storage, MASS_SCHEDULE_DRAFT_KEY, MassTimingDraft::default()),
        }
    }

    pub fn draft(&self) -> &MassTimingDraft {
        self.draft.get()
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut MassTimingDraft)) {
        self.draft.update(|prev| {
            let mut next = prev.clone();
            f(&mut next);
            next
        });
    }

    pub fn discard(&mut self) {
        self.draft.clear();
    }

    /// Send the staged timing to the store. The draft is cleared only on
    /// success, so a failed submit stays staged for retry.
    pub async fn submit(&mut self, service: &ContentService) -> Result<(), StoreError> {
        let staged = self.draft.get().clone();
        service
            .add_mass_timing(&staged.day, &staged.time, &staged.service_type)
            .await?;
        self.draft.clear();
        Ok(())
    }
}
