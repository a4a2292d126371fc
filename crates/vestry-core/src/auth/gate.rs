use std::sync::Arc;

use tracing::info;

use crate::admin::{
    ANNOUNCEMENT_DRAFT_KEY, MASS_SCHEDULE_DRAFT_KEY, MEDIA_GALLERY_DRAFT_KEY,
    SPIRITUAL_MESSAGE_DRAFT_KEY,
};
use crate::drafts::DraftStorage;

/// Storage key holding the session flag.
const SESSION_KEY: &str = "auth_session";

/// Value marking a logged-in session.
const SESSION_VALUE: &str = "authenticated";

/// Draft keys swept on logout, one per admin module.
pub const DRAFT_KEYS: [&str; 4] = [
    MASS_SCHEDULE_DRAFT_KEY,
    SPIRITUAL_MESSAGE_DRAFT_KEY,
    MEDIA_GALLERY_DRAFT_KEY,
    ANNOUNCEMENT_DRAFT_KEY,
];

/// The password gate in front of the admin surface. Injectable rather
/// than process-global so tests can run independent instances.
pub struct SessionGate {
    storage: Arc<dyn DraftStorage>,
    secret: String,
}

impl SessionGate {
    pub fn new(storage: Arc<dyn DraftStorage>, secret: impl Into<String>) -> Self {
        Self {
            storage,
            secret: secret.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.storage.get(SESSION_KEY).as_deref() == Some(SESSION_VALUE)
    }

    /// Compare against the shared secret; set the session flag on a match.
    pub fn login(&self, password: &str) -> bool {
        if password == self.secret {
            self.storage.put(SESSION_KEY, SESSION_VALUE);
            info!("Admin session opened");
            true
        } else {
            false
        }
    }

    /// Clear the session flag and every known draft.
    pub fn logout(&self) {
        self.storage.remove(SESSION_KEY);
        for key in DRAFT_KEYS {
            self.storage.remove(key);
        }
        info!("Admin session closed");
    }
}
