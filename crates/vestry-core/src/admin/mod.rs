//! Admin editors: one per editable module of the admin panel.
//!
//! Each editor composes the content service with a persisted draft: it
//! optionally seeds the draft from server state the first time that state
//! is observed (and only while the draft is still untouched), lets the
//! admin edit field by field, and on submit sends the draft to the store
//! and clears it. A failed submit keeps the draft staged.

pub mod announcement;
pub mod mass_schedule;
pub mod media;
pub mod message;

pub use announcement::{AnnouncementDraft, AnnouncementEditor, ANNOUNCEMENT_DRAFT_KEY};
pub use mass_schedule::{MassScheduleEditor, MassTimingDraft, MASS_SCHEDULE_DRAFT_KEY};
pub use media::{MediaDraft, MediaEditor, MEDIA_GALLERY_DRAFT_KEY};
pub use message::{MessageDraft, SpiritualMessageEditor, SPIRITUAL_MESSAGE_DRAFT_KEY};
