//! Data models for parish content entities.
//!
//! This module contains the data structures held in the remote content
//! store:
//!
//! - `MassTiming`: one service on the weekly schedule, plus sorting
//! - `Prayer`: a prayer text filtered by language
//! - `Announcement`: the singleton banner record
//! - `MediaItem`: gallery entries (links, videos, or inline payloads)
//! - `SpiritualMessage`: the singleton message from the parish priest

pub mod announcement;
pub mod media;
pub mod message;
pub mod prayer;
pub mod schedule;

pub use announcement::Announcement;
pub use media::{data_url, MediaItem, MediaType};
pub use message::SpiritualMessage;
pub use prayer::Prayer;
pub use schedule::{sort_mass_schedule, MassTiming, Weekday, DAYS, SERVICE_TYPES};
