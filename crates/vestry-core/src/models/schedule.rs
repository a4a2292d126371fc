//! Weekly mass schedule entries and their display ordering.

use serde::{Deserialize, Serialize};

/// One service on the weekly mass schedule.
///
/// Timings carry no id; the store returns them in insertion order and the
/// client re-sorts them for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassTiming {
    pub day: String,
    pub time: String,
    pub service_type: String,
}

/// Weekday names accepted by the admin form, in display order.
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Service types offered by the admin form. The store accepts free text;
/// these are the conventional labels.
pub const SERVICE_TYPES: [&str; 6] = [
    "Telugu Mass",
    "English Mass",
    "Confession",
    "Adoration",
    "Rosary Prayer",
    "Special Mass",
];

/// Weekday for sorting purposes. `Unknown` covers day strings that are not
/// a weekday name; they sort before Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Weekday {
    Unknown = 0,
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    /// Parse a day string into a Weekday enum value.
    pub fn from_str(s: &str) -> Self {
        match s {
            "Sunday" => Weekday::Sunday,
            "Monday" => Weekday::Monday,
            "Tuesday" => Weekday::Tuesday,
            "Wednesday" => Weekday::Wednesday,
            "Thursday" => Weekday::Thursday,
            "Friday" => Weekday::Friday,
            "Saturday" => Weekday::Saturday,
            _ => Weekday::Unknown,
        }
    }

    /// Numeric order for sorting (0 = Unknown, 1 = Sunday .. 7 = Saturday).
    pub fn order(&self) -> usize {
        *self as usize
    }
}

/// Sort a schedule for display: grouped by weekday Sunday through Saturday,
/// then by ascending lexical time string within each day. Stable, so equal
/// entries keep their store order.
pub fn sort_mass_schedule(schedule: &mut [MassTiming]) {
    schedule.sort_by(|a, b| {
        Weekday::from_str(&a.day)
            .order()
            .cmp(&Weekday::from_str(&b.day).order())
            .then_with(|| a.time.cmp(&b.time))
    });
}
