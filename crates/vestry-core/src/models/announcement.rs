use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The site-wide announcement banner. At most one exists on the store side;
/// absence is represented as `None` at the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub text: String,
    pub event_date: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Announcement {
    /// The public banner renders only when active with non-empty text.
    pub fn is_visible(&self) -> bool {
        self.active && !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let mut a = Announcement {
            text: "Feast of the Holy Rosary starts Oct 7th".to_string(),
            event_date: None,
            active: true,
        };
        assert!(a.is_visible());

        a.active = false;
        assert!(!a.is_visible());

        a.active = true;
        a.text = "   ".to_string();
        assert!(!a.is_visible());
    }
}
