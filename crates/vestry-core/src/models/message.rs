use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The spiritual message from the parish priest. Singleton on the store
/// side; updates replace the whole record and the store stamps the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiritualMessage {
    pub title: String,
    pub date: DateTime<Utc>,
    pub full_text: String,
    pub author: String,
}
