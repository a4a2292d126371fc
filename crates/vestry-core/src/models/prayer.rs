use serde::{Deserialize, Serialize};

/// A prayer text in one language.
///
/// `language` is free text, conventionally "Telugu" or "English"; the store
/// filters by exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    pub title: String,
    pub language: String,
    pub content: String,
}
