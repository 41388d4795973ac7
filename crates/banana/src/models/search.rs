use serde::{Deserialize, Serialize};

/// A web result used to ground the system prompt; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

impl SearchResult {
    pub fn new<T, D, U>(title: T, description: D, url: U) -> Self
    where
        T: Into<String>,
        D: Into<String>,
        U: Into<String>,
    {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
        }
    }
}
