use serde::{Deserialize, Serialize};

/// A movie record as stored in the `Movies` collection.
///
/// `title` is the lookup key. `release_year` is kept as a string and is only
/// ever compared for exact equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub genre: String,
    pub release_year: String,
    /// Filled in per request by the summary endpoint, never written back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_summary: Option<String>,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        release_year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            release_year: release_year.into(),
            generated_summary: None,
        }
    }

    /// Return the record augmented with a generated summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.generated_summary = Some(summary.into());
        self
    }
}
