//! YouTube publish settings and metadata templating.
//!
//! Title and description are authored as templates containing the
//! [`SUBJECT_PLACEHOLDER`] token; rendering substitutes the subject
//! name of the generated video. The publish date must lie strictly in
//! the future at scheduling time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Placeholder token replaced by the subject name when rendering
/// title/description templates.
pub const SUBJECT_PLACEHOLDER: &str = "[Actor Name]";

/// Default title template offered to users.
pub const DEFAULT_TITLE_TEMPLATE: &str = "[Actor Name]'s Movie Journey";
/// Default description template offered to users.
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str =
    "Exploring the incredible filmography of [Actor Name]...";
/// Default comma-separated tag list.
pub const DEFAULT_TAGS: &str = "movies, actor, film history";

/// Scheduling metadata for publishing a finished video to YouTube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSettings {
    /// Title template; may contain [`SUBJECT_PLACEHOLDER`].
    pub title_template: String,
    /// Description template; may contain [`SUBJECT_PLACEHOLDER`].
    pub description_template: String,
    /// Comma-separated tags.
    pub tags: String,
    /// Publish as public rather than unlisted.
    pub make_public: bool,
    /// When the video goes live. Must be in the future when scheduled.
    pub publish_date: Timestamp,
}

impl PublishSettings {
    /// Default settings publishing at `publish_date`.
    pub fn new(publish_date: Timestamp) -> Self {
        Self {
            title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
            description_template: DEFAULT_DESCRIPTION_TEMPLATE.to_string(),
            tags: DEFAULT_TAGS.to_string(),
            make_public: false,
            publish_date,
        }
    }

    /// Validate the settings against the clock value `now`.
    ///
    /// `now` is passed in rather than sampled here so callers (and
    /// tests) control the clock. Runs before any network call.
    pub fn validate(&self, now: Timestamp) -> Result<(), CoreError> {
        if self.publish_date <= now {
            return Err(CoreError::Validation(
                "Publish date must be in the future".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the title for a video about `subject_name`.
    pub fn render_title(&self, subject_name: &str) -> String {
        render_template(&self.title_template, subject_name)
    }

    /// Render the description for a video about `subject_name`.
    pub fn render_description(&self, subject_name: &str) -> String {
        render_template(&self.description_template, subject_name)
    }

    /// Split the comma-separated tag string into trimmed, non-empty tags.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Replace every occurrence of [`SUBJECT_PLACEHOLDER`] in `template`
/// with `subject_name`.
pub fn render_template(template: &str, subject_name: &str) -> String {
    template.replace(SUBJECT_PLACEHOLDER, subject_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
