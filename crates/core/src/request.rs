//! Generation request types and validation.
//!
//! A [`GenerationRequest`] captures everything the backend needs to
//! produce one short-form video: the subject (actor) name, the video
//! style, and the render settings. Requests are validated client-side
//! before any network call is made.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Duration bounds
// ---------------------------------------------------------------------------

/// Shortest video the backend will render, in seconds.
pub const MIN_DURATION_SECS: u32 = 10;
/// Longest video the backend will render, in seconds.
pub const MAX_DURATION_SECS: u32 = 60;
/// Default video length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 30;

// ---------------------------------------------------------------------------
// Video type
// ---------------------------------------------------------------------------

/// The style of video to generate.
///
/// Identifiers are kebab-case on the wire (`most-successful`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoType {
    MostSuccessful,
    WorstRated,
    BestRated,
    MostControversial,
    Chronological,
    AwardWinning,
}

impl VideoType {
    /// Every recognized video type, in presentation order.
    pub const ALL: &'static [VideoType] = &[
        VideoType::MostSuccessful,
        VideoType::WorstRated,
        VideoType::BestRated,
        VideoType::MostControversial,
        VideoType::Chronological,
        VideoType::AwardWinning,
    ];

    /// Wire identifier for this video type.
    pub fn id(&self) -> &'static str {
        match self {
            VideoType::MostSuccessful => "most-successful",
            VideoType::WorstRated => "worst-rated",
            VideoType::BestRated => "best-rated",
            VideoType::MostControversial => "most-controversial",
            VideoType::Chronological => "chronological",
            VideoType::AwardWinning => "award-winning",
        }
    }

    /// Human-readable label for presentation layers.
    pub fn label(&self) -> &'static str {
        match self {
            VideoType::MostSuccessful => "Most Successful Movies",
            VideoType::WorstRated => "Worst Rated Movies",
            VideoType::BestRated => "Best Rated Movies",
            VideoType::MostControversial => "Most Controversial Movies",
            VideoType::Chronological => "Chronological Journey",
            VideoType::AwardWinning => "Award Winning Performances",
        }
    }
}

impl std::str::FromStr for VideoType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoType::ALL
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown video type '{s}'. Must be one of: {}",
                    VideoType::ALL
                        .iter()
                        .map(|t| t.id())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Video quality
// ---------------------------------------------------------------------------

/// Output resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "480p")]
    Sd480,
}

impl VideoQuality {
    /// Wire identifier for this quality tier.
    pub fn id(&self) -> &'static str {
        match self {
            VideoQuality::Hd1080 => "1080p",
            VideoQuality::Hd720 => "720p",
            VideoQuality::Sd480 => "480p",
        }
    }
}

impl std::str::FromStr for VideoQuality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1080p" => Ok(VideoQuality::Hd1080),
            "720p" => Ok(VideoQuality::Hd720),
            "480p" => Ok(VideoQuality::Sd480),
            other => Err(CoreError::Validation(format!(
                "Unknown video quality '{other}'. Must be one of: 1080p, 720p, 480p"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Render settings
// ---------------------------------------------------------------------------

/// Tunable rendering parameters for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    /// Target video length in seconds, within
    /// [`MIN_DURATION_SECS`]..=[`MAX_DURATION_SECS`].
    pub duration_seconds: u32,
    pub quality: VideoQuality,
    /// Mix a background-music track into the result.
    pub include_music: bool,
    /// Burn generated subtitles into the result.
    pub include_subtitles: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_SECS,
            quality: VideoQuality::Hd1080,
            include_music: true,
            include_subtitles: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation request
// ---------------------------------------------------------------------------

/// One video-generation request, immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// The actor the video is about. Must be non-empty after trimming.
    pub subject_name: String,
    pub video_type: VideoType,
    pub settings: RenderSettings,
}

impl GenerationRequest {
    /// Create a request for `subject_name` with default render settings.
    pub fn new(subject_name: impl Into<String>, video_type: VideoType) -> Self {
        Self {
            subject_name: subject_name.into(),
            video_type,
            settings: RenderSettings::default(),
        }
    }

    /// Validate the request before submission.
    ///
    /// Runs entirely client-side. A request that fails here must never
    /// reach the network.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.subject_name.trim().is_empty() {
            return Err(CoreError::Validation("Actor name is required".to_string()));
        }
        validate_duration(self.settings.duration_seconds)
    }
}

/// Validate that a requested duration is within the supported range.
pub fn validate_duration(duration_seconds: u32) -> Result<(), CoreError> {
    if duration_seconds < MIN_DURATION_SECS {
        return Err(CoreError::Validation(format!(
            "Video duration must be at least {MIN_DURATION_SECS} seconds"
        )));
    }
    if duration_seconds > MAX_DURATION_SECS {
        return Err(CoreError::Validation(format!(
            "Video duration must be at most {MAX_DURATION_SECS} seconds"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
