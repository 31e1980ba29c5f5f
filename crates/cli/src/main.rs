//! Terminal front end for the shorts-generation backend.
//!
//! Submits one generation request, follows its progress until the
//! video is ready, prints the preview URL, and optionally schedules
//! the YouTube upload.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelgen_client::ShortsApi;
use reelgen_controller::JobController;
use reelgen_core::job::JobPhase;
use reelgen_core::publish::{
    PublishSettings, DEFAULT_DESCRIPTION_TEMPLATE, DEFAULT_TAGS, DEFAULT_TITLE_TEMPLATE,
};
use reelgen_core::request::{
    GenerationRequest, RenderSettings, VideoQuality, VideoType, DEFAULT_DURATION_SECS,
};

use crate::config::BackendConfig;

mod config;

#[derive(Debug, Parser)]
#[command(name = "reelgen", about = "Generate and publish short-form movie videos")]
struct Args {
    /// Actor the video is about.
    subject_name: String,

    /// Video style (most-successful, worst-rated, best-rated,
    /// most-controversial, chronological, award-winning).
    #[arg(long, default_value = "most-successful")]
    video_type: VideoType,

    /// Video length in seconds (10-60).
    #[arg(long, default_value_t = DEFAULT_DURATION_SECS)]
    duration: u32,

    /// Output quality (1080p, 720p, 480p).
    #[arg(long, default_value = "1080p")]
    quality: VideoQuality,

    /// Skip the background-music track.
    #[arg(long)]
    no_music: bool,

    /// Burn generated subtitles into the video.
    #[arg(long)]
    subtitles: bool,

    /// Schedule the YouTube upload for this RFC 3339 timestamp once
    /// the video is ready.
    #[arg(long)]
    publish_at: Option<DateTime<Utc>>,

    /// Title template; `[Actor Name]` is replaced by the subject name.
    #[arg(long, default_value = DEFAULT_TITLE_TEMPLATE)]
    title_template: String,

    /// Description template; `[Actor Name]` is replaced by the subject name.
    #[arg(long, default_value = DEFAULT_DESCRIPTION_TEMPLATE)]
    description_template: String,

    /// Comma-separated tags for the upload.
    #[arg(long, default_value = DEFAULT_TAGS)]
    tags: String,

    /// Publish as public instead of unlisted.
    #[arg(long)]
    public: bool,
}

impl Args {
    fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            subject_name: self.subject_name.clone(),
            video_type: self.video_type,
            settings: RenderSettings {
                duration_seconds: self.duration,
                quality: self.quality,
                include_music: !self.no_music,
                include_subtitles: self.subtitles,
            },
        }
    }

    fn to_publish(&self, publish_date: DateTime<Utc>) -> PublishSettings {
        PublishSettings {
            title_template: self.title_template.clone(),
            description_template: self.description_template.clone(),
            tags: self.tags.clone(),
            make_public: self.public,
            publish_date,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = BackendConfig::from_env();
    tracing::debug!(api_url = %config.api_url, "Using backend");

    let api = ShortsApi::new(config.api_url.clone());
    let mut controller = JobController::with_config(api, config.poll.clone());
    let mut rx = controller.subscribe();

    let job_id = controller.submit(args.to_request()).await?;
    println!("Job {job_id} accepted, generating...");

    let mut last_printed = 0u8;
    loop {
        rx.changed()
            .await
            .context("controller state channel closed")?;
        let state = rx.borrow_and_update().clone();
        match state.phase {
            JobPhase::Polling => {
                if state.progress > last_printed {
                    last_printed = state.progress;
                    println!("  {}%", state.progress);
                }
            }
            JobPhase::Completed => break,
            JobPhase::Failed => {
                anyhow::bail!(state
                    .error
                    .unwrap_or_else(|| "generation failed".to_string()))
            }
            JobPhase::Idle | JobPhase::Submitting => {}
        }
    }

    let url = controller.video_url().context("no job id recorded")?;
    println!("Video ready: {url}");

    if let Some(publish_at) = args.publish_at {
        controller.schedule_upload(&args.to_publish(publish_at)).await?;
        println!("Upload scheduled for {publish_at}");
    }

    Ok(())
}
