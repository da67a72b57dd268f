//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;
use crate::models::{QualityLevel, TargetFormat, TransitionSettings};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Media normalization and tool-timeout settings.
    #[serde(default)]
    pub media: MediaSettings,

    /// Avatar synthesis settings.
    #[serde(default)]
    pub avatar: AvatarSettings,

    /// Default transition between appended segments.
    #[serde(default)]
    pub transitions: TransitionSettings,
}

/// Identifies a settings section for atomic updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Media,
    Avatar,
    Transitions,
}

impl ConfigSection {
    /// The TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Media => "media",
            ConfigSection::Avatar => "avatar",
            ConfigSection::Transitions => "transitions",
        }
    }
}

/// Path configuration for output, temp, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for generated videos.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root folder for per-generation working directories.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "generated".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format (filter progress lines).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Show timestamps in log lines.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            progress_step: default_progress_step(),
            show_timestamps: true,
        }
    }
}

impl LoggingSettings {
    /// Build a per-generation logger config from these settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            compact: self.compact,
            progress_step: self.progress_step,
            show_timestamps: self.show_timestamps,
            ..LogConfig::default()
        }
    }
}

/// Media normalization standard and external-tool timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSettings {
    /// Target width for normalized segments.
    #[serde(default = "default_width")]
    pub target_width: u32,

    /// Target height for normalized segments.
    #[serde(default = "default_height")]
    pub target_height: u32,

    /// Target frame rate for normalized segments.
    #[serde(default = "default_fps")]
    pub target_fps: u32,

    /// ffmpeg video encoder.
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// ffmpeg audio encoder.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate for encodes.
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// x264 preset for encodes.
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant rate factor for encodes.
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Budget for a single probe invocation, in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Budget for a single transcode invocation, in seconds.
    #[serde(default = "default_transcode_timeout")]
    pub transcode_timeout_secs: u64,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_fps() -> u32 {
    30
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_crf() -> u32 {
    23
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_transcode_timeout() -> u64 {
    600
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            target_width: default_width(),
            target_height: default_height(),
            target_fps: default_fps(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            preset: default_preset(),
            crf: default_crf(),
            probe_timeout_secs: default_probe_timeout(),
            transcode_timeout_secs: default_transcode_timeout(),
        }
    }
}

impl MediaSettings {
    /// The normalization target these settings describe.
    pub fn target_format(&self) -> TargetFormat {
        TargetFormat {
            width: self.target_width,
            height: self.target_height,
            fps: self.target_fps,
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            audio_bitrate: self.audio_bitrate.clone(),
            preset: self.preset.clone(),
            crf: self.crf,
        }
    }

    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Transcode timeout as a [`Duration`].
    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }
}

/// Avatar synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarSettings {
    /// Reference image used when a request supplies no reference video.
    /// Its absence is a hard failure; there is no fallback image.
    #[serde(default = "default_reference_image")]
    pub default_reference_image: String,

    /// Default quality level for avatar synthesis.
    #[serde(default)]
    pub default_quality: QualityLevel,
}

fn default_reference_image() -> String {
    "assets/default_avatar.png".to_string()
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            default_reference_image: default_reference_image(),
            default_quality: QualityLevel::default(),
        }
    }
}
