use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";
pub const DEFAULT_FETCH_COUNT: usize = 100;

const DEFAULT_ABOUT_MESSAGE: &str = "Unsplash\nwww.unsplash.com\n\n\
In 2013, Unsplash launched as a Tumblr blog with 10 high-resolution photos that could be \
used for anything. Today, Unsplash powers more people and products than any other visual \
search engine in the world, with more than 100 million images downloaded every month.\n\n\
We're building a community where the principles of sharing and openness have taken the \
place of copyright and red tape. Instead of photos being hoarded and shut down, photos on \
Unsplash are given as fuel for creativity.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Remote photo feed settings.
    pub feed: FeedConfig,
    /// Where downloads land and where saved photos are collected.
    pub storage: StorageConfig,
    /// Answer given by the permission broker for photo-library access.
    pub permission: PermissionPolicy,
    /// Spring parameters for the focus transition.
    pub animation: AnimationConfig,
    /// Text sent to the share sheet ahead of the image URL.
    pub share_prefix: String,
    /// Static "about" alert.
    pub about: AboutConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            storage: StorageConfig::default(),
            permission: PermissionPolicy::default(),
            animation: AnimationConfig::default(),
            share_prefix: "Checkout this image: ".to_string(),
            about: AboutConfig::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.feed.fetch_count > 0,
            "feed.fetch-count must be greater than zero"
        );
        ensure!(
            !self.feed.api_base.trim().is_empty(),
            "feed.api-base must not be empty"
        );
        ensure!(
            !self.feed.request_timeout.is_zero(),
            "feed.request-timeout must be greater than zero"
        );
        self.animation
            .validate()
            .context("invalid animation options")?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchOrdering {
    /// Every completed fetch replaces the gallery; the last response to arrive wins.
    #[default]
    LastArrival,
    /// Responses issued before the newest request are discarded.
    LatestRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FeedConfig {
    pub api_base: String,
    /// API credential. Falls back to `UNSPLASH_ACCESS_KEY` when unset.
    pub access_key: Option<String>,
    pub fetch_count: usize,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub fetch_ordering: FetchOrdering,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.unsplash.com".to_string(),
            access_key: None,
            fetch_count: DEFAULT_FETCH_COUNT,
            request_timeout: Duration::from_secs(30),
            fetch_ordering: FetchOrdering::default(),
        }
    }
}

impl FeedConfig {
    pub fn resolved_access_key(&self) -> Option<String> {
        self.access_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(ACCESS_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Scratch directory for downloaded images (`<id>.jpg`).
    pub download_dir: PathBuf,
    /// Library directory that plays the role of the device camera roll.
    pub photo_library_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            photo_library_dir: PathBuf::from("photos"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionPolicy {
    Granted,
    Denied,
    /// Not granted until the first request, which is approved.
    #[default]
    AskOnce,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from the target below which the spring may rest.
    pub rest_displacement: f32,
    /// Speed below which the spring may rest.
    pub rest_speed: f32,
    /// Stop at the target instead of overshooting it.
    pub overshoot_clamping: bool,
    #[serde(with = "humantime_serde")]
    pub frame_interval: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        // Equivalent of tension 40 / friction 7 in origami units.
        Self {
            stiffness: 230.2,
            damping: 22.0,
            mass: 1.0,
            rest_displacement: 0.001,
            rest_speed: 0.001,
            overshoot_clamping: true,
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.stiffness.is_finite() && self.stiffness > 0.0,
            "animation.stiffness must be positive"
        );
        ensure!(
            self.damping.is_finite() && self.damping >= 0.0,
            "animation.damping must be non-negative"
        );
        ensure!(
            self.mass.is_finite() && self.mass > 0.0,
            "animation.mass must be positive"
        );
        ensure!(
            self.rest_displacement > 0.0 && self.rest_speed > 0.0,
            "animation rest thresholds must be positive"
        );
        ensure!(
            !self.frame_interval.is_zero(),
            "animation.frame-interval must be greater than zero"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AboutConfig {
    pub title: String,
    pub message: String,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            title: "About".to_string(),
            message: DEFAULT_ABOUT_MESSAGE.to_string(),
        }
    }
}
