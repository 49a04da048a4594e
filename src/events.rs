use serde::Deserialize;

/// One photo from the feed. Identity is `id`; the record never changes once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub full_url: String,
    pub regular_url: String,
}

impl ImageRecord {
    pub fn new(
        id: impl Into<String>,
        full_url: impl Into<String>,
        regular_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_url: full_url.into(),
            regular_url: regular_url.into(),
        }
    }
}

// Wire shape of a feed entry: `{ id, urls: { regular, full, .. }, .. }`.
#[derive(Debug, Deserialize)]
struct FeedPhoto {
    id: String,
    urls: FeedUrls,
}

#[derive(Debug, Deserialize)]
struct FeedUrls {
    full: String,
    regular: String,
}

impl<'de> Deserialize<'de> for ImageRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let FeedPhoto { id, urls } = FeedPhoto::deserialize(deserializer)?;
        Ok(ImageRecord {
            id,
            full_url: urls.full,
            regular_url: urls.regular,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

/// Inbound gestures and toolbar presses from the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    Tap,
    Swipe(SwipeDirection),
    Refresh,
    Share,
    Save,
    Info,
    Status,
    Quit,
}

impl GalleryCommand {
    /// Parses one line of terminal input.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "tap" | "t" => Some(GalleryCommand::Tap),
            "next" | "n" | "right" => Some(GalleryCommand::Swipe(SwipeDirection::Next)),
            "prev" | "p" | "left" => Some(GalleryCommand::Swipe(SwipeDirection::Previous)),
            "refresh" | "r" => Some(GalleryCommand::Refresh),
            "share" => Some(GalleryCommand::Share),
            "save" | "s" => Some(GalleryCommand::Save),
            "info" | "i" => Some(GalleryCommand::Info),
            "status" => Some(GalleryCommand::Status),
            "quit" | "q" | "exit" => Some(GalleryCommand::Quit),
            _ => None,
        }
    }
}

/// A frame published by the animator task.
///
/// `generation` increases with every retarget; frames from an older
/// generation are never published once a newer one exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub generation: u64,
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    pub settled: bool,
}

impl AnimationFrame {
    pub fn resting(value: f32) -> Self {
        Self {
            generation: 0,
            value,
            velocity: 0.0,
            target: value,
            settled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_feed_shape() {
        let json = r#"[{
            "id": "abc",
            "width": 4000,
            "urls": {
                "raw": "https://images.example/raw",
                "full": "https://images.example/full",
                "regular": "https://images.example/regular",
                "small": "https://images.example/small"
            }
        }]"#;
        let images: Vec<ImageRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(
            images,
            vec![ImageRecord::new(
                "abc",
                "https://images.example/full",
                "https://images.example/regular"
            )]
        );
    }

    #[test]
    fn missing_urls_is_an_error() {
        let json = r#"{"id": "abc"}"#;
        assert!(serde_json::from_str::<ImageRecord>(json).is_err());
    }

    #[test]
    fn parses_terminal_commands() {
        assert_eq!(GalleryCommand::parse(" TAP "), Some(GalleryCommand::Tap));
        assert_eq!(
            GalleryCommand::parse("left"),
            Some(GalleryCommand::Swipe(SwipeDirection::Previous))
        );
        assert_eq!(GalleryCommand::parse("q"), Some(GalleryCommand::Quit));
        assert_eq!(GalleryCommand::parse("dance"), None);
    }
}
