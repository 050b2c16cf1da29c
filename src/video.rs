//! Video reference parsing
//!
//! Turns a user-supplied video reference (a watch URL, a short link, an embed
//! URL, or a bare id) into the canonical [`VideoId`] the player needs.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Canonical video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([^&\n?#]+)",
            r"^([a-zA-Z0-9_-]{11})$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("video id pattern is valid"))
        .collect()
    })
}

/// Extract the canonical video id from a URL or bare id.
///
/// Patterns are tried in order; the first match wins. Returns `None` when
/// nothing matches.
///
/// # Example
/// ```rust
/// use boardsync::extract_video_id;
///
/// let id = extract_video_id("https://www.youtube.com/watch?v=abc12345678").unwrap();
/// assert_eq!(id.as_str(), "abc12345678");
/// assert!(extract_video_id("not a url").is_none());
/// ```
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    patterns()
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}
