//! Shared types for lyric loading.

use serde::Serialize;

use crate::lrc;
use crate::rtf;

/// Source format of a lyric document, detected from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricFormat {
    /// RTF document (`{\rtf` marker).
    Rtf,
    /// LRC timed-lyric file.
    Lrc,
    /// Plain text, used as-is.
    Plain,
}

impl LyricFormat {
    /// Detect the format of raw lyric source. RTF wins over LRC since an RTF
    /// body can coincidentally contain bracketed tags.
    pub fn detect(raw: &str) -> Self {
        if rtf::is_rtf(raw) {
            Self::Rtf
        } else if lrc::is_lrc(raw) {
            Self::Lrc
        } else {
            Self::Plain
        }
    }
}

/// Result of loading a lyric document: the detected format and the ordered
/// display lines.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedLyrics {
    /// Format the source was detected as.
    pub format: LyricFormat,
    /// Trimmed, non-empty display lines in source order.
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_detect_rtf() {
        assert_eq!(LyricFormat::detect("{\\rtf1 Hello}"), LyricFormat::Rtf);
        assert_eq!(LyricFormat::detect("  {\\rtf1 x}"), LyricFormat::Rtf);
    }

    #[test]
    fn test_detect_lrc() {
        assert_eq!(LyricFormat::detect("[00:12.00]Line"), LyricFormat::Lrc);
    }

    #[test]
    fn test_detect_plain() {
        assert_eq!(LyricFormat::detect("Just some lyrics"), LyricFormat::Plain);
        assert_eq!(LyricFormat::detect(""), LyricFormat::Plain);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&LyricFormat::Rtf).expect("serializable");
        assert_eq!(json, "\"rtf\"");
    }
}
