//! Extraction strategy and lyric loading.
//!
//! The host application may supply a more complete RTF parser; it is tried
//! first on every call and any failure falls back to the built-in pipeline.
//! The choice is an explicit parameter rather than an ambient global, and it
//! is re-evaluated per call so a delegate registered late still takes effect.

use crate::error::Result;
use crate::lrc;
use crate::rtf;
use crate::segment::{self, SegmentOptions};
use crate::types::{ExtractedLyrics, LyricFormat};

/// A strategy turning raw lyric source into plain text.
///
/// Implementations are synchronous and pure; they may fail, in which case the
/// caller falls back to [`BuiltinExtractor`].
pub trait TextExtractor {
    /// Name of this extractor, used in fallback log messages.
    fn name(&self) -> &str;

    /// Extract plain text from raw source.
    fn extract(&self, raw: &str) -> Result<String>;
}

/// The built-in regex-pipeline extractor. Infallible: malformed input
/// degrades to passthrough inside the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinExtractor;

impl TextExtractor for BuiltinExtractor {
    fn name(&self) -> &str {
        "builtin"
    }

    fn extract(&self, raw: &str) -> Result<String> {
        Ok(rtf::extract_plain_text(raw))
    }
}

/// Extract plain text, preferring the delegate when one is supplied.
///
/// Delegate output is normalized with the same blank-run collapsing as the
/// built-in pipeline. A delegate error is logged and swallowed; this function
/// never fails.
pub fn extract_with(delegate: Option<&dyn TextExtractor>, raw: &str) -> String {
    if let Some(ext) = delegate {
        match ext.extract(raw) {
            Ok(text) => return rtf::collapse_blank_runs(&text),
            Err(e) => {
                tracing::debug!(
                    "extractor '{}' failed, falling back to builtin: {e}",
                    ext.name()
                );
            }
        }
    }
    rtf::extract_plain_text(raw)
}

/// Load a lyric document with default options and no delegate.
pub fn load_lyrics(raw: &str) -> ExtractedLyrics {
    load_lyrics_with(None, raw, &SegmentOptions::default())
}

/// Format-aware plain text extraction.
///
/// The delegate, if any, is only consulted for RTF sources; LRC goes through
/// tag stripping and plain text passes through unchanged.
pub fn plain_text(delegate: Option<&dyn TextExtractor>, raw: &str) -> String {
    match LyricFormat::detect(raw) {
        LyricFormat::Rtf => extract_with(delegate, raw),
        LyricFormat::Lrc => lrc::strip_timestamps(raw),
        LyricFormat::Plain => raw.to_string(),
    }
}

/// Load a lyric document: detect format, extract plain text, segment into
/// display lines.
pub fn load_lyrics_with(
    delegate: Option<&dyn TextExtractor>,
    raw: &str,
    opts: &SegmentOptions,
) -> ExtractedLyrics {
    ExtractedLyrics {
        format: LyricFormat::detect(raw),
        lines: segment::to_display_lines_with(&plain_text(delegate, raw), opts),
    }
}
