//! `lyrictext` - lyric text extraction and normalization for karaoke display.
//!
//! Converts lyric source documents (RTF, LRC, plain text) into normalized
//! plain text and ordered display lines. Extraction is best-effort and never
//! fails; malformed input degrades to a defined fallback rather than an
//! error.

// Re-export public modules for use in integration tests and as a library
pub mod config;
pub mod error;
pub mod extract;
pub mod lrc;
pub mod rtf;
pub mod segment;
pub mod types;
