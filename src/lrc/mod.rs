//! LRC tag stripping.
//!
//! Recovers plain lyric text from LRC files by dropping metadata tag lines
//! (`[ar:..]`, `[ti:..]`, ...) and removing inline `[mm:ss.xx]` time tags.
//! Timing itself is the display collaborator's concern; only the text
//! survives here.

// Allow unwrap for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::unwrap_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Inline time tag, e.g. `[01:23.45]`, `[1:23]`, `[01:23:456]`.
static RE_TIME_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d{1,3}:\d{2}(?:[.:]\d{1,3})?\]").unwrap()
});
/// Metadata tag line, e.g. `[ar:Artist]`, `[ti:Title]`, `[offset:500]`.
static RE_META_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[[a-zA-Z#][a-zA-Z]*:[^\]]*\]\s*$").unwrap()
});

/// Check whether text looks like an LRC document (any line opening with a
/// time tag).
pub fn is_lrc(text: &str) -> bool {
    text.lines().any(|l| RE_TIME_TAG.find(l.trim_start()).is_some_and(|m| m.start() == 0))
}

/// Strip LRC tags, keeping lyric text in original order.
///
/// Metadata lines are dropped wholesale; time tags are removed wherever they
/// appear in a line (including mid-line tags from enhanced LRC).
pub fn strip_timestamps(lrc: &str) -> String {
    lrc.lines()
        .filter(|line| !RE_META_LINE.is_match(line))
        .map(|line| RE_TIME_TAG.replace_all(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
