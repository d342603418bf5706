//! Display-line segmentation.
//!
//! Splits normalized plain text into trimmed, non-empty display lines. When a
//! naive newline split yields implausibly few lines for the text length
//! (lyrics pasted as one run), heuristic re-segmentation recovers line breaks
//! from sentence punctuation, casing transitions, or stray backslash markers.

// Allow unwrap for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::unwrap_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Abbreviations whose trailing period does not end a sentence.
const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Dr", "Ms", "Ltd", "Inc", "St", "Jr", "Sr", "Prof", "Rev",
];

/// Sentence-ending punctuation followed by whitespace. The surrounding
/// context (preceding word, following letter) is inspected in the source
/// string by index, so consecutive boundaries never overlap a match.
static RE_SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?]\s+").unwrap()
});
/// Lowercase-to-uppercase transition inside a run with no separators.
static RE_CASE_TRANSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zа-яё])([A-ZА-ЯЁ])").unwrap()
});
/// Internal whitespace runs within a single line.
static RE_INNER_WS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap()
});
/// A line consisting entirely of punctuation or symbols.
static RE_PUNCT_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{P}\p{S}]+$").unwrap()
});

/// Thresholds and the abbreviation list for heuristic re-segmentation.
///
/// The defaults are empirically tuned; override them through configuration
/// rather than editing them here.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Re-segmentation triggers when a naive split yields at most this many
    /// lines (default: 3).
    pub max_naive_lines: usize,
    /// ...while the source text is longer than this many characters
    /// (default: 200).
    pub reseg_min_len: usize,
    /// Lines longer than this many characters with no whitespace are split
    /// at casing transitions (default: 100).
    pub unbroken_line_len: usize,
    /// Words whose trailing period never triggers a sentence break.
    pub abbreviations: Vec<String>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            max_naive_lines: 3,
            reseg_min_len: 200,
            unbroken_line_len: 100,
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SegmentOptions {
    /// Check whether a word precedes its period as a known abbreviation.
    fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.iter().any(|a| a.eq_ignore_ascii_case(word))
    }
}

/// Split plain text into display lines with default options.
pub fn to_display_lines(text: &str) -> Vec<String> {
    to_display_lines_with(text, &SegmentOptions::default())
}

/// Split plain text into ordered, trimmed, non-empty display lines.
///
/// Lines consisting solely of punctuation or symbols are discarded. Order is
/// stable top-to-bottom.
pub fn to_display_lines_with(text: &str, opts: &SegmentOptions) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect();

    // Thresholds are phrased in characters so non-ASCII text is measured the
    // same as Latin
    if lines.len() <= opts.max_naive_lines && text.chars().count() > opts.reseg_min_len {
        lines = resegment(&lines, opts);
    }

    // A lone long line full of backslashes is concatenated lyric lines whose
    // break markers survived as literal backslashes
    if lines.len() == 1 {
        let only = &lines[0];
        if only.contains('\\') && only.chars().count() > opts.reseg_min_len {
            lines = only.split('\\').map(ToString::to_string).collect();
        }
    }

    lines
        .iter()
        .map(|l| RE_INNER_WS.replace_all(l.trim(), " ").into_owned())
        .filter(|l| !l.is_empty())
        .filter(|l| !RE_PUNCT_ONLY.is_match(l))
        .collect()
}

/// Heuristic re-segmentation, keeping the first strategy that increases the
/// line count, then splitting any still-unbroken long lines at casing
/// transitions.
fn resegment(lines: &[String], opts: &SegmentOptions) -> Vec<String> {
    let joined = lines.join("\n");

    let mut result = break_sentences(&joined, opts, true);
    if result.len() <= lines.len() {
        result = break_sentences(&joined, opts, false);
    }
    if result.len() <= lines.len() {
        result = lines.to_vec();
    }

    result
        .iter()
        .flat_map(|line| split_unbroken_line(line, opts))
        .collect()
}

/// Break after sentence-ending punctuation, unless the preceding word is a
/// known abbreviation. With `require_upper`, a break also needs an uppercase
/// letter (Latin or Cyrillic) right after the whitespace.
///
/// Boundaries are located by index in the source text; the lookaround context
/// is never part of the match, so an abbreviation that opens a sentence is
/// seen whole by the suppression check.
fn break_sentences(text: &str, opts: &SegmentOptions, require_upper: bool) -> Vec<String> {
    let mut broken = String::with_capacity(text.len());
    let mut last = 0;

    for m in RE_SENTENCE_END.find_iter(text) {
        if require_upper
            && !text[m.end()..].chars().next().is_some_and(is_sentence_upper)
        {
            continue;
        }
        if opts.is_abbreviation(preceding_word(text, m.start())) {
            continue;
        }
        // The punctuation mark is the single byte at m.start(); keep it,
        // replace the whitespace with a break
        broken.push_str(&text[last..=m.start()]);
        broken.push('\n');
        last = m.end();
    }
    broken.push_str(&text[last..]);

    broken.split('\n').map(ToString::to_string).collect()
}

/// Uppercase letter that can open a sentence, Latin or Cyrillic.
fn is_sentence_upper(c: char) -> bool {
    c.is_ascii_uppercase() || ('А'..='Я').contains(&c) || c == 'Ё'
}

/// The run of alphabetic characters immediately before byte index `end`.
fn preceding_word(text: &str, end: usize) -> &str {
    let head = &text[..end];
    head.char_indices()
        .rev()
        .find(|(_, c)| !c.is_alphabetic())
        .map_or(head, |(i, c)| &head[i + c.len_utf8()..])
}

/// Split a whitespace-free overlong line at lowercase-to-uppercase
/// transitions (concatenated words lacking separators). Other lines pass
/// through untouched.
fn split_unbroken_line(line: &str, opts: &SegmentOptions) -> Vec<String> {
    if line.chars().count() <= opts.unbroken_line_len || line.contains(char::is_whitespace) {
        return vec![line.to_string()];
    }
    RE_CASE_TRANSITION
        .replace_all(line, "${1}\n${2}")
        .split('\n')
        .map(ToString::to_string)
        .collect()
}
