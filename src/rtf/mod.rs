//! RTF to plain text extraction.
//!
//! Converts RTF-formatted lyric source into normalized plain text suitable
//! for line-by-line display. The pipeline is a fixed sequence of pure string
//! transforms; extraction is best-effort and never fails — malformed input
//! degrades to returning the input unchanged.

// Allow unwrap for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::unwrap_used)]

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{Error, Result};

/// Sentinel standing in for an escaped or encoded backslash while control
/// words are stripped. Private-use code points cannot appear in valid RTF.
const ESC_BACKSLASH: char = '\u{E000}';
/// Sentinel for an escaped or encoded opening brace.
const ESC_OPEN_BRACE: char = '\u{E001}';
/// Sentinel for an escaped or encoded closing brace.
const ESC_CLOSE_BRACE: char = '\u{E002}';

/// Paragraph markers become newlines. `pard` must precede `par` in the
/// alternation; the word boundary keeps `\pardeftab` and friends intact for
/// the control-word pass.
static RE_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:pard|par|line)\b[ ]?").unwrap()
});
/// `\tab` becomes a literal tab character.
static RE_TAB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\tab\b[ ]?").unwrap()
});
/// Unicode escape: signed decimal code point, optional `?` placeholder.
static RE_UNICODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\u(-?\d+)\??").unwrap()
});
/// Hex-byte escape `\'XX`.
static RE_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\'([0-9a-fA-F]{2})").unwrap()
});
/// Control words with a numeric parameter, e.g. `\fi-360`. The delimiter is
/// one optional space — never broader whitespace, which would consume the
/// newlines the paragraph pass just inserted and glue adjacent text runs.
static RE_CONTROL_NUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[a-zA-Z]+-?\d+[ ]?").unwrap()
});
/// Bare control words, e.g. `\b`. Same single-space delimiter rule.
static RE_CONTROL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[a-zA-Z]+[ ]?").unwrap()
});
/// A single-level brace group with no nested braces.
static RE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]*)\}").unwrap()
});
/// Stray brace after group unwrapping.
static RE_BRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[{}]").unwrap()
});
/// CRLF or lone CR line endings.
static RE_LINE_ENDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n?").unwrap()
});
/// Three or more consecutive newlines.
static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").unwrap()
});
/// Runs of two or more spaces/tabs.
static RE_SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]{2,}").unwrap()
});

/// Check whether text looks like an RTF document (`{\rtf` after leading
/// whitespace).
pub fn is_rtf(text: &str) -> bool {
    text.trim_start().starts_with("{\\rtf")
}

/// Convert RTF source to normalized plain text.
///
/// Non-RTF input is returned unchanged, and any internal pipeline failure
/// also degrades to returning the input — garbled output is preferable to a
/// hard failure that blocks lyric display.
pub fn extract_plain_text(rtf: &str) -> String {
    if !is_rtf(rtf) {
        return rtf.to_string();
    }

    match run_pipeline(rtf) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("RTF extraction failed, returning input unchanged: {e}");
            rtf.to_string()
        }
    }
}

/// Collapse runs of 3+ newlines to exactly two.
///
/// Also applied to delegated-parser output so both extraction strategies
/// agree on paragraph spacing. Idempotent.
pub fn collapse_blank_runs(text: &str) -> String {
    RE_BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

/// The ordered transform pipeline. Order matters: later steps assume the
/// cleanups of earlier ones.
fn run_pipeline(rtf: &str) -> Result<String> {
    let text = strip_destination_groups(rtf)?;
    let text = protect_escaped_literals(&text);

    let text = RE_PARAGRAPH.replace_all(&text, "\n");
    let text = RE_TAB.replace_all(&text, "\t");

    let text = RE_UNICODE.replace_all(&text, |caps: &Captures<'_>| {
        decode_unicode_escape(&caps[1])
    });
    let text = RE_HEX.replace_all(&text, |caps: &Captures<'_>| {
        decode_hex_escape(&caps[1])
    });

    // Numeric-parameter forms first so `\fi-360` is not left as `\fi` + `-360`
    let text = RE_CONTROL_NUM.replace_all(&text, "");
    let text = RE_CONTROL.replace_all(&text, "");

    // Unwrap innermost groups, then delete whatever braces remain
    let text = RE_GROUP.replace_all(&text, "${1}");
    let text = RE_BRACE.replace_all(&text, "");

    let text = RE_LINE_ENDING.replace_all(&text, "\n");
    let text = RE_BLANK_RUN.replace_all(&text, "\n\n");
    let text = RE_SPACE_RUN.replace_all(&text, " ");

    Ok(restore_escaped_literals(&text))
}

/// Header destination groups that carry no display text even without a `\*`
/// tag.
const DESTINATION_TAGS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "expandedcolortbl",
    "stylesheet",
    "info",
    "generator",
];

/// Delete destination groups — `{\*...}` extended groups and the named header
/// tables above — including nested braces and all content.
///
/// Braces preceded by a backslash are literals and do not affect nesting
/// depth. An unterminated group is a parse error; the caller degrades to
/// passthrough.
fn strip_destination_groups(input: &str) -> Result<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if starts_destination_group(&chars, i) {
            i = skip_balanced_group(&chars, i)
                .ok_or_else(|| Error::parse("unterminated destination group", None))?;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    Ok(out)
}

/// Check whether a destination group opens at index `i`.
fn starts_destination_group(chars: &[char], i: usize) -> bool {
    if chars.get(i) != Some(&'{') || chars.get(i + 1) != Some(&'\\') {
        return false;
    }
    if chars.get(i + 2) == Some(&'*') {
        return true;
    }
    let tag: String = chars[i + 2..]
        .iter()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    DESTINATION_TAGS.contains(&tag.as_str())
}

/// Return the index just past the balanced group opening at `start`, or
/// `None` if the group never closes.
fn skip_balanced_group(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0_usize;
    let mut escaped = false;

    for (offset, &c) in chars[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Replace escaped literal `\\`, `\{`, `\}` with sentinels so the control
/// word and brace passes cannot consume them. `\\` must go first.
fn protect_escaped_literals(text: &str) -> String {
    text.replace("\\\\", &ESC_BACKSLASH.to_string())
        .replace("\\{", &ESC_OPEN_BRACE.to_string())
        .replace("\\}", &ESC_CLOSE_BRACE.to_string())
}

/// Restore sentinels to the literal characters they stand for.
fn restore_escaped_literals(text: &str) -> String {
    text.replace(ESC_BACKSLASH, "\\")
        .replace(ESC_OPEN_BRACE, "{")
        .replace(ESC_CLOSE_BRACE, "}")
}

/// Decode the numeric payload of a `\uN` escape.
///
/// Negative code points are normalized by adding 65536. Unparseable payloads
/// and code points with no valid `char` (the surrogate range) resolve to an
/// empty string rather than an error.
fn decode_unicode_escape(payload: &str) -> String {
    let Ok(mut code) = payload.parse::<i32>() else {
        return String::new();
    };
    if code < 0 {
        code += 65536;
    }
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map_or_else(String::new, protect_decoded)
}

/// Decode the two hex digits of a `\'XX` escape as a Latin-1 byte.
fn decode_hex_escape(digits: &str) -> String {
    u8::from_str_radix(digits, 16)
        .map(char::from)
        .map_or_else(|_| String::new(), protect_decoded)
}

/// Escape-decoded braces and backslashes are content, not syntax; map them to
/// sentinels so the remaining passes leave them alone.
fn protect_decoded(c: char) -> String {
    match c {
        '\\' => ESC_BACKSLASH.to_string(),
        '{' => ESC_OPEN_BRACE.to_string(),
        '}' => ESC_CLOSE_BRACE.to_string(),
        _ => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_simple_rtf() {
        let rtf = r"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Test text\par}";
        let result = extract_plain_text(rtf);
        assert!(result.contains("Test text"));
        assert!(!result.contains("Helvetica"));
        assert!(!result.contains('\\'));
        assert!(!result.contains('{'));
    }

    #[test]
    fn test_non_rtf_passthrough() {
        assert_eq!(extract_plain_text("plain text"), "plain text");
        assert_eq!(extract_plain_text(""), "");
        assert_eq!(extract_plain_text("  not rtf {\\b}"), "  not rtf {\\b}");
    }

    #[test]
    fn test_leading_whitespace_still_rtf() {
        let result = extract_plain_text("  {\\rtf1 Hello\\par}");
        assert!(result.contains("Hello"));
        assert!(!result.contains("\\par"));
    }

    #[test]
    fn test_paragraph_markers_become_newlines() {
        let result = extract_plain_text(r"{\rtf1 Line1\par Line2\par}");
        let lines: Vec<&str> = result.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["Line1", "Line2"]);
    }

    #[test]
    fn test_pardeftab_is_not_a_paragraph_marker() {
        let result = extract_plain_text(r"{\rtf1\pard\pardeftab1680 Text\par}");
        assert!(result.contains("Text"));
        assert!(!result.contains("eftab"));
    }

    #[test]
    fn test_tab_escape() {
        let result = extract_plain_text(r"{\rtf1 a\tab b}");
        assert!(result.contains("a\tb"));
    }

    #[test]
    fn test_unicode_escape() {
        let result = extract_plain_text(r"{\rtf1 \u1088?}");
        assert!(result.contains('\u{0440}'));
    }

    #[test]
    fn test_unicode_escape_negative() {
        let result = extract_plain_text(r"{\rtf1 \u-1?}");
        assert!(result.contains('\u{FFFF}'));
    }

    #[test]
    fn test_unicode_escape_unparseable_is_dropped() {
        // Payload overflows i32 — resolves to empty string, no failure
        let result = extract_plain_text(r"{\rtf1 a\u99999999999?b}");
        assert!(result.contains("ab"));
    }

    #[test]
    fn test_unicode_escape_surrogate_is_dropped() {
        let result = extract_plain_text(r"{\rtf1 a\u55296?b}");
        assert!(result.contains("ab"));
    }

    #[test]
    fn test_hex_escape() {
        let result = extract_plain_text(r"{\rtf1 \'41}");
        assert!(result.contains('A'));
    }

    #[test]
    fn test_hex_escaped_brace_survives() {
        let result = extract_plain_text(r"{\rtf1 \'7bchorus\'7d}");
        assert!(result.contains("{chorus}"));
    }

    #[test]
    fn test_escaped_literal_braces_survive() {
        let result = extract_plain_text(r"{\rtf1 a\{b\}c}");
        assert!(result.contains("a{b}c"));
    }

    #[test]
    fn test_starred_group_with_nesting_removed() {
        let rtf = r"{\rtf1{\*\expandedcolortbl;;{\csgray\c100000};}Verse\par}";
        let result = extract_plain_text(rtf);
        assert!(result.contains("Verse"));
        assert!(!result.contains("csgray"));
    }

    #[test]
    fn test_unterminated_starred_group_degrades_to_input() {
        let rtf = r"{\rtf1{\*\fonttbl never closed";
        assert_eq!(extract_plain_text(rtf), rtf);
    }

    #[test]
    fn test_control_words_with_negative_parameter() {
        let result = extract_plain_text(r"{\rtf1\fi-360\li360 Indented\par}");
        assert!(result.contains("Indented"));
        assert!(!result.contains("360"));
    }

    #[test]
    fn test_no_control_syntax_in_output() {
        let rtf = r"{\rtf1\ansi\ansicpg1252{\fonttbl\f0\fswiss Helvetica;}\f0\fs160 Hey\par there\par}";
        let result = extract_plain_text(rtf);
        assert!(!result.contains("\\par"));
        assert!(!result.contains("\\pard"));
        assert!(!result.contains("\\line"));
        assert!(!result.contains('{'));
        assert!(!result.contains('}'));
    }

    #[test]
    fn test_control_words_preserve_paragraph_breaks() {
        // A control word right after an inserted newline must not swallow
        // that newline and merge with the following text run
        let result = extract_plain_text("{\\rtf1\\ansi\\pard Line1\\par\n\\f0 Line2\\par}");
        let lines: Vec<&str> = result.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["Line1", "Line2"]);
    }

    #[test]
    fn test_space_runs_collapse() {
        let result = extract_plain_text("{\\rtf1 a     b}");
        assert!(result.contains("a b"));
    }

    #[test]
    fn test_collapse_blank_runs_idempotent() {
        let collapsed = collapse_blank_runs("a\n\n\n\n\nb\n\n\nc");
        assert_eq!(collapsed, "a\n\nb\n\nc");
        assert_eq!(collapse_blank_runs(&collapsed), collapsed);
    }
}
