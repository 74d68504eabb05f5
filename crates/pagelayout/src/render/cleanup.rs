use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

fn hyphen_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\p{L})-[ \t]*\n[ \t]*(\p{Ll})").unwrap())
}

fn horizontal_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

fn blank_lines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap())
}

/// Tidy text coming out of token joins or an OCR engine.
///
/// Normalizes to NFC, expands typographic ligatures, drops replacement
/// characters and form feeds, rejoins words hyphenated across a line break,
/// collapses runs of spaces and tabs, squeezes blank-line runs to one blank
/// line and trims the result.
pub fn clean_text(text: &str) -> String {
    let mut result: String = text
        .nfc()
        .filter(|c| *c != '\u{FFFD}' && *c != '\u{000C}')
        .collect();

    for (ligature, expansion) in LIGATURES {
        if result.contains(ligature) {
            result = result.replace(ligature, expansion);
        }
    }

    let result = hyphen_break().replace_all(&result, "$1$2");
    let result = horizontal_space().replace_all(&result, " ");
    let result = blank_lines().replace_all(&result, "\n\n");

    result
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
