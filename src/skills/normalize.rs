//! Search-text canonicalization.
//!
//! Catalog names, readings and user queries all pass through [`normalize`]
//! before comparison so that full-width/half-width forms, letter case,
//! katakana/hiragana spelling, long vowel marks and punctuation do not affect
//! matching.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// First and last katakana code points shifted onto hiragana.
const KATAKANA_START: char = '\u{30A1}';
const KATAKANA_END: char = '\u{30F6}';
const KANA_SHIFT: u32 = 0x60;

/// Katakana-hiragana prolonged sound mark.
const LONG_VOWEL_MARK: char = 'ー';

/// Punctuation stripped when Unicode property classes are unavailable.
const FALLBACK_PUNCTUATION: &str =
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~、。・「」『』（）［］｛｝〈〉《》【】〜…";

/// Upper bound on normalization passes; real input settles after one or two.
const MAX_PASSES: usize = 4;

// None when the regex engine was built without Unicode property support.
static PUNCTUATION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\p{P}\p{S}\s]+").ok());

/// Canonicalize text for matching.
///
/// # Arguments
/// * `text` - Raw query or catalog string
///
/// # Returns
/// The canonical form; empty input yields an empty string.
///
/// # Examples
/// ```
/// use skillplan::skills::normalize;
///
/// assert_eq!(normalize("コーナー回復○"), normalize("こーなー回復"));
/// assert_eq!(normalize("Ｆｏｒｗａｒｄ Run!"), "forwardrun");
/// ```
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Stripping can leave a base character next to a combining mark that
    // NFKC composes on the next pass.
    let mut current = normalize_pass(text);
    for _ in 1..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Returns true when `raw` contains hiragana, katakana or the long vowel mark.
pub fn has_phonetic(raw: &str) -> bool {
    raw.chars().any(|ch| {
        matches!(ch, '\u{3041}'..='\u{3093}' | '\u{30A1}'..='\u{30F3}') || ch == LONG_VOWEL_MARK
    })
}

fn normalize_pass(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();

    let kana: String = folded
        .trim()
        .chars()
        .filter(|&ch| ch != LONG_VOWEL_MARK)
        .map(katakana_to_hiragana)
        .collect();

    strip_punctuation(&kana)
}

fn katakana_to_hiragana(ch: char) -> char {
    if (KATAKANA_START..=KATAKANA_END).contains(&ch) {
        char::from_u32(ch as u32 - KANA_SHIFT).unwrap_or(ch)
    } else {
        ch
    }
}

fn strip_punctuation(text: &str) -> String {
    match PUNCTUATION_PATTERN.as_ref() {
        Some(pattern) => pattern.replace_all(text, "").into_owned(),
        None => strip_punctuation_fallback(text),
    }
}

fn strip_punctuation_fallback(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace() && !FALLBACK_PUNCTUATION.contains(*ch))
        .collect()
}
