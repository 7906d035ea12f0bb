//! Unicode utilities: code-point iteration, UTF-8 append and
//! lowercasing, shared by every other component since all distance,
//! phonetic and transliteration logic operates on code points rather than
//! bytes.

/// Splits a word into its code points. Every component downstream of this
/// one works on `&[char]` / `Vec<char>` rather than re-scanning UTF-8.
pub fn codepoints(word: &str) -> Vec<char> {
    word.chars().collect()
}

/// Appends a code point to a byte buffer as UTF-8.
pub fn append_utf8(buf: &mut String, ch: char) {
    buf.push(ch);
}

/// Lowercases a single code point, ASCII fast-path first since most words
/// are ASCII-dominant even when the vocabulary is multilingual.
pub fn to_lower(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_lowercase()
    } else {
        // Simple case folding can in theory produce more than one char
        // (e.g. German ß), but for indexing purposes we only ever want a
        // single replacement character; take the first and accept that a
        // handful of scripts lose full fidelity here, same trade-off the
        // byte-for-byte ASCII fast path already makes for casing.
        ch.to_lowercase().next().unwrap_or(ch)
    }
}

/// Lowercases an entire word, used to normalize vocabulary words and query
/// tokens before every frequency lookup.
pub fn lowercase_word(word: &str) -> String {
    word.chars().map(to_lower).collect()
}

pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}
