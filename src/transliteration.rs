//! Transliteration: a per-language, data-file-driven map of source
//! graphemes to one or more Latin spellings (forward) and back (reverse).
//! Data files are embedded at compile time with `include_str!`, avoiding a
//! runtime file-discovery dependency for small, fixed, ship-with-the-binary
//! data.

use std::collections::{HashMap, HashSet};

pub const MAX_TRANSLITERATIONS: usize = 128;

fn is_default_set(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch.is_ascii_punctuation() || ch == ' '
}

fn parse_source(token: &str) -> Option<String> {
    let mut out = String::new();
    let mut rest = token;
    while !rest.is_empty() {
        let piece = rest.get(0..5)?;
        if !piece.starts_with('u') {
            return None;
        }
        let code = u32::from_str_radix(&piece[1..5], 16).ok()?;
        out.push(char::from_u32(code)?);
        rest = &rest[5..];
    }
    Some(out)
}

/// A loaded transliteration table for one language.
#[derive(Default, Clone)]
pub struct Transliterator {
    /// grapheme -> forward variants (includes reverse-only entries? no —
    /// only entries without the leading `~`).
    forward: HashMap<String, Vec<String>>,
    /// ascii variant -> graphemes it can stand for (includes every entry,
    /// forward and reverse-only, since both directions are valid when
    /// reading *back* from Latin spelling to source script).
    reverse: HashMap<String, Vec<String>>,
    max_grapheme_len: usize,
    max_variant_len: usize,
}

impl Transliterator {
    /// Parses a `.tr` data file's contents (blank lines and
    /// `#`-comments ignored, `[~]source WS (v1|v2|...)`).
    pub fn parse(data: &str) -> Self {
        let mut forward: HashMap<String, Vec<String>> = HashMap::new();
        let mut reverse: HashMap<String, Vec<String>> = HashMap::new();

        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (reverse_only, rest) = if let Some(stripped) = line.strip_prefix('~') {
                (true, stripped)
            } else {
                (false, line)
            };
            let mut parts = rest.splitn(2, char::is_whitespace);
            let source_tok = match parts.next() {
                Some(s) => s,
                None => continue,
            };
            let variant_tok = match parts.next() {
                Some(s) => s.trim(),
                None => continue,
            };
            let grapheme = match parse_source(source_tok) {
                Some(g) => g,
                None => continue,
            };
            let variant_tok = variant_tok.trim_start_matches('(').trim_end_matches(')');
            let variants: Vec<String> = variant_tok
                .split('|')
                .map(|v| v.replace('_', " "))
                .collect();

            if !reverse_only {
                forward.entry(grapheme.clone()).or_default().extend(variants.clone());
            }
            for variant in &variants {
                reverse.entry(variant.clone()).or_default().push(grapheme.clone());
            }
        }

        let max_grapheme_len = forward.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        let max_variant_len = reverse.keys().map(|k| k.chars().count()).max().unwrap_or(0);

        Transliterator { forward, reverse, max_grapheme_len, max_variant_len }
    }

    /// Loads the bundled sample Cyrillic layout (ЙЦУКЕН-adjacent), used as
    /// the default language layout when none is specified explicitly.
    pub fn ru() -> Self {
        Self::parse(include_str!("../data/transliteration/ru.tr"))
    }

    /// Greedy longest-match positional variant lookup over `map`, keyed by
    /// grapheme length `max_len`. When a position matches nothing in
    /// `map`, falls back to treating the single code point literally if
    /// `literal_ok(ch)` holds; otherwise the whole lookup fails.
    fn greedy_positions(
        word: &str,
        map: &HashMap<String, Vec<String>>,
        max_len: usize,
        literal_ok: impl Fn(char) -> bool,
    ) -> Option<Vec<Vec<String>>> {
        let chars: Vec<char> = word.chars().collect();
        let mut positions: Vec<Vec<String>> = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let mut matched = false;
            let upper = max_len.min(chars.len() - i);
            for len in (1..=upper.max(1)).rev() {
                if len > chars.len() - i {
                    continue;
                }
                let candidate: String = chars[i..i + len].iter().collect();
                if let Some(variants) = map.get(&candidate) {
                    positions.push(variants.clone());
                    i += len;
                    matched = true;
                    break;
                }
            }
            if !matched {
                if literal_ok(chars[i]) {
                    positions.push(vec![chars[i].to_string()]);
                    i += 1;
                } else {
                    return None;
                }
            }
        }
        Some(positions)
    }

    fn cartesian_product(positions: &[Vec<String>], cap: usize) -> Vec<String> {
        let mut results: Vec<String> = vec![String::new()];
        for choices in positions {
            let mut next = Vec::new();
            'outer: for prefix in &results {
                for choice in choices {
                    let mut combined = prefix.clone();
                    combined.push_str(choice);
                    next.push(combined);
                    if next.len() >= cap {
                        break 'outer;
                    }
                }
            }
            results = next;
            if results.len() >= cap {
                results.truncate(cap);
            }
        }
        results
    }

    /// Greedy longest-match forward pass, taking the first variant at each
    /// position. Fails if any source character is outside the default set
    /// and also not found in the forward map.
    pub fn get_transliteration(&self, word: &str) -> Option<String> {
        let positions = Self::greedy_positions(word, &self.forward, self.max_grapheme_len, is_default_set)?;
        Some(positions.into_iter().map(|v| v[0].clone()).collect())
    }

    /// All transliterations: the Cartesian product of every forward
    /// variant at every position (capped at `MAX_TRANSLITERATIONS`), unioned
    /// with the reverse pass (treating `word` as already-Latin spelling and
    /// mapping back through the reverse table, without the default-set
    /// constraint). The original word itself is excluded.
    pub fn get_transliterations(&self, word: &str) -> HashSet<String> {
        let mut out = HashSet::new();

        if let Some(positions) = Self::greedy_positions(word, &self.forward, self.max_grapheme_len, is_default_set) {
            for candidate in Self::cartesian_product(&positions, MAX_TRANSLITERATIONS) {
                if candidate != word {
                    out.insert(candidate);
                }
            }
        }

        if let Some(positions) = Self::greedy_positions(word, &self.reverse, self.max_variant_len, |_| false) {
            for candidate in Self::cartesian_product(&positions, MAX_TRANSLITERATIONS) {
                if candidate != word {
                    out.insert(candidate);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test0001_forward_basic() {
        let tr = Transliterator::ru();
        assert_eq!(tr.get_transliteration("\u{0434}\u{0430}"), Some("da".to_string()));
    }

    #[test]
    fn test0002_unmapped_char_fails() {
        let tr = Transliterator::ru();
        assert_eq!(tr.get_transliteration("日"), None);
    }

    #[test]
    fn test0003_transliterations_contains_forward_variant() {
        let tr = Transliterator::ru();
        let word = "\u{0434}\u{0430}"; // "da"
        let variants = tr.get_transliterations(word);
        assert!(variants.contains("da"));
    }

    #[test]
    fn test0004_transliterations_excludes_original() {
        let tr = Transliterator::ru();
        let word = "\u{0434}\u{0430}";
        let variants = tr.get_transliterations(word);
        assert!(!variants.contains(word));
    }

    #[test]
    fn test0005_reverse_only_entry_used_in_reverse_pass() {
        let tr = Transliterator::ru();
        // "h" is a reverse-only variant of х (u0445); reading "h" back
        // should surface х in the reverse pass.
        let variants = tr.get_transliterations("h");
        assert!(variants.contains("\u{0445}"));
    }
}
