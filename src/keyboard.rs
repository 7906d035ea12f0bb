//! Keyboard layout geometry: per-language char maps plus a
//! static default QWERTY grid used to weight substitution cost by key
//! proximity and to support "layout swap" corrections (typing in the wrong
//! keyboard layout, e.g. Cyrillic text typed with a Latin/QWERTY layout
//! active).

use std::collections::HashMap;
use std::sync::OnceLock;

/// (row, column) position of a key on the default QWERTY grid.
type KeyPos = (f64, f64);

/// The static default keyboard table: every ASCII letter/digit/punctuation
/// character gets a grid position. Built once behind a `OnceLock` so this
/// process-wide cache is never rebuilt or mutated after first use.
fn default_layout() -> &'static (HashMap<char, KeyPos>, f64) {
    static LAYOUT: OnceLock<(HashMap<char, KeyPos>, f64)> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        let rows: [&str; 4] = [
            "1234567890-=",
            "qwertyuiop[]",
            "asdfghjkl;'",
            "zxcvbnm,./",
        ];
        let mut map = HashMap::new();
        let mut max_dist = 0.0f64;
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, ch) in row.chars().enumerate() {
                map.insert(ch, (row_idx as f64, col_idx as f64));
            }
        }
        // Precompute the normalizing max distance: the diagonal of the
        // bounding box of the grid, same role as Xapian's precomputed
        // max_distance constant for the QWERTY table.
        let max_row = rows.len() as f64 - 1.0;
        let max_col = rows.iter().map(|r| r.chars().count()).max().unwrap_or(1) as f64 - 1.0;
        max_dist = (max_row * max_row + max_col * max_col).sqrt();
        (map, max_dist)
    })
}

/// Euclidean proximity between two default-layout characters, normalized
/// into `[0, 1]` where `1` means identical position. Characters outside the
/// default set (or `x == y`, trivially proximity 1) get proximity `0`.
pub fn key_proximity(x: char, y: char) -> f64 {
    if x == y {
        return 1.0;
    }
    let (map, max_dist) = default_layout();
    match (map.get(&x.to_ascii_lowercase()), map.get(&y.to_ascii_lowercase())) {
        (Some(&(r1, c1)), Some(&(r2, c2))) => {
            let d = ((r1 - r2).powi(2) + (c1 - c2).powi(2)).sqrt();
            1.0 - (d / max_dist)
        }
        _ => 0.0,
    }
}

/// A single named keyboard layout: the set of characters a particular
/// language's keyboard driver maps onto the default (ASCII QWERTY) keys,
/// and its inverse.
#[derive(Clone, Debug, Default)]
pub struct SpellingKeyboard {
    /// layout_char -> default_char
    forward: HashMap<char, char>,
    /// default_char -> layout_char
    reverse: HashMap<char, char>,
}

impl SpellingKeyboard {
    /// Builds a keyboard layout from an explicit list of (layout_char,
    /// default_char) pairs, e.g. the Cyrillic-on-QWERTY ЙЦУКЕН layout.
    pub fn new(pairs: &[(char, char)]) -> Self {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for &(layout_char, default_char) in pairs {
            forward.insert(layout_char, default_char);
            reverse.insert(default_char, layout_char);
        }
        SpellingKeyboard { forward, reverse }
    }

    /// The default (identity) keyboard: no layout remapping, only the
    /// QWERTY proximity table is active. Used whenever no explicit
    /// language layout was configured.
    pub fn identity() -> Self {
        SpellingKeyboard::default()
    }

    fn is_default_set(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch.is_ascii_punctuation() || ch == ' '
    }

    /// Proximity between two code points under this layout: maps both
    /// through the forward map (when present) onto the default grid before
    /// measuring distance, so a layout-aware substitution cost can still
    /// reward "adjacent key" typos even when typed in a non-default script.
    pub fn get_key_proximity(&self, x: char, y: char) -> f64 {
        let dx = *self.forward.get(&x).unwrap_or(&x);
        let dy = *self.forward.get(&y).unwrap_or(&y);
        key_proximity(dx, dy)
    }

    /// Reinterprets `word` as though it had been typed on this layout while
    /// the default (ASCII) layout was actually active: maps each default
    /// character back to its layout character. Fails (returns `None`) if
    /// any character is neither in the reverse map nor itself a default
    /// character — we must never leave foreign characters in the output.
    pub fn convert_from_layout(&self, word: &str) -> Option<String> {
        let mut out = String::with_capacity(word.len());
        for ch in word.chars() {
            if let Some(&mapped) = self.reverse.get(&ch) {
                out.push(mapped);
            } else if Self::is_default_set(ch) {
                out.push(ch);
            } else {
                return None;
            }
        }
        Some(out)
    }

    /// Inverse of `convert_from_layout`: maps layout characters to their
    /// default-layout equivalent.
    pub fn convert_to_layout(&self, word: &str) -> Option<String> {
        let mut out = String::with_capacity(word.len());
        for ch in word.chars() {
            if let Some(&mapped) = self.forward.get(&ch) {
                out.push(mapped);
            } else if Self::is_default_set(ch) {
                out.push(ch);
            } else {
                return None;
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test0001_identity_proximity() {
        assert_eq!(key_proximity('a', 'a'), 1.0);
    }

    #[test]
    fn test0002_adjacent_keys_close() {
        // 'q' and 'w' sit next to each other on row 1
        let p = key_proximity('q', 'w');
        assert!(p > 0.8 && p < 1.0);
    }

    #[test]
    fn test0003_far_keys_low_proximity() {
        let p = key_proximity('q', 'm');
        assert!(p < 0.5);
    }

    #[test]
    fn test0004_unknown_char_zero_proximity() {
        assert_eq!(key_proximity('q', 'ф'), 0.0);
    }

    #[test]
    fn test0005_layout_roundtrip() {
        // A tiny stand-in layout mapping 'a'->'ф' etc. just to exercise the
        // round trip property convert_from(convert_to(w)) == w.
        let kb = SpellingKeyboard::new(&[('ф', 'a'), ('ы', 's')]);
        let word = "as";
        let swapped = kb.convert_to_layout(word).unwrap();
        let back = kb.convert_from_layout(&swapped).unwrap();
        assert_eq!(back, word);
    }

    #[test]
    fn test0006_foreign_char_rejected() {
        let kb = SpellingKeyboard::new(&[('ф', 'a')]);
        assert!(kb.convert_from_layout("a€").is_none());
    }
}
