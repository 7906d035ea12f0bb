//! Phonetic encoder: Metaphone and Daitch-Mokotoff Soundex, behind a small
//! shared trait so the candidate corrector can be generic over the chosen
//! scheme, following the common pattern of small capability traits backed
//! by tagged concrete types.

use bitflags::bitflags;
use std::collections::HashMap;

pub trait PhoneticEncoder {
    /// Encodes a word into one or more phonetic keys (an entry can fork
    /// into several keys, e.g. Daitch-Mokotoff's "alternate" entries).
    fn encode(&self, word: &str) -> Vec<String>;
}

bitflags! {
    struct CharClass: u8 {
        const VOWEL       = 0b00001;
        const SAME        = 0b00010; // F J L M N R
        const VAR_SOUND   = 0b00100; // C G P S T
        const FRONT_VOWEL = 0b01000; // E I Y
        const NOGHF       = 0b10000;
    }
}

fn classify(ch: char) -> CharClass {
    let mut flags = CharClass::empty();
    match ch {
        'A' | 'E' | 'I' | 'O' | 'U' => flags |= CharClass::VOWEL,
        _ => {}
    }
    if matches!(ch, 'F' | 'J' | 'L' | 'M' | 'N' | 'R') {
        flags |= CharClass::SAME;
    }
    if matches!(ch, 'C' | 'G' | 'P' | 'S' | 'T') {
        flags |= CharClass::VAR_SOUND;
    }
    if matches!(ch, 'E' | 'I' | 'Y') {
        flags |= CharClass::FRONT_VOWEL;
    }
    if matches!(ch, 'N' | 'O' | 'G' | 'H' | 'F') {
        flags |= CharClass::NOGHF;
    }
    flags
}

/// Classical table-driven Metaphone transducer.
pub struct Metaphone;

impl Metaphone {
    fn strip_leading_silent(chars: &mut Vec<char>) {
        if chars.len() < 2 {
            return;
        }
        let pair: String = chars[0..2].iter().collect();
        match pair.as_str() {
            "PN" | "KN" | "GN" | "AE" | "WR" => {
                chars.remove(0);
            }
            "WH" => {
                chars.remove(0);
                chars[0] = 'W';
            }
            _ => {}
        }
        if chars[0] == 'X' {
            chars[0] = 'S';
        }
    }
}

impl PhoneticEncoder for Metaphone {
    fn encode(&self, word: &str) -> Vec<String> {
        let mut chars: Vec<char> = word.to_uppercase().chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        Self::strip_leading_silent(&mut chars);

        let mut result = String::new();
        let mut last_emitted: Option<char> = None;
        let n = chars.len();
        for i in 0..n {
            let ch = chars[i];
            let classes = classify(ch);
            let next = chars.get(i + 1).copied();
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };

            // Duplicate consonants collapse, except the "CC" cluster which
            // is handled explicitly below since it can encode two sounds.
            if Some(ch) == last_emitted && ch != 'C' {
                continue;
            }

            let emitted: Option<char> = if classes.contains(CharClass::VOWEL) {
                if i == 0 {
                    Some(ch)
                } else {
                    None
                }
            } else {
                match ch {
                    'B' => {
                        if i == n - 1 && prev == Some('M') {
                            None
                        } else {
                            Some('B')
                        }
                    }
                    'C' => {
                        if next == Some('I') && chars.get(i + 2) == Some(&'A') {
                            Some('X')
                        } else if classes.contains(CharClass::FRONT_VOWEL)
                            || next == Some('E')
                            || next == Some('I')
                            || next == Some('Y')
                        {
                            if prev == Some('S') {
                                None
                            } else {
                                Some('S')
                            }
                        } else if next == Some('H') {
                            Some('X')
                        } else {
                            Some('K')
                        }
                    }
                    'D' => {
                        if next == Some('G')
                            && matches!(chars.get(i + 2), Some('E') | Some('Y') | Some('I'))
                        {
                            Some('J')
                        } else {
                            Some('T')
                        }
                    }
                    'G' => {
                        if next == Some('H') {
                            Some('K')
                        } else if classes.contains(CharClass::FRONT_VOWEL)
                            || next == Some('E')
                            || next == Some('I')
                            || next == Some('Y')
                        {
                            Some('J')
                        } else {
                            Some('K')
                        }
                    }
                    'H' => {
                        if prev.map(classify).unwrap_or(CharClass::empty()).contains(CharClass::VOWEL)
                            && !next.map(classify).unwrap_or(CharClass::empty()).contains(CharClass::VOWEL)
                        {
                            None
                        } else {
                            Some('H')
                        }
                    }
                    'K' => {
                        if prev == Some('C') {
                            None
                        } else {
                            Some('K')
                        }
                    }
                    'P' => {
                        if next == Some('H') {
                            Some('F')
                        } else {
                            Some('P')
                        }
                    }
                    'Q' => Some('K'),
                    'S' => {
                        if next == Some('H') {
                            Some('X')
                        } else if next == Some('I')
                            && matches!(chars.get(i + 2), Some('O') | Some('A'))
                        {
                            Some('X')
                        } else {
                            Some('S')
                        }
                    }
                    'T' => {
                        if next == Some('H') {
                            Some('0')
                        } else if next == Some('I')
                            && matches!(chars.get(i + 2), Some('O') | Some('A'))
                        {
                            Some('X')
                        } else {
                            Some('T')
                        }
                    }
                    'V' => Some('F'),
                    'W' | 'Y' => {
                        if next.map(classify).unwrap_or(CharClass::empty()).contains(CharClass::VOWEL) {
                            Some(ch)
                        } else {
                            None
                        }
                    }
                    'X' => Some('K'), // internal X -> KS in full metaphone, simplified to K here
                    'Z' => Some('S'),
                    other if classes.contains(CharClass::SAME) => Some(other),
                    _ => None,
                }
            };

            if let Some(e) = emitted {
                result.push(e);
                last_emitted = Some(ch);
            }
        }
        vec![result]
    }
}

#[derive(Clone)]
struct DmEntry {
    vowel: bool,
    first: &'static str,
    before: &'static str,
    other: &'static str,
    alternate: Option<&'static str>,
}

/// Daitch-Mokotoff Soundex: a longest-match-first table scan producing one
/// or more codes per matched entry (duplicated when an entry has an
/// "alternate" spelling), then collapsing adjacent duplicate codes.
pub struct DaitchMokotoff {
    entries: HashMap<&'static str, DmEntry>,
    max_entry_length: usize,
}

impl DaitchMokotoff {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        let mut add = |key: &'static str, vowel: bool, first: &'static str, before: &'static str, other: &'static str, alternate: Option<&'static str>| {
            entries.insert(key, DmEntry { vowel, first, before, other, alternate });
        };

        add("ai", true, "0", "1", "", None);
        add("aj", true, "0", "1", "", None);
        add("ay", true, "0", "1", "", None);
        add("au", true, "0", "7", "", None);
        add("a", true, "0", "", "", None);
        add("b", false, "7", "7", "7", None);
        add("chs", false, "5", "54", "54", None);
        add("ch", false, "5", "5", "5", Some("tch"));
        add("ck", false, "5", "5", "5", Some("tsk"));
        add("c", false, "5", "5", "5", Some("tz"));
        add("cz", false, "4", "4", "4", None);
        add("cs", false, "4", "4", "4", None);
        add("csz", false, "4", "4", "4", None);
        add("czs", false, "4", "4", "4", None);
        add("drz", false, "4", "4", "4", None);
        add("drs", false, "4", "4", "4", None);
        add("ds", false, "4", "4", "4", None);
        // NB: the original table source (Xapian's DM Soundex loader) lists
        // "dsh" twice with identical fields; a HashMap keyed on the entry
        // text makes the second insert a no-op, so only one entry is kept.
        add("dsh", false, "4", "4", "4", None);
        add("dz", false, "4", "4", "4", None);
        add("dzh", false, "4", "4", "4", None);
        add("dzs", false, "4", "4", "4", None);
        add("d", false, "3", "3", "3", None);
        add("dt", false, "3", "3", "3", None);
        add("ei", true, "0", "1", "", None);
        add("ey", true, "0", "1", "", None);
        add("ej", true, "0", "1", "", None);
        add("eu", true, "1", "1", "", None);
        add("e", true, "0", "", "", None);
        add("fb", false, "7", "7", "7", None);
        add("f", false, "7", "7", "7", None);
        add("g", false, "5", "5", "5", None);
        add("h", false, "5", "5", "", None);
        add("ia", true, "1", "", "", None);
        add("ie", true, "1", "", "", None);
        add("io", true, "1", "", "", None);
        add("iu", true, "1", "", "", None);
        add("i", true, "0", "", "", None);
        add("j", false, "1", "1", "1", Some("dzh"));
        add("ks", false, "5", "54", "54", None);
        add("kh", false, "5", "5", "5", None);
        add("k", false, "5", "5", "5", None);
        add("l", false, "8", "8", "8", None);
        add("mn", false, "", "66", "66", None);
        add("m", false, "6", "6", "6", None);
        add("nm", false, "", "66", "66", None);
        add("n", false, "6", "6", "6", None);
        add("oi", true, "0", "1", "", None);
        add("oj", true, "0", "1", "", None);
        add("oy", true, "0", "1", "", None);
        add("o", true, "0", "", "", None);
        add("p", false, "7", "7", "7", None);
        add("pf", false, "7", "7", "7", None);
        add("ph", false, "7", "7", "7", None);
        add("q", false, "5", "5", "5", None);
        add("rz", false, "94", "94", "94", None);
        add("rs", false, "94", "94", "94", None);
        add("r", false, "9", "9", "9", None);
        add("schtsch", false, "2", "4", "4", None);
        add("schtsh", false, "2", "4", "4", None);
        add("schtch", false, "2", "4", "4", None);
        add("sch", false, "4", "4", "4", None);
        add("shtch", false, "2", "4", "4", None);
        add("shch", false, "2", "4", "4", None);
        add("shtsh", false, "2", "4", "4", None);
        add("sht", false, "2", "43", "43", None);
        add("scht", false, "2", "43", "43", None);
        add("schd", false, "2", "43", "43", None);
        add("sh", false, "4", "4", "4", None);
        add("stch", false, "2", "4", "4", None);
        add("stsch", false, "2", "4", "4", None);
        add("sc", false, "2", "4", "4", None);
        add("strz", false, "2", "4", "4", None);
        add("strs", false, "2", "4", "4", None);
        add("stsh", false, "2", "4", "4", None);
        add("st", false, "2", "43", "43", None);
        add("szcz", false, "2", "4", "4", None);
        add("szcs", false, "2", "4", "4", None);
        add("szt", false, "2", "43", "43", None);
        add("shd", false, "2", "43", "43", None);
        add("szd", false, "2", "43", "43", None);
        add("sd", false, "2", "43", "43", None);
        add("sz", false, "4", "4", "4", None);
        add("s", false, "4", "4", "4", None);
        add("tch", false, "4", "4", "4", None);
        add("ttch", false, "4", "4", "4", None);
        add("ttsch", false, "4", "4", "4", None);
        add("th", false, "3", "3", "3", None);
        add("trz", false, "4", "4", "4", None);
        add("trs", false, "4", "4", "4", None);
        add("trch", false, "4", "4", "4", None);
        add("tsh", false, "4", "4", "4", None);
        add("ts", false, "4", "4", "4", None);
        add("tts", false, "4", "4", "4", None);
        add("ttsz", false, "4", "4", "4", None);
        add("tc", false, "4", "4", "4", None);
        add("tz", false, "4", "4", "4", None);
        add("ttz", false, "4", "4", "4", None);
        add("tzs", false, "4", "4", "4", None);
        add("tsz", false, "4", "4", "4", None);
        add("t", false, "3", "3", "3", None);
        add("ui", true, "0", "1", "", None);
        add("uj", true, "0", "1", "", None);
        add("uy", true, "0", "1", "", None);
        add("u", true, "0", "", "", None);
        add("ue", true, "0", "", "", None);
        add("v", false, "7", "7", "7", None);
        add("w", false, "7", "7", "7", None);
        add("x", false, "5", "54", "54", None);
        add("y", true, "1", "", "", None);
        add("zh", false, "4", "4", "4", None);
        add("zs", false, "4", "4", "4", None);
        add("zsch", false, "4", "4", "4", None);
        add("zhsh", false, "4", "4", "4", None);
        add("z", false, "4", "4", "4", None);

        let max_entry_length = entries.keys().map(|k| k.len()).max().unwrap_or(0);
        DaitchMokotoff { entries, max_entry_length }
    }

    fn find_entry(&self, word: &str, offset: usize) -> Option<(usize, &DmEntry)> {
        let chars: Vec<char> = word.chars().collect();
        let mut best: Option<(usize, &DmEntry)> = None;
        let max_len = self.max_entry_length.min(chars.len() - offset);
        let mut buf = String::new();
        for len in 1..=max_len {
            buf.clear();
            buf.extend(&chars[offset..offset + len]);
            if let Some(entry) = self.entries.get(buf.as_str()) {
                best = Some((len, entry));
            }
        }
        best
    }

    fn entry_value<'a>(&'a self, entries: &[&'a DmEntry], index: usize, entry: &'a DmEntry) -> &'a str {
        if index + 1 < entries.len() && entries[index + 1].vowel {
            entry.before
        } else {
            entry.other
        }
    }
}

impl Default for DaitchMokotoff {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneticEncoder for DaitchMokotoff {
    fn encode(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let chars: Vec<char> = word.chars().collect();
        let mut entries: Vec<&DmEntry> = Vec::new();
        let mut offset = 0;
        while offset < chars.len() {
            match self.find_entry(&word, offset) {
                Some((len, entry)) => {
                    entries.push(entry);
                    offset += len;
                }
                None => return Vec::new(),
            }
        }
        if entries.is_empty() {
            return Vec::new();
        }

        let mut result: Vec<String> = vec![entries[0].first.to_string()];
        if let Some(alt_key) = entries[0].alternate {
            if let Some(alt) = self.entries.get(alt_key) {
                result.push(alt.first.to_string());
            }
        }

        for i in 1..entries.len() {
            let result_size = result.len();
            let value = self.entry_value(&entries, i, entries[i]);
            if let Some(alt_key) = entries[i].alternate {
                if let Some(alt) = self.entries.get(alt_key) {
                    let alt_value = self.entry_value(&entries, i, alt);
                    for k in 0..result_size {
                        let mut dup = result[k].clone();
                        dup.push_str(alt_value);
                        result.push(dup);
                    }
                }
            }
            for item in result.iter_mut().take(result_size) {
                item.push_str(value);
            }
        }

        for key in result.iter_mut() {
            let mut collapsed = String::with_capacity(key.len());
            let mut last: Option<char> = None;
            for ch in key.chars() {
                if Some(ch) != last {
                    collapsed.push(ch);
                }
                last = Some(ch);
            }
            *key = collapsed;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test0001_metaphone_basic() {
        let mp = Metaphone;
        let keys = mp.encode("knight");
        assert_eq!(keys.len(), 1);
        assert!(!keys[0].is_empty());
    }

    #[test]
    fn test0002_metaphone_drops_silent_k() {
        let mp = Metaphone;
        let keys = mp.encode("knight");
        assert!(!keys[0].starts_with('K'));
    }

    #[test]
    fn test0003_dmsoundex_returns_key() {
        let dm = DaitchMokotoff::new();
        let keys = dm.encode("schwartz");
        assert!(!keys.is_empty());
    }

    #[test]
    fn test0004_dmsoundex_collapses_adjacent_duplicates() {
        let dm = DaitchMokotoff::new();
        for key in dm.encode("mann") {
            let chars: Vec<char> = key.chars().collect();
            for w in chars.windows(2) {
                assert_ne!(w[0], w[1]);
            }
        }
    }

    #[test]
    fn test0005_dmsoundex_alternate_entry_forks() {
        // "j" has an alternate ("dzh"); words starting with j should be
        // able to produce more than one candidate key.
        let dm = DaitchMokotoff::new();
        let keys = dm.encode("jack");
        assert!(!keys.is_empty());
    }
}
