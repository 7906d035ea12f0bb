//! N-gram fragment index, "brass-new" backend: trigram
//! positional fragments plus a bookends fragment for short words.

use crate::error::SpellingError;
use crate::spelling_table::{
    or_merge_fragment_lists, CandidateList, SpellingTable, SpellingTableCommon, PREFIX_DISABLED,
};
use crate::store::BackingStore;
use crate::unicode::{codepoints, lowercase_word};
use crate::varint::{decode_varint, encode_varint};
use std::collections::HashMap;

const N: i32 = 3;
const PLACEHOLDER: char = '$';
/// Largest code-point length whose largest valid position (`L - N + 1`)
/// still yields a position byte `s + N` that fits in `u8`.
const MAX_WORD_LEN: usize = 253;
const FRAGMENT_SIGNATURE: u8 = b'N';

fn trigram_at(chars: &[char], s: i32) -> String {
    let len = chars.len() as i32;
    (0..N)
        .map(|k| {
            let idx = s + k;
            if idx < 0 || idx >= len {
                PLACEHOLDER
            } else {
                chars[idx as usize]
            }
        })
        .collect()
}

fn fragment_key(prefix_group: u8, pos_byte: u8, trigram: &str) -> Vec<u8> {
    let mut key = vec![FRAGMENT_SIGNATURE, pos_byte, prefix_group];
    key.extend_from_slice(trigram.as_bytes());
    key
}

/// All standard fragment keys for `chars`, plus the bookends fragment when
/// the word is short enough to need it.
fn fragment_keys_for_word(chars: &[char], prefix_group: u8) -> Result<Vec<Vec<u8>>, SpellingError> {
    let len = chars.len();
    if len > MAX_WORD_LEN {
        return Err(SpellingError::InvalidArgument(format!(
            "word too long to index in the n-gram fragment backend ({} code points)",
            len
        )));
    }
    let mut keys = Vec::new();
    let len_i = len as i32;
    let mut s = -1;
    while s <= len_i - N + 1 {
        let trigram = trigram_at(chars, s);
        let pos_byte = (s + N) as u8;
        keys.push(fragment_key(prefix_group, pos_byte, &trigram));
        s += 1;
    }
    if len <= (N as usize) + 1 && len >= 2 {
        let mut trigram = String::new();
        for _ in 0..(N as usize - 2) {
            trigram.push(PLACEHOLDER);
        }
        trigram.push(chars[0]);
        trigram.push(chars[len - 1]);
        keys.push(fragment_key(prefix_group, 1, &trigram));
    }
    Ok(keys)
}

fn encode_word_list(words: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut prev = "";
    for word in words {
        let shared = prev.chars().zip(word.chars()).take_while(|(a, b)| a == b).count();
        let shared_bytes: usize = prev.chars().take(shared).map(|c| c.len_utf8()).sum();
        let suffix = &word[shared_bytes..];
        encode_varint(shared as u64, &mut out);
        encode_varint(suffix.len() as u64, &mut out);
        out.extend_from_slice(suffix.as_bytes());
        prev = word;
    }
    out
}

fn decode_word_list(data: &[u8]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let (shared, consumed) = match decode_varint(rest) {
            Some(v) => v,
            None => break,
        };
        rest = &rest[consumed..];
        let (suffix_len, consumed) = match decode_varint(rest) {
            Some(v) => v,
            None => break,
        };
        rest = &rest[consumed..];
        let suffix_len = suffix_len as usize;
        if rest.len() < suffix_len {
            break;
        }
        let suffix = std::str::from_utf8(&rest[..suffix_len]).unwrap_or("");
        rest = &rest[suffix_len..];
        let prev = out.last().map(|s| s.as_str()).unwrap_or("");
        let shared_prefix: String = prev.chars().take(shared as usize).collect();
        out.push(shared_prefix + suffix);
    }
    out
}

fn swap_adjacent(chars: &[char], i: usize) -> Vec<char> {
    let mut swapped = chars.to_vec();
    swapped.swap(i, i + 1);
    swapped
}

pub struct NGramSpellingTable<B: BackingStore> {
    common: SpellingTableCommon<B>,
    fragment_changes: HashMap<Vec<u8>, Vec<String>>,
}

impl<B: BackingStore> NGramSpellingTable<B> {
    pub fn new(store: B) -> Self {
        NGramSpellingTable { common: SpellingTableCommon::new(store), fragment_changes: HashMap::new() }
    }

    fn load_fragment(&self, key: &[u8]) -> Vec<String> {
        if let Some(list) = self.fragment_changes.get(key) {
            return list.clone();
        }
        self.common.store.get_exact_entry(key).map(|v| decode_word_list(&v)).unwrap_or_default()
    }

    fn toggle_word_fragments(&mut self, chars: &[char], word: &str, prefix_group: u8) -> Result<(), SpellingError> {
        if chars.len() < 2 {
            return Ok(());
        }
        for key in fragment_keys_for_word(chars, prefix_group)? {
            let mut list = self.load_fragment(&key);
            match list.binary_search(&word.to_string()) {
                Ok(idx) => {
                    list.remove(idx);
                }
                Err(idx) => {
                    list.insert(idx, word.to_string());
                }
            }
            self.fragment_changes.insert(key, list);
        }
        Ok(())
    }

    fn flush_fragments_only(&mut self) {
        for (key, list) in self.fragment_changes.iter() {
            if list.is_empty() {
                self.common.store.del(key);
            } else {
                self.common.store.add(key, &encode_word_list(list));
            }
        }
    }

    fn probe_fragments_direct(&self, chars: &[char], prefix_group: u8, max_distance: u32) -> Vec<Vec<String>> {
        let len = chars.len();
        let len_i = len as i32;
        let d = max_distance as i32;
        let mut lists = Vec::new();
        let mut s = -1;
        while s <= len_i - N + 1 {
            let trigram = trigram_at(chars, s);
            let center = s + N;
            for pos_byte in (center - d).max(0)..=(center + d).min(255) {
                let key = fragment_key(prefix_group, pos_byte as u8, &trigram);
                let list = self.load_fragment(&key);
                if !list.is_empty() {
                    lists.push(list);
                }
            }
            s += 1;
        }
        lists
    }

    /// Probes the word's own fragments plus, for words short enough that a
    /// single transposition can hide within one trigram window, the
    /// fragments of every adjacent-swap variant.
    fn probe_fragments(&self, chars: &[char], prefix_group: u8, max_distance: u32) -> Vec<Vec<String>> {
        let mut lists = self.probe_fragments_direct(chars, prefix_group, max_distance);
        if chars.len() <= N as usize {
            for i in 0..chars.len().saturating_sub(1) {
                let swapped = swap_adjacent(chars, i);
                lists.extend(self.probe_fragments_direct(&swapped, prefix_group, max_distance));
            }
        }
        lists
    }
}

impl<B: BackingStore> SpellingTable for NGramSpellingTable<B> {
    fn open_termlist(&mut self, word: &str, max_distance: u32, prefix: &str) -> CandidateList {
        self.common.flush_unigrams_only();
        self.flush_fragments_only();
        let group = self.common.resolve_prefix_group(prefix);
        if group == PREFIX_DISABLED {
            return CandidateList::empty();
        }
        let word = lowercase_word(word);
        let chars = codepoints(&word);
        let lists = self.probe_fragments(&chars, group, max_distance);
        let merged = or_merge_fragment_lists(lists);
        let items = merged
            .into_iter()
            .map(|w| {
                let freq = self.common.get_word_frequency(&w, prefix);
                (w, freq)
            })
            .collect();
        CandidateList::new(items)
    }

    fn get_word_frequency(&self, word: &str, prefix: &str) -> u32 {
        self.common.get_word_frequency(&lowercase_word(word), prefix)
    }

    fn get_words_frequency(&self, a: &str, b: &str, prefix: &str) -> u32 {
        self.common.get_words_frequency(&lowercase_word(a), &lowercase_word(b), prefix)
    }

    fn add_word(&mut self, word: &str, freq_increment: u32, prefix: &str) -> Result<(), SpellingError> {
        let word = lowercase_word(word);
        let chars = codepoints(&word);
        if chars.len() > MAX_WORD_LEN {
            return Err(SpellingError::InvalidArgument(format!(
                "word too long to index in the n-gram fragment backend ({} code points)",
                chars.len()
            )));
        }
        if let Some((group, toggled)) = self.common.adjust_word_freq(&word, freq_increment as i64, prefix) {
            if toggled {
                self.toggle_word_fragments(&chars, &word, group)?;
            }
        }
        Ok(())
    }

    fn remove_word(&mut self, word: &str, freq_decrement: u32, prefix: &str) -> Result<(), SpellingError> {
        let word = lowercase_word(word);
        let chars = codepoints(&word);
        if let Some((group, toggled)) = self.common.adjust_word_freq(&word, -(freq_decrement as i64), prefix) {
            if toggled {
                self.toggle_word_fragments(&chars, &word, group)?;
            }
        }
        Ok(())
    }

    fn add_words(&mut self, a: &str, b: &str, freq_increment: u32, prefix: &str) -> Result<(), SpellingError> {
        self.common.adjust_words_freq(&lowercase_word(a), &lowercase_word(b), freq_increment as i64, prefix);
        Ok(())
    }

    fn remove_words(&mut self, a: &str, b: &str, freq_decrement: u32, prefix: &str) -> Result<(), SpellingError> {
        self.common.adjust_words_freq(&lowercase_word(a), &lowercase_word(b), -(freq_decrement as i64), prefix);
        Ok(())
    }

    fn enable_spelling(&mut self, prefix: &str, group_prefix: &str) -> Result<(), SpellingError> {
        self.common.enable_spelling(prefix, group_prefix)
    }

    fn disable_spelling(&mut self, prefix: &str) -> Result<(), SpellingError> {
        self.common.disable_spelling(prefix)
    }

    fn is_spelling_enabled(&self, prefix: &str) -> bool {
        self.common.is_spelling_enabled(prefix)
    }

    fn flush(&mut self) -> Result<(), SpellingError> {
        self.flush_fragments_only();
        self.fragment_changes.clear();
        self.common.flush()
    }

    fn cancel(&mut self) {
        self.fragment_changes.clear();
        self.common.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test0001_word_list_roundtrip() {
        let words: Vec<String> = vec!["apple", "apply", "banana"].into_iter().map(String::from).collect();
        let encoded = encode_word_list(&words);
        assert_eq!(decode_word_list(&encoded), words);
    }

    #[test]
    fn test0002_add_then_lookup_exact() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        let results: Vec<_> = table.open_termlist("hello", 0, "").collect();
        assert!(results.iter().any(|(w, _)| w == "hello"));
    }

    #[test]
    fn test0003_fuzzy_lookup_finds_close_word() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        let results: Vec<_> = table.open_termlist("hallo", 1, "").collect();
        assert!(results.iter().any(|(w, _)| w == "hello"));
    }

    #[test]
    fn test0004_remove_word_toggles_off() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        table.remove_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        let results: Vec<_> = table.open_termlist("hello", 0, "").collect();
        assert!(!results.iter().any(|(w, _)| w == "hello"));
    }

    #[test]
    fn test0005_oversized_word_rejected() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        let long_word: String = std::iter::repeat('a').take(300).collect();
        assert!(table.add_word(&long_word, 1, "").is_err());
    }

    #[test]
    fn test0006_disabled_prefix_yields_no_candidates() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "author:").unwrap();
        table.flush().unwrap();
        let results: Vec<_> = table.open_termlist("hello", 0, "author:").collect();
        assert!(results.is_empty());
    }
}
