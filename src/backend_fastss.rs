//! FastSS k-deletion index, "brass-fastss" backend: indexes
//! every word by its bounded k-deletion neighborhood so that a query can be
//! matched by probing its own k-deletion neighborhood for overlap.

use crate::error::SpellingError;
use crate::spelling_table::{
    or_merge_fragment_lists, CandidateList, SpellingTable, SpellingTableCommon, PREFIX_DISABLED,
};
use crate::store::BackingStore;
use crate::unicode::{codepoints, lowercase_word};
use crate::varint::{decode_varint, encode_varint};
use std::cmp::Ordering;
use std::collections::HashMap;

const K: usize = 2;
const LIMIT: usize = 8;
const PREFIX_LENGTH: usize = 3;
const KEY_SIGNATURE: u8 = b'I';
const WORD_SIGNATURE: &[u8] = b"WI";

/// All subsets (as bitmasks over `0..min(L, LIMIT)`) of up to `K` positions
/// to delete.
fn deletion_masks(len: usize) -> Vec<u32> {
    let bound = len.min(LIMIT);
    let mut masks = vec![0u32];
    for mask in 0u32..(1u32 << bound) {
        if mask.count_ones() as usize <= K && mask != 0 {
            masks.push(mask);
        }
    }
    masks
}

fn surviving_chars(chars: &[char], mask: u32) -> Vec<char> {
    chars
        .iter()
        .enumerate()
        .filter(|(i, _)| *i >= LIMIT || mask & (1 << i) == 0)
        .map(|(_, &c)| c)
        .collect()
}

fn key_prefix(chars: &[char], mask: u32) -> String {
    surviving_chars(chars, mask).into_iter().take(PREFIX_LENGTH).collect()
}

fn index_key(prefix_group: u8, prefix: &str) -> Vec<u8> {
    let mut key = vec![KEY_SIGNATURE, prefix_group];
    key.extend_from_slice(prefix.as_bytes());
    key
}

fn word_key(word_index: u64) -> Vec<u8> {
    let mut key = WORD_SIGNATURE.to_vec();
    encode_varint(word_index, &mut key);
    key
}

/// Compares two (word, error_mask) pairs over their surviving characters,
/// up to `limit` characters — kept byte-for-byte faithful to the source
/// behaviour including its `limit = max(|w1|, |w2|)` asymmetry, which can
/// be non-transitive for pathological inputs (see the property test in
/// `tests/`). Callers must not rely on this for anything beyond sort order
/// within one index bucket; true matching is re-validated by real edit
/// distance upstream.
pub fn compare_string(w1: &[char], mask1: u32, w2: &[char], mask2: u32) -> Ordering {
    let limit = w1.len().max(w2.len());
    let s1 = surviving_chars(w1, mask1);
    let s2 = surviving_chars(w2, mask2);
    for i in 0..limit {
        let c1 = s1.get(i);
        let c2 = s2.get(i);
        match (c1, c2) {
            (Some(a), Some(b)) if a == b => continue,
            (Some(a), Some(b)) => return a.cmp(b),
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
    Ordering::Equal
}

fn encode_postings(entries: &[(u64, u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (word_index, mask) in entries {
        encode_varint(*word_index, &mut out);
        encode_varint(*mask as u64, &mut out);
    }
    out
}

fn decode_postings(data: &[u8]) -> Vec<(u64, u32)> {
    let mut out = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let (word_index, c1) = match decode_varint(rest) {
            Some(v) => v,
            None => break,
        };
        rest = &rest[c1..];
        let (mask, c2) = match decode_varint(rest) {
            Some(v) => v,
            None => break,
        };
        rest = &rest[c2..];
        out.push((word_index, mask as u32));
    }
    out
}

pub struct FastSsSpellingTable<B: BackingStore> {
    common: SpellingTableCommon<B>,
    postings_changes: HashMap<Vec<u8>, Vec<(u64, u32)>>,
    word_changes: HashMap<u64, Option<String>>,
    word_ids: HashMap<String, u64>,
    next_word_index: u64,
}

impl<B: BackingStore> FastSsSpellingTable<B> {
    pub fn new(store: B) -> Self {
        FastSsSpellingTable {
            common: SpellingTableCommon::new(store),
            postings_changes: HashMap::new(),
            word_changes: HashMap::new(),
            word_ids: HashMap::new(),
            next_word_index: 0,
        }
    }

    fn load_postings(&self, key: &[u8]) -> Vec<(u64, u32)> {
        if let Some(list) = self.postings_changes.get(key) {
            return list.clone();
        }
        self.common.store.get_exact_entry(key).map(|v| decode_postings(&v)).unwrap_or_default()
    }

    fn resolve_word_index(&mut self, word: &str) -> u64 {
        if let Some(&idx) = self.word_ids.get(word) {
            return idx;
        }
        let idx = self.next_word_index;
        self.next_word_index += 1;
        self.word_ids.insert(word.to_string(), idx);
        self.word_changes.insert(idx, Some(word.to_string()));
        idx
    }

    fn lookup_word(&self, word_index: u64) -> Option<String> {
        if let Some(change) = self.word_changes.get(&word_index) {
            return change.clone();
        }
        self.common
            .store
            .get_exact_entry(&word_key(word_index))
            .and_then(|v| String::from_utf8(v).ok())
    }

    fn toggle_word_postings(&mut self, chars: &[char], word: &str, prefix_group: u8) {
        if chars.len() < 2 {
            return;
        }
        let word_index = self.resolve_word_index(word);
        for mask in deletion_masks(chars.len()) {
            let prefix = key_prefix(chars, mask);
            let key = index_key(prefix_group, &prefix);
            let mut postings = self.load_postings(&key);
            match postings.iter().position(|(idx, m)| *idx == word_index && *m == mask) {
                Some(pos) => {
                    postings.remove(pos);
                }
                None => {
                    let probe = (chars.to_vec(), mask);
                    let insert_at = postings
                        .binary_search_by(|(idx, m)| {
                            let other_word: Vec<char> =
                                self.lookup_word(*idx).map(|w| codepoints(&w)).unwrap_or_default();
                            compare_string(&other_word, *m, &probe.0, probe.1)
                        })
                        .unwrap_or_else(|e| e);
                    postings.insert(insert_at, (word_index, mask));
                }
            }
            self.postings_changes.insert(key, postings);
        }
    }

    fn flush_postings_only(&mut self) {
        for (idx, word) in self.word_changes.iter() {
            match word {
                Some(w) => self.common.store.add(&word_key(*idx), w.as_bytes()),
                None => self.common.store.del(&word_key(*idx)),
            }
        }
        for (key, postings) in self.postings_changes.iter() {
            if postings.is_empty() {
                self.common.store.del(key);
            } else {
                self.common.store.add(key, &encode_postings(postings));
            }
        }
    }
}

impl<B: BackingStore> SpellingTable for FastSsSpellingTable<B> {
    fn open_termlist(&mut self, word: &str, max_distance: u32, prefix: &str) -> CandidateList {
        self.common.flush_unigrams_only();
        self.flush_postings_only();
        let group = self.common.resolve_prefix_group(prefix);
        if group == PREFIX_DISABLED {
            return CandidateList::empty();
        }
        let word = lowercase_word(word);
        let chars = codepoints(&word);
        let _ = max_distance;
        let mut lists = Vec::new();
        for mask in deletion_masks(chars.len()) {
            let prefix_str = key_prefix(&chars, mask);
            let key = index_key(group, &prefix_str);
            let postings = self.load_postings(&key);
            let words: Vec<String> = postings
                .into_iter()
                .filter_map(|(idx, _mask)| self.lookup_word(idx))
                .collect();
            if !words.is_empty() {
                let mut sorted = words;
                sorted.sort();
                sorted.dedup();
                lists.push(sorted);
            }
        }
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
        if let Some((group, toggled)) = self.common.adjust_word_freq(&word, freq_increment as i64, prefix) {
            if toggled {
                self.toggle_word_postings(&chars, &word, group);
            }
        }
        Ok(())
    }

    fn remove_word(&mut self, word: &str, freq_decrement: u32, prefix: &str) -> Result<(), SpellingError> {
        let word = lowercase_word(word);
        let chars = codepoints(&word);
        if let Some((group, toggled)) = self.common.adjust_word_freq(&word, -(freq_decrement as i64), prefix) {
            if toggled {
                self.toggle_word_postings(&chars, &word, group);
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
        self.flush_postings_only();
        self.postings_changes.clear();
        self.word_changes.clear();
        self.common.flush()
    }

    fn cancel(&mut self) {
        self.postings_changes.clear();
        self.word_changes.clear();
        self.common.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test0001_deletion_masks_bounded_by_k() {
        let masks = deletion_masks(5);
        assert!(masks.iter().all(|m| m.count_ones() <= K as u32));
        assert!(masks.contains(&0));
    }

    #[test]
    fn test0002_add_then_lookup_exact() {
        let mut table = FastSsSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        let results: Vec<_> = table.open_termlist("hello", 0, "").collect();
        assert!(results.iter().any(|(w, _)| w == "hello"));
    }

    #[test]
    fn test0003_single_deletion_neighbor_found() {
        let mut table = FastSsSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        // "helo" is hello with one 'l' deleted; shares a 1-deletion bucket.
        let results: Vec<_> = table.open_termlist("helo", 1, "").collect();
        assert!(results.iter().any(|(w, _)| w == "hello"));
    }

    #[test]
    fn test0004_remove_word_clears_postings() {
        let mut table = FastSsSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        table.remove_word("hello", 10, "").unwrap();
        table.flush().unwrap();
        let results: Vec<_> = table.open_termlist("hello", 0, "").collect();
        assert!(!results.iter().any(|(w, _)| w == "hello"));
    }

    #[test]
    fn test0005_compare_string_non_transitivity_is_recorded_not_asserted_away() {
        // Property-style spot check: compare_string's limit = max(len)
        // asymmetry means transitivity of the resulting order is not
        // guaranteed. This test records the known shape of the issue
        // rather than asserting it can't happen.
        let a: Vec<char> = "ab".chars().collect();
        let b: Vec<char> = "abz".chars().collect();
        let c: Vec<char> = "abzz".chars().collect();
        let ab = compare_string(&a, 0, &b, 0);
        let bc = compare_string(&b, 0, &c, 0);
        let ac = compare_string(&a, 0, &c, 0);
        // No assertion on a single global ordering holding transitively;
        // just confirm the comparator terminates and is internally
        // consistent with itself (anti-symmetric) for this triple.
        assert_eq!(ab, compare_string(&b, 0, &a, 0).reverse());
        assert_eq!(bc, compare_string(&c, 0, &b, 0).reverse());
        assert_eq!(ac, compare_string(&c, 0, &a, 0).reverse());
    }
}
