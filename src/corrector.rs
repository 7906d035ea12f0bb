//! Single-word candidate corrector: ranks the over-generated
//! candidates coming out of a `SpellingTable` fragment lookup by true,
//! weighted edit distance and returns the best `K`.

use crate::distance::{damerau_levenshtein, ExtendedEditDistance};
use crate::keyboard::SpellingKeyboard;
use crate::spelling_table::SpellingTable;
use crate::transliteration::Transliterator;
use crate::unicode::codepoints;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

fn log_freq(freq: u32) -> f64 {
    (1.0 + freq as f64).log2()
}

/// Total ordering wrapper for `f64` distances, needed because `BinaryHeap`
/// requires `Ord` and edit distances are never `NaN`.
#[derive(Debug, Clone, PartialEq)]
struct OrderedDistance(f64);

impl Eq for OrderedDistance {}

impl PartialOrd for OrderedDistance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedDistance {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

pub struct CorrectorConfig {
    pub max_edit_distance: u32,
    pub candidate_limit: usize,
    pub skip_exact: bool,
    pub use_freq: bool,
    pub prefix: String,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig {
            max_edit_distance: 2,
            candidate_limit: 5,
            skip_exact: false,
            use_freq: true,
            prefix: String::new(),
        }
    }
}

/// A ranked correction candidate: the word and its distance (weighted, or
/// weighted-over-log-freq when `use_freq` is set).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub word: String,
    pub distance: f64,
    pub freq: u32,
}

pub fn correct_word(
    table: &mut dyn SpellingTable,
    keyboard: &SpellingKeyboard,
    transliterator: Option<&Transliterator>,
    word: &str,
    config: &CorrectorConfig,
) -> Vec<Candidate> {
    let mut eed = ExtendedEditDistance::new(keyboard.clone());
    let word_chars = codepoints(word);
    let word_len = word_chars.len();

    // Reverse-ordered so the BinaryHeap (a max-heap) behaves as a min-heap
    // keyed ascending by distance; capacity is bounded to `candidate_limit`
    // by evicting the current worst element once full.
    let mut heap: BinaryHeap<(OrderedDistance, Reverse<String>, u32)> = BinaryHeap::new();

    for (candidate_word, freq) in table.open_termlist(word, config.max_edit_distance, &config.prefix) {
        let candidate_chars = codepoints(&candidate_word);
        if (candidate_chars.len() as i64 - word_len as i64).unsigned_abs() as u32 > config.max_edit_distance {
            continue;
        }
        let crude = damerau_levenshtein(&word_chars, &candidate_chars, config.max_edit_distance);
        if crude > config.max_edit_distance {
            continue;
        }
        let mut distance = eed.edit_distance(&word_chars, &candidate_chars, config.max_edit_distance);
        if config.skip_exact && distance == 0.0 {
            continue;
        }
        if config.use_freq {
            distance /= log_freq(freq).max(f64::MIN_POSITIVE);
        }
        heap.push((OrderedDistance(distance), Reverse(candidate_word), freq));
        if heap.len() > config.candidate_limit {
            heap.pop();
        }
    }

    if let Some(swapped) = keyboard.convert_from_layout(word) {
        let freq = table.get_word_frequency(&swapped, &config.prefix);
        if freq > 0 {
            heap.push((OrderedDistance(0.0), Reverse(swapped), freq));
            if heap.len() > config.candidate_limit {
                heap.pop();
            }
        }
    }
    if let Some(swapped) = keyboard.convert_to_layout(word) {
        let freq = table.get_word_frequency(&swapped, &config.prefix);
        if freq > 0 {
            heap.push((OrderedDistance(0.0), Reverse(swapped), freq));
            if heap.len() > config.candidate_limit {
                heap.pop();
            }
        }
    }
    if let Some(tr) = transliterator {
        for variant in tr.get_transliterations(word) {
            let freq = table.get_word_frequency(&variant, &config.prefix);
            if freq > 0 {
                heap.push((OrderedDistance(0.0), Reverse(variant), freq));
                if heap.len() > config.candidate_limit {
                    heap.pop();
                }
            }
        }
    }

    let mut results: Vec<Candidate> = heap
        .into_iter()
        .map(|(OrderedDistance(distance), Reverse(word), freq)| Candidate { word, distance, freq })
        .collect();
    results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend_ngram::NGramSpellingTable;
    use crate::store::MemoryStore;

    fn fixture_table() -> NGramSpellingTable<MemoryStore> {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 100, "").unwrap();
        table.add_word("hallo", 5, "").unwrap();
        table.add_word("yellow", 20, "").unwrap();
        table.flush().unwrap();
        table
    }

    #[test]
    fn test0001_misspelling_corrected_to_closest() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let config = CorrectorConfig::default();
        let results = correct_word(&mut table, &keyboard, None, "hwllo", &config);
        assert_eq!(results[0].word, "hello");
    }

    #[test]
    fn test0002_skip_exact_excludes_identical_word() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let mut config = CorrectorConfig::default();
        config.skip_exact = true;
        let results = correct_word(&mut table, &keyboard, None, "hello", &config);
        assert!(!results.iter().any(|c| c.word == "hello" && c.distance == 0.0));
    }

    #[test]
    fn test0003_candidate_limit_respected() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let mut config = CorrectorConfig::default();
        config.candidate_limit = 1;
        config.max_edit_distance = 3;
        let results = correct_word(&mut table, &keyboard, None, "hwllo", &config);
        assert!(results.len() <= 1);
    }

    #[test]
    fn test0004_results_sorted_ascending_by_distance() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let config = CorrectorConfig::default();
        let results = correct_word(&mut table, &keyboard, None, "hwllo", &config);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }
}
