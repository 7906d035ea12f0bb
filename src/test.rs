//! Shared test fixtures used by unit tests across modules and by the
//! integration tests in `tests/`, keeping fixture builders in a dedicated
//! `test` module rather than duplicating setup in every test file.

use crate::backend_fastss::FastSsSpellingTable;
use crate::backend_ngram::NGramSpellingTable;
use crate::keyboard::SpellingKeyboard;
use crate::spelling_table::SpellingTable;
use crate::store::MemoryStore;

/// A small vocabulary with one deliberate misspelling pair and one bigram,
/// used by several integration tests.
pub const TEST_VOCABULARY: &[(&str, u32)] = &[
    ("hello", 1000),
    ("world", 800),
    ("new", 500),
    ("york", 500),
    ("data", 300),
    ("base", 300),
    ("database", 1_000_000),
];

pub const TEST_BIGRAMS: &[(&str, &str, u32)] = &[("new", "york", 400), ("data", "base", 1)];

pub fn get_test_vocabulary() -> &'static [(&'static str, u32)] {
    TEST_VOCABULARY
}

pub fn populate<T: SpellingTable>(table: &mut T) {
    for &(word, freq) in TEST_VOCABULARY {
        table.add_word(word, freq, "").expect("fixture words must be indexable");
    }
    for &(a, b, freq) in TEST_BIGRAMS {
        table.add_words(a, b, freq, "").expect("fixture bigrams must be indexable");
    }
    table.flush().expect("fixture flush must succeed against an in-memory store");
}

pub fn get_test_ngram_table() -> NGramSpellingTable<MemoryStore> {
    let mut table = NGramSpellingTable::new(MemoryStore::new());
    populate(&mut table);
    table
}

pub fn get_test_fastss_table() -> FastSsSpellingTable<MemoryStore> {
    let mut table = FastSsSpellingTable::new(MemoryStore::new());
    populate(&mut table);
    table
}

/// A tiny two-letter stand-in keyboard layout, just large enough to
/// exercise `convert_to_layout`/`convert_from_layout` without pulling in a
/// full `.tr`-derived language table.
pub fn get_test_keyboard() -> SpellingKeyboard {
    SpellingKeyboard::new(&[('\u{0444}', 'a'), ('\u{044b}', 's')])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test0001_fixture_vocabulary_is_queryable() {
        let mut table = get_test_ngram_table();
        assert_eq!(table.get_word_frequency("hello", ""), 1000);
    }

    #[test]
    fn test0002_fixture_bigram_is_queryable() {
        let mut table = get_test_ngram_table();
        assert_eq!(table.get_words_frequency("new", "york", ""), 400);
    }
}
