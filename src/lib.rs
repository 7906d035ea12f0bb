//! A full-text search engine's spelling-correction subsystem: weighted
//! keyboard-aware edit distance, phonetic matching, transliteration,
//! frequency-backed candidate generation over two interchangeable on-disk
//! index layouts, sequence correction and splitting/merging, all built on
//! top of a small backing-store abstraction.

pub mod backend_fastss;
pub mod backend_ngram;
pub mod corrector;
pub mod distance;
pub mod error;
pub mod facade;
pub mod keyboard;
pub mod phonetic;
pub mod sequence;
pub mod spelling_table;
pub mod splitter;
pub mod store;
pub mod test;
pub mod transliteration;
pub mod unicode;
pub mod varint;

pub use crate::corrector::{correct_word, Candidate, CorrectorConfig};
pub use crate::error::SpellingError;
pub use crate::facade::correct;
pub use crate::keyboard::SpellingKeyboard;
pub use crate::spelling_table::SpellingTable;
pub use crate::transliteration::Transliterator;

use crate::backend_fastss::FastSsSpellingTable;
use crate::backend_ngram::NGramSpellingTable;
use crate::store::MemoryStore;

/// Which on-disk fragment-index layout backs a `SpellingConfig`.
/// Both index exactly the same unigram/bigram data; they differ only in
/// how candidate generation is organised under the hood.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpellingBackend {
    /// Trigram positional fragment index ("brass-new").
    NGram,
    /// K-deletion neighborhood index ("brass-fastss").
    FastSs,
}

/// Runtime-polymorphic handle to either concrete backend, so callers that
/// need to pick a backend at runtime (e.g. from a CLI flag) don't need to
/// be generic over the backend type.
pub enum SpellingStore {
    NGram(NGramSpellingTable<MemoryStore>),
    FastSs(FastSsSpellingTable<MemoryStore>),
}

impl SpellingTable for SpellingStore {
    fn open_termlist(&mut self, word: &str, max_distance: u32, prefix: &str) -> spelling_table::CandidateList {
        match self {
            SpellingStore::NGram(t) => t.open_termlist(word, max_distance, prefix),
            SpellingStore::FastSs(t) => t.open_termlist(word, max_distance, prefix),
        }
    }
    fn get_word_frequency(&self, word: &str, prefix: &str) -> u32 {
        match self {
            SpellingStore::NGram(t) => t.get_word_frequency(word, prefix),
            SpellingStore::FastSs(t) => t.get_word_frequency(word, prefix),
        }
    }
    fn get_words_frequency(&self, a: &str, b: &str, prefix: &str) -> u32 {
        match self {
            SpellingStore::NGram(t) => t.get_words_frequency(a, b, prefix),
            SpellingStore::FastSs(t) => t.get_words_frequency(a, b, prefix),
        }
    }
    fn add_word(&mut self, word: &str, freq_increment: u32, prefix: &str) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.add_word(word, freq_increment, prefix),
            SpellingStore::FastSs(t) => t.add_word(word, freq_increment, prefix),
        }
    }
    fn remove_word(&mut self, word: &str, freq_decrement: u32, prefix: &str) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.remove_word(word, freq_decrement, prefix),
            SpellingStore::FastSs(t) => t.remove_word(word, freq_decrement, prefix),
        }
    }
    fn add_words(&mut self, a: &str, b: &str, freq_increment: u32, prefix: &str) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.add_words(a, b, freq_increment, prefix),
            SpellingStore::FastSs(t) => t.add_words(a, b, freq_increment, prefix),
        }
    }
    fn remove_words(&mut self, a: &str, b: &str, freq_decrement: u32, prefix: &str) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.remove_words(a, b, freq_decrement, prefix),
            SpellingStore::FastSs(t) => t.remove_words(a, b, freq_decrement, prefix),
        }
    }
    fn enable_spelling(&mut self, prefix: &str, group_prefix: &str) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.enable_spelling(prefix, group_prefix),
            SpellingStore::FastSs(t) => t.enable_spelling(prefix, group_prefix),
        }
    }
    fn disable_spelling(&mut self, prefix: &str) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.disable_spelling(prefix),
            SpellingStore::FastSs(t) => t.disable_spelling(prefix),
        }
    }
    fn is_spelling_enabled(&self, prefix: &str) -> bool {
        match self {
            SpellingStore::NGram(t) => t.is_spelling_enabled(prefix),
            SpellingStore::FastSs(t) => t.is_spelling_enabled(prefix),
        }
    }
    fn flush(&mut self) -> Result<(), SpellingError> {
        match self {
            SpellingStore::NGram(t) => t.flush(),
            SpellingStore::FastSs(t) => t.flush(),
        }
    }
    fn cancel(&mut self) {
        match self {
            SpellingStore::NGram(t) => t.cancel(),
            SpellingStore::FastSs(t) => t.cancel(),
        }
    }
}

/// Builder for the whole subsystem: picks a backend, an optional language
/// keyboard/transliterator pair, and debug logging, using a `with_*`-builder
/// idiom.
pub struct SpellingConfig {
    pub backend: SpellingBackend,
    pub keyboard: SpellingKeyboard,
    pub transliterator: Option<Transliterator>,
    pub result_count: usize,
    pub debug: bool,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        SpellingConfig {
            backend: SpellingBackend::NGram,
            keyboard: SpellingKeyboard::identity(),
            transliterator: None,
            result_count: 3,
            debug: false,
        }
    }
}

impl SpellingConfig {
    pub fn with_backend(mut self, backend: SpellingBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_keyboard(mut self, keyboard: SpellingKeyboard) -> Self {
        self.keyboard = keyboard;
        self
    }

    pub fn with_transliterator(mut self, transliterator: Transliterator) -> Self {
        self.transliterator = Some(transliterator);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn build_store(&self) -> SpellingStore {
        match self.backend {
            SpellingBackend::NGram => SpellingStore::NGram(NGramSpellingTable::new(MemoryStore::new())),
            SpellingBackend::FastSs => SpellingStore::FastSs(FastSsSpellingTable::new(MemoryStore::new())),
        }
    }

    fn debug_log(&self, message: &str) {
        if self.debug {
            eprintln!("[xapian-spelling] {}", message);
        }
    }

    /// Corrects a single word, delegating to the candidate corrector.
    pub fn correct_word(&self, store: &mut SpellingStore, word: &str, prefix: &str) -> Vec<Candidate> {
        self.debug_log(&format!("correcting word {:?}", word));
        let config = CorrectorConfig { prefix: prefix.to_string(), ..CorrectorConfig::default() };
        correct_word(store, &self.keyboard, self.transliterator.as_ref(), word, &config)
    }

    /// Corrects a token sequence via the facade, trying both the
    /// sequence corrector and the splitter/merger.
    pub fn correct_sequence(&self, store: &mut SpellingStore, tokens: &[String], prefix: &str) -> Option<Vec<String>> {
        self.debug_log(&format!("correcting sequence of {} tokens", tokens.len()));
        correct(store, &self.keyboard, self.transliterator.as_ref(), tokens, prefix, self.result_count)
    }
}
