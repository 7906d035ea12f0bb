//! Facade: the single entry point a caller uses to correct a
//! token sequence, dispatching to the sequence corrector and the
//! splitter/merger and returning whichever produced the better result.

use crate::keyboard::SpellingKeyboard;
use crate::sequence::correct_sequence;
use crate::spelling_table::SpellingTable;
use crate::splitter::correct_split;
use crate::transliteration::Transliterator;

fn log_freq(freq: u32) -> f64 {
    (1.0 + freq as f64).log2()
}

/// Scores a candidate correction by the sum of its tokens' unigram
/// log-frequencies, used only to compare the sequence corrector's and the
/// splitter's outputs against each other (not a replacement for either
/// module's own internal scoring).
fn score_tokens(table: &mut dyn SpellingTable, tokens: &[String], prefix: &str) -> f64 {
    tokens.iter().map(|t| log_freq(table.get_word_frequency(t, prefix))).sum()
}

/// Corrects `tokens`, trying both the sequence corrector and the
/// splitter/merger — including splitting a single mistyped compound into
/// more than one word — and returning whichever non-empty result scores
/// higher. Returns `None` if neither module found anything better than the
/// input as given.
pub fn correct(
    table: &mut dyn SpellingTable,
    keyboard: &SpellingKeyboard,
    transliterator: Option<&Transliterator>,
    tokens: &[String],
    prefix: &str,
    result_count: usize,
) -> Option<Vec<String>> {
    let sequence_result = correct_sequence(table, keyboard, transliterator, tokens, prefix, result_count);
    let split_result = correct_split(table, tokens, prefix, result_count);

    match (sequence_result, split_result) {
        (Some(seq), Some(split)) => {
            let seq_score = score_tokens(table, &seq, prefix);
            let split_score = score_tokens(table, &split, prefix);
            if split_score > seq_score {
                Some(split)
            } else {
                Some(seq)
            }
        }
        (Some(seq), None) => Some(seq),
        (None, Some(split)) => Some(split),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend_ngram::NGramSpellingTable;
    use crate::store::MemoryStore;

    #[test]
    fn test0001_single_word_correction_with_no_split_candidates() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 100, "").unwrap();
        table.add_word("hallo", 1, "").unwrap();
        table.flush().unwrap();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["hwllo".to_string()];
        let result = correct(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, Some(vec!["hello".to_string()]));
    }

    #[test]
    fn test0004_single_token_splits_into_compound_words() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("power", 100, "").unwrap();
        table.add_word("house", 100, "").unwrap();
        table.add_words("power", "house", 50, "").unwrap();
        table.flush().unwrap();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["powerhouse".to_string()];
        let result = correct(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, Some(vec!["power".to_string(), "house".to_string()]));
    }

    #[test]
    fn test0002_merge_preferred_over_unchanged_sequence() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("data", 100, "").unwrap();
        table.add_word("base", 100, "").unwrap();
        table.add_word("database", 1_000_000, "").unwrap();
        table.add_words("data", "base", 1, "").unwrap();
        table.flush().unwrap();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["data".to_string(), "base".to_string()];
        let result = correct(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, Some(vec!["database".to_string()]));
    }

    #[test]
    fn test0003_nothing_to_correct_is_none() {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("hello", 100, "").unwrap();
        table.add_word("world", 100, "").unwrap();
        table.flush().unwrap();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["hello".to_string(), "world".to_string()];
        let result = correct(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, None);
    }
}
