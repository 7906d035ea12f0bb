//! Sequence corrector: corrects a whole token sequence at
//! once via a memoized DP that scores bigram continuity, not just
//! per-token edit distance, and returns a diversity-ranked set of
//! continuations at each state rather than collapsing early to a single
//! best guess.

use crate::corrector::{correct_word, Candidate, CorrectorConfig};
use crate::keyboard::SpellingKeyboard;
use crate::spelling_table::SpellingTable;
use crate::transliteration::Transliterator;
use std::collections::HashMap;

pub const MAX_GAP: usize = 1;
pub const LIMIT_CORRECTIONS: usize = 5;
pub const MAX_SPLIT_COUNT: usize = 1;
pub const MAX_MERGE_COUNT: usize = 1;

fn log_freq(freq: u32) -> f64 {
    (1.0 + freq as f64).log2()
}

/// Per-position candidate list: the original token (index 0, frequency
/// pulled from the table) followed by up to `LIMIT_CORRECTIONS` correction
/// candidates.
fn candidates_for_token(
    table: &mut dyn SpellingTable,
    keyboard: &SpellingKeyboard,
    transliterator: Option<&Transliterator>,
    token: &str,
    prefix: &str,
) -> Vec<Candidate> {
    let original_freq = table.get_word_frequency(token, prefix);
    let mut out = vec![Candidate { word: token.to_string(), distance: 0.0, freq: original_freq }];
    let config = CorrectorConfig {
        max_edit_distance: 2,
        candidate_limit: LIMIT_CORRECTIONS,
        skip_exact: true,
        use_freq: true,
        prefix: prefix.to_string(),
    };
    for candidate in correct_word(table, keyboard, transliterator, token, &config) {
        if out.len() >= LIMIT_CORRECTIONS + 1 {
            break;
        }
        if candidate.word != token {
            out.push(candidate);
        }
    }
    out
}

/// One value in the DP arena: the score reached at `(position, candidate
/// index)` via the best predecessor, plus that predecessor's arena index
/// (`usize::MAX` sentinel for "no predecessor", i.e. position 0).
#[derive(Clone)]
struct Node {
    position: usize,
    candidate_index: usize,
    score: f64,
    prev: usize,
}

/// A diversity-ranked path set at one DP state: up to `result_count` arena
/// indices of distinct continuations, ranked by the policy.
fn diversity_rank(paths: &[Vec<usize>], scores: &[f64], result_count: usize) -> Vec<usize> {
    if paths.is_empty() {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..paths.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap());
    let mut picked = vec![order[0]];
    while picked.len() < result_count && picked.len() < paths.len() {
        let mut best_idx = None;
        let mut best_key = (-1i64, f64::NEG_INFINITY);
        for &cand in &order {
            if picked.contains(&cand) {
                continue;
            }
            let hamming: i64 = picked
                .iter()
                .map(|&p| {
                    paths[cand]
                        .iter()
                        .zip(paths[p].iter())
                        .filter(|(a, b)| a != b)
                        .count() as i64
                })
                .sum();
            let key = (hamming, scores[cand]);
            if key > best_key {
                best_key = key;
                best_idx = Some(cand);
            }
        }
        match best_idx {
            Some(idx) => picked.push(idx),
            None => break,
        }
    }
    picked
}

/// Corrects an entire tokenized query at once, scoring continuations by
/// bigram frequency rather than independent per-token distance.
///
/// Returns `None` if the best-scoring path never deviates from the
/// original tokens (idempotence: a correction that changes nothing is
/// reported as "no correction" rather than an empty-looking success).
pub fn correct_sequence(
    table: &mut dyn SpellingTable,
    keyboard: &SpellingKeyboard,
    transliterator: Option<&Transliterator>,
    tokens: &[String],
    prefix: &str,
    result_count: usize,
) -> Option<Vec<String>> {
    if tokens.is_empty() {
        return None;
    }
    let per_position: Vec<Vec<Candidate>> = tokens
        .iter()
        .map(|t| candidates_for_token(table, keyboard, transliterator, t, prefix))
        .collect();

    // memo[i] holds the diversity-ranked set of arena indices reachable at
    // position i, keyed by which candidate index was chosen there.
    let mut arena: Vec<Node> = Vec::new();
    let mut memo: Vec<HashMap<usize, usize>> = vec![HashMap::new(); tokens.len()];

    for (cand_idx, candidate) in per_position[0].iter().enumerate() {
        let mut score = 0.0;
        if tokens.len() == 1 {
            score += log_freq(candidate.freq);
        }
        let node = Node { position: 0, candidate_index: cand_idx, score, prev: usize::MAX };
        let idx = arena.len();
        arena.push(node);
        memo[0].insert(cand_idx, idx);
    }

    for pos in 1..tokens.len() {
        let mut frontier_paths: Vec<Vec<usize>> = Vec::new();
        let mut frontier_scores: Vec<f64> = Vec::new();
        let mut frontier_meta: Vec<(usize, usize)> = Vec::new(); // (cand_idx, prev_arena_idx)

        for (cand_idx, candidate) in per_position[pos].iter().enumerate() {
            for (&prev_cand_idx, &prev_arena_idx) in memo[pos - 1].iter() {
                let mut bigram_score = 0.0;
                for gap in 0..=MAX_GAP.min(pos - 1) {
                    let back_pos = pos - gap - 1;
                    let back_word = if back_pos == pos - 1 {
                        &per_position[back_pos][prev_cand_idx].word
                    } else {
                        &per_position[back_pos][0].word
                    };
                    let bigram_freq = table.get_words_frequency(back_word, &candidate.word, prefix);
                    bigram_score += log_freq(bigram_freq);
                }
                let total = arena[prev_arena_idx].score + bigram_score;
                let mut path: Vec<usize> = reconstruct_candidate_path(&arena, prev_arena_idx);
                path.push(cand_idx);
                frontier_paths.push(path);
                frontier_scores.push(total);
                frontier_meta.push((cand_idx, prev_arena_idx));
            }
        }

        let chosen = diversity_rank(&frontier_paths, &frontier_scores, result_count.max(1));
        for &choice in &chosen {
            let (cand_idx, prev_arena_idx) = frontier_meta[choice];
            let idx = arena.len();
            arena.push(Node {
                position: pos,
                candidate_index: cand_idx,
                score: frontier_scores[choice],
                prev: prev_arena_idx,
            });
            memo[pos].entry(cand_idx).or_insert(idx);
        }
    }

    let best_idx = *memo[tokens.len() - 1]
        .values()
        .max_by(|&&a, &&b| arena[a].score.partial_cmp(&arena[b].score).unwrap())?;

    let path = reconstruct_candidate_path(&arena, best_idx);
    if path.iter().all(|&c| c == 0) {
        return None;
    }

    let corrected: Vec<String> = path
        .iter()
        .enumerate()
        .map(|(pos, &cand_idx)| per_position[pos][cand_idx].word.clone())
        .collect();
    Some(corrected)
}

fn reconstruct_candidate_path(arena: &[Node], mut idx: usize) -> Vec<usize> {
    let mut path = Vec::new();
    loop {
        path.push(arena[idx].candidate_index);
        if arena[idx].prev == usize::MAX {
            break;
        }
        idx = arena[idx].prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend_ngram::NGramSpellingTable;
    use crate::store::MemoryStore;

    fn fixture_table() -> NGramSpellingTable<MemoryStore> {
        let mut table = NGramSpellingTable::new(MemoryStore::new());
        table.add_word("new", 500, "").unwrap();
        table.add_word("york", 500, "").unwrap();
        table.add_word("nwe", 1, "").unwrap();
        table.add_words("new", "york", 400, "").unwrap();
        table.flush().unwrap();
        table
    }

    #[test]
    fn test0001_unchanged_sequence_returns_none() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["new".to_string(), "york".to_string()];
        let result = correct_sequence(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, None);
    }

    #[test]
    fn test0002_misspelled_token_corrected_via_bigram_context() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["nwe".to_string(), "york".to_string()];
        let result = correct_sequence(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, Some(vec!["new".to_string(), "york".to_string()]));
    }

    #[test]
    fn test0003_single_token_uses_unigram_freq() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let tokens = vec!["nwe".to_string()];
        let result = correct_sequence(&mut table, &keyboard, None, &tokens, "", 3);
        assert_eq!(result, Some(vec!["new".to_string()]));
    }

    #[test]
    fn test0004_empty_sequence_is_none() {
        let mut table = fixture_table();
        let keyboard = SpellingKeyboard::identity();
        let result = correct_sequence(&mut table, &keyboard, None, &[], "", 3);
        assert_eq!(result, None);
    }
}
