//! Splitter/merger: re-segments a token sequence across
//! token boundaries — splitting a single mistyped compound ("thankyou")
//! into known words, or merging adjacent tokens that were mistakenly
//! split ("data base" -> "database") — using the same diversity-ranked
//! memoized DP shape as the sequence corrector

use crate::spelling_table::SpellingTable;
use std::collections::HashMap;

pub const MAX_SPLIT_COUNT: usize = 1;
pub const MAX_MERGE_COUNT: usize = 1;

fn log_freq(freq: u32) -> f64 {
    (1.0 + freq as f64).log2()
}

struct Node {
    position: usize,
    end: usize,
    word: String,
    score: f64,
    prev: usize,
}

/// Finds the index of the original token containing char position `p`.
fn token_of(token_start: &[usize], p: usize) -> usize {
    token_start.partition_point(|&s| s <= p).saturating_sub(1)
}

/// Enumerates, for every legal segment start, the reachable segment ends
/// whose substring is a real word (freq > 0) — directly, or via the
/// caller-supplied `extra_candidates` for positions that are not original
/// token boundaries. Mirrors the original's `find_existing_words` pre-pass:
/// a bit-array of legal begins, extended up to `MAX_SPLIT_COUNT` times.
fn find_existing_words(
    table: &mut dyn SpellingTable,
    prefix: &str,
    all_chars: &[char],
    token_start: &[usize],
    token_count: usize,
) -> (Vec<bool>, HashMap<usize, Vec<(usize, String, u32)>>) {
    let total = all_chars.len();
    let mut begins = vec![false; total + 1];
    for &s in token_start {
        if s <= total {
            begins[s] = true;
        }
    }
    let mut splits_used = vec![0usize; total + 1];
    let mut segments: HashMap<usize, Vec<(usize, String, u32)>> = HashMap::new();

    let mut changed = true;
    while changed {
        changed = false;
        for start in 0..total {
            if !begins[start] {
                continue;
            }
            let tok_idx = token_of(token_start, start);
            let max_tok = (tok_idx + MAX_MERGE_COUNT).min(token_count.saturating_sub(1));
            let limit_end = token_start.get(max_tok + 1).copied().unwrap_or(total).min(total);
            for end in (start + 1)..=limit_end {
                let already = segments.get(&start).map(|v| v.iter().any(|(e, _, _)| *e == end)).unwrap_or(false);
                if already {
                    continue;
                }
                let word: String = all_chars[start..end].iter().collect();
                let freq = table.get_word_frequency(&word, prefix);
                if freq > 0 {
                    segments.entry(start).or_default().push((end, word, freq));
                    if !begins[end] && splits_used[start] < MAX_SPLIT_COUNT {
                        begins[end] = true;
                        splits_used[end] = splits_used[start] + 1;
                        changed = true;
                    }
                }
            }
        }
    }
    (begins, segments)
}

fn diversity_rank(paths: &[Vec<(usize, usize)>], scores: &[f64], result_count: usize) -> Vec<usize> {
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
                .map(|&p| paths[cand].iter().zip(paths[p].iter()).filter(|(a, b)| a != b).count() as i64)
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

/// Re-segments `tokens`, returning `Some(new_tokens)` only if a
/// higher-scoring segmentation than the original token boundaries exists.
pub fn correct_split(table: &mut dyn SpellingTable, tokens: &[String], prefix: &str, result_count: usize) -> Option<Vec<String>> {
    if tokens.is_empty() {
        return None;
    }
    let mut all_chars: Vec<char> = Vec::new();
    let mut token_start: Vec<usize> = Vec::new();
    for t in tokens {
        token_start.push(all_chars.len());
        all_chars.extend(t.chars());
    }
    let total = all_chars.len();
    token_start.push(total);

    let (begins, segments) = find_existing_words(table, prefix, &all_chars, &token_start, tokens.len());

    let mut begin_positions: Vec<usize> = (0..=total).filter(|&p| begins[p]).collect();
    begin_positions.sort_unstable();

    let mut arena: Vec<Node> = Vec::new();
    // position 0 has an implicit empty start node, represented out-of-arena.
    let mut frontier_at: HashMap<usize, Vec<usize>> = HashMap::new();
    frontier_at.insert(0, Vec::new());

    for &start in &begin_positions {
        if start == total {
            continue;
        }
        let prev_indices = match frontier_at.get(&start) {
            Some(v) => v.clone(),
            None => continue,
        };
        let empty_list = Vec::new();
        let choices = segments.get(&start).unwrap_or(&empty_list);
        if choices.is_empty() {
            continue;
        }

        let mut candidate_paths: Vec<Vec<(usize, usize)>> = Vec::new();
        let mut candidate_scores: Vec<f64> = Vec::new();
        let mut candidate_meta: Vec<(usize, usize, &str, u32)> = Vec::new(); // (end, prev_arena_idx_or_MAX, word, freq)

        let prev_choices: Vec<Option<usize>> = if prev_indices.is_empty() { vec![None] } else { prev_indices.iter().map(|&i| Some(i)).collect() };

        for &prev_opt in &prev_choices {
            let prev_score = prev_opt.map(|i| arena[i].score).unwrap_or(0.0);
            let prev_word: Option<&str> = prev_opt.map(|i| arena[i].word.as_str());
            for (end, word, freq) in choices {
                let mut score = prev_score;
                if let Some(pw) = prev_word {
                    let bigram = table.get_words_frequency(pw, word, prefix);
                    score += log_freq(bigram);
                } else {
                    score += log_freq(*freq);
                }
                let mut path = prev_opt.map(|i| reconstruct(&arena, i)).unwrap_or_default();
                path.push((start, *end));
                candidate_paths.push(path);
                candidate_scores.push(score);
                candidate_meta.push((*end, prev_opt.unwrap_or(usize::MAX), word.as_str(), *freq));
            }
        }

        let chosen = diversity_rank(&candidate_paths, &candidate_scores, result_count.max(1));
        for &choice in &chosen {
            let (end, prev_idx, word, _freq) = candidate_meta[choice];
            let idx = arena.len();
            arena.push(Node { position: start, end, word: word.to_string(), score: candidate_scores[choice], prev: prev_idx });
            frontier_at.entry(end).or_default().push(idx);
        }
    }

    let final_indices = frontier_at.get(&total)?;
    let best_idx = *final_indices.iter().max_by(|&&a, &&b| arena[a].score.partial_cmp(&arena[b].score).unwrap())?;

    let mut path = reconstruct_nodes(&arena, best_idx);
    path.sort_by_key(|n| n.0);

    let original_boundaries: Vec<usize> = token_start[..tokens.len()].to_vec();
    let result_boundaries: Vec<usize> = path.iter().map(|(s, _)| *s).collect();
    if result_boundaries == original_boundaries {
        return None;
    }

    Some(path.into_iter().map(|(_, word)| word).collect())
}

fn reconstruct(arena: &[Node], mut idx: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    loop {
        out.push((arena[idx].position, arena[idx].end));
        if arena[idx].prev == usize::MAX {
            break;
        }
        idx = arena[idx].prev;
    }
    out.reverse();
    out
}

fn reconstruct_nodes(arena: &[Node], mut idx: usize) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    loop {
        out.push((arena[idx].position, arena[idx].word.clone()));
        if arena[idx].prev == usize::MAX {
            break;
        }
        idx = arena[idx].prev;
    }
    out
}
