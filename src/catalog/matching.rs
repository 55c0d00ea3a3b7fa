//! Text matching for picking the best search candidate.
//!
//! Catalog searches return several songs for a query. Instead of trusting the
//! first one, each candidate's "artist title" is compared with the query text
//! by token overlap after normalisation.

use std::collections::HashSet;

/// Lowercase, replace punctuation with spaces and collapse whitespace.
///
/// Letters from any script are kept, so Cyrillic titles compare fine.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<String>()
            } else {
                " ".to_string()
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokens(text: &str) -> HashSet<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Similarity between a query and a candidate, from 0.0 to 1.0.
///
/// Exact normalised equality scores 1.0; otherwise the Jaccard index of
/// the two token sets.
pub fn similarity(query: &str, candidate: &str) -> f32 {
    let q = tokens(query);
    let c = tokens(candidate);
    if q.is_empty() || c.is_empty() {
        return 0.0;
    }
    if q == c {
        return 1.0;
    }
    let shared = q.intersection(&c).count();
    let union = q.union(&c).count();
    shared as f32 / union as f32
}

/// Index of the best candidate, or None if nothing reaches `min_score`.
///
/// Ties go to the earlier candidate, i.e. the catalog's own relevance order.
pub fn best_candidate<'a, I>(query: &str, candidates: I, min_score: f32) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        let score = similarity(query, candidate);
        if score < min_score {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
