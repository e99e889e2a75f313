// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Username similarity search.
//!
//! A cheap character-overlap heuristic rather than an edit distance: a
//! username scores well when many of the query's characters appear in it and
//! it is not much longer than that overlap.

use serde::Serialize;

/// Minimum number of matching query characters that always qualifies.
const MIN_FREQUENCY_EXCLUSIVE: usize = 2;
/// Minimum share of the username covered by matches that qualifies.
const MIN_ACCURACY: f64 = 0.5;

/// A username that resembles the query, with its match score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarUser {
    pub username: String,
    pub score: f64,
}

/// Match statistics for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    /// Query characters present somewhere in the username
    pub frequency: usize,
    /// `frequency` relative to the username's length
    pub accuracy: f64,
}

impl MatchScore {
    /// Score a single username against the query.
    ///
    /// Every character of the query is counted once per occurrence in the
    /// query if it appears anywhere in the username. Matching is
    /// case-sensitive. Returns `None` for an empty username.
    pub fn compute(username: &str, query: &str) -> Option<Self> {
        let length = username.chars().count();
        if length == 0 {
            return None;
        }
        let frequency = query.chars().filter(|c| username.contains(*c)).count();
        Some(Self {
            frequency,
            accuracy: frequency as f64 / length as f64,
        })
    }

    /// Ranking score.
    pub fn score(&self) -> f64 {
        self.frequency as f64 * self.accuracy
    }

    /// Whether the candidate is similar enough to be listed.
    pub fn qualifies(&self) -> bool {
        self.frequency > MIN_FREQUENCY_EXCLUSIVE || self.accuracy >= MIN_ACCURACY
    }
}

/// Rank `usernames` by similarity to `query`, best first.
///
/// Candidates that do not qualify are dropped. Equal scores keep the order in
/// which the usernames were given.
pub fn find_similar<S: AsRef<str>>(usernames: &[S], query: &str) -> Vec<SimilarUser> {
    let mut similar: Vec<SimilarUser> = usernames
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|username| {
            MatchScore::compute(username, query)
                .filter(MatchScore::qualifies)
                .map(|m| SimilarUser {
                    username: username.to_string(),
                    score: m.score(),
                })
        })
        .collect();

    // Stable: ties stay in input order
    similar.sort_by(|a, b| b.score.total_cmp(&a.score));
    similar
}
