//! Fuzzy search index over frame display names.
//!
//! Built once per frame collection and queried per keystroke. Scoring
//! delegates to the skim matcher; acceptance additionally requires the
//! matched characters to sit in a compact span of the name, so contiguous
//! occurrences always pass while widely scattered character matches are
//! cut off by the threshold.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::profile::models::FlamegraphFrame;

/// Tolerance for threshold comparisons on computed span ratios.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Index construction options.
///
/// `threshold` is a looseness bound on a 0.0 (exact span) to 1.0 (any
/// match) scale: a hit is kept when `1 - matched_chars/span_chars` does
/// not exceed it. `include_matches` controls whether hits carry the
/// matched character positions for highlighting.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyIndexOptions {
    pub threshold: f64,
    pub include_matches: bool,
}

impl Default for FuzzyIndexOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            include_matches: true,
        }
    }
}

/// One ranked hit. `index` refers to the frame collection the index was
/// built over; `indices` are matched character positions in the frame
/// name, empty unless the index was built with `include_matches`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyHit {
    pub index: usize,
    pub score: i64,
    pub indices: Vec<usize>,
}

/// Fuzzy search structure over one frame collection.
///
/// The index snapshots frame names at build time; it is rebuilt, never
/// mutated, when the underlying collection changes.
pub struct FuzzyIndex {
    names: Vec<String>,
    options: FuzzyIndexOptions,
    matcher: SkimMatcherV2,
}

impl FuzzyIndex {
    /// Build an index keyed by frame display name.
    pub fn build(frames: &[&FlamegraphFrame], options: FuzzyIndexOptions) -> Self {
        Self {
            names: frames.iter().map(|f| f.frame.name.clone()).collect(),
            options,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Search the index, returning hits ordered by descending score.
    /// Ties keep frame-collection order.
    pub fn search(&self, query: &str) -> Vec<FuzzyHit> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for (index, name) in self.names.iter().enumerate() {
            let Some((score, indices)) = self.matcher.fuzzy_indices(name, query) else {
                continue;
            };
            let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
                continue;
            };

            let span = (last - first + 1) as f64;
            let distance = 1.0 - indices.len() as f64 / span;
            if distance > self.options.threshold + THRESHOLD_EPSILON {
                continue;
            }

            hits.push(FuzzyHit {
                index,
                score,
                indices: if self.options.include_matches {
                    indices
                } else {
                    Vec::new()
                },
            });
        }

        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
