//! Frame search: decide which frames of a flame chart match a query.
//!
//! A query is either a delimited regex literal (`/pattern/flags`) tested
//! against every frame name in input order, or free text run through the
//! fuzzy index and re-sorted by temporal position. Results are keyed by a
//! composite identity built from name, file, and start position, in an
//! insertion-ordered map so callers can rely on the match order downstream.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::fuzzy::FuzzyIndex;
use crate::profile::models::FlamegraphFrame;
use crate::regexp::{compile_regexp, parse_regexp};

/// Match results keyed by composite frame identity, in match order.
pub type FrameResults<'a> = IndexMap<String, &'a FlamegraphFrame>;

/// A classified search query. Classification happens once, up front; the
/// matching paths never re-inspect the raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    LiteralRegex { pattern: &'a str, flags: &'a str },
    FreeText { text: &'a str },
}

impl<'a> Query<'a> {
    /// Classify a raw query string.
    pub fn classify(input: &'a str) -> Self {
        match parse_regexp(input) {
            // No flags means the JavaScript default of g.
            Some((pattern, flags)) => Query::LiteralRegex {
                pattern,
                flags: if flags.is_empty() { "g" } else { flags },
            },
            None => Query::FreeText { text: input },
        }
    }
}

/// Sort direction for [`numeric_sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Total order over optional positions: absent values sort after any
/// numeric value in either direction, equal values compare equal.
pub fn numeric_sort(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.total_cmp(&b),
            SortDirection::Desc => b.total_cmp(&a),
        },
    }
}

/// Composite identity key: name, file (empty when absent), and formatted
/// start position. Unique per `(name, file, start)` triple and stable
/// within one search; callers must not assume more about its format.
pub fn frame_key(frame: &FlamegraphFrame) -> String {
    format!(
        "{}{}{}",
        frame.frame.name,
        frame.frame.file.as_deref().unwrap_or(""),
        format_start(frame.start)
    )
}

fn format_start(start: Option<f64>) -> String {
    match start {
        Some(value) if value.is_finite() && value.fract() == 0.0 => format!("{}", value as i64),
        Some(value) => format!("{value}"),
        None => "?".to_string(),
    }
}

/// Search `frames` for `query`.
///
/// `index` must have been built over the same `frames` slice; hits whose
/// indices fall outside it are dropped. A malformed regex literal is
/// reported to `diagnostics` and yields an empty result instead of an
/// error. Matching holds no state across calls: repeating a query returns
/// identical results.
pub fn frame_search<'a>(
    query: &str,
    frames: &[&'a FlamegraphFrame],
    index: &FuzzyIndex,
    diagnostics: &dyn Diagnostics,
) -> FrameResults<'a> {
    let mut results = FrameResults::default();
    if query.is_empty() {
        return results;
    }

    match Query::classify(query) {
        Query::LiteralRegex { pattern, flags } => {
            if pattern.is_empty() {
                diagnostics.report("Invalid RegExp: empty pattern");
                return results;
            }
            let regex = match compile_regexp(pattern, flags) {
                Ok(regex) => regex,
                Err(err) => {
                    diagnostics.report(&format!("Invalid RegExp: {err}"));
                    return results;
                }
            };

            for frame in frames {
                if regex.is_match(frame.frame.name.trim()) {
                    // Frames sharing one (name, file, start) identity
                    // collapse to a single entry, last processed winning.
                    // Callers needing per-occurrence results must key on
                    // position themselves.
                    results.insert(frame_key(frame), *frame);
                }
            }
            debug!(query, matches = results.len(), "regex search");
        }
        Query::FreeText { text } => {
            let mut hits = index.search(text);
            hits.sort_by(|a, b| {
                numeric_sort(
                    frames.get(a.index).and_then(|f| f.start),
                    frames.get(b.index).and_then(|f| f.start),
                    SortDirection::Asc,
                )
            });

            for hit in hits {
                if let Some(frame) = frames.get(hit.index) {
                    results.insert(frame_key(frame), *frame);
                }
            }
            debug!(query, matches = results.len(), "fuzzy search");
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use crate::fuzzy::FuzzyIndexOptions;
    use crate::profile::models::Frame;

    fn frame(name: &str, file: Option<&str>, start: Option<f64>) -> FlamegraphFrame {
        FlamegraphFrame {
            frame: Frame {
                name: name.to_string(),
                file: file.map(str::to_string),
                line: None,
            },
            start,
            end: None,
            depth: 0,
        }
    }

    fn search<'a>(
        query: &str,
        frames: &[&'a FlamegraphFrame],
        diagnostics: &dyn Diagnostics,
    ) -> FrameResults<'a> {
        let index = FuzzyIndex::build(frames, FuzzyIndexOptions::default());
        frame_search(query, frames, &index, diagnostics)
    }

    #[test]
    fn test_query_classification() {
        assert_eq!(
            Query::classify("/^foo$/i"),
            Query::LiteralRegex {
                pattern: "^foo$",
                flags: "i"
            }
        );
        assert_eq!(
            Query::classify("/foo/"),
            Query::LiteralRegex {
                pattern: "foo",
                flags: "g"
            }
        );
        assert_eq!(
            Query::classify("src/main"),
            Query::FreeText { text: "src/main" }
        );
    }

    #[test]
    fn test_numeric_sort_order() {
        use SortDirection::{Asc, Desc};
        assert_eq!(numeric_sort(Some(1.0), Some(2.0), Asc), Ordering::Less);
        assert_eq!(numeric_sort(Some(1.0), Some(2.0), Desc), Ordering::Greater);
        assert_eq!(numeric_sort(Some(1.0), Some(1.0), Asc), Ordering::Equal);
        // Absent sorts after numeric, symmetrically.
        assert_eq!(numeric_sort(None, Some(5.0), Asc), Ordering::Greater);
        assert_eq!(numeric_sort(Some(5.0), None, Asc), Ordering::Less);
        assert_eq!(numeric_sort(None, None, Asc), Ordering::Equal);
    }

    #[test]
    fn test_frame_key_formatting() {
        assert_eq!(
            frame_key(&frame("f", Some("a.rs"), Some(5.0))),
            "fa.rs5"
        );
        assert_eq!(frame_key(&frame("f", None, Some(5.5))), "f5.5");
        assert_eq!(frame_key(&frame("f", None, None)), "f?");
    }

    #[test]
    fn test_empty_query_empty_result() {
        let a = frame("foo", None, Some(1.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("", &[&a], &diagnostics);
        assert!(results.is_empty());
        assert!(diagnostics.messages().is_empty());
    }

    #[test]
    fn test_regex_no_matches_empty_result() {
        let a = frame("foo", None, Some(1.0));
        let b = frame("bar", None, Some(2.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("/nothing_matches_this/", &[&a, &b], &diagnostics);
        assert!(results.is_empty());
        assert!(diagnostics.messages().is_empty());
    }

    #[test]
    fn test_regex_anchored_after_trim() {
        let a = frame("foo", None, Some(1.0));
        let b = frame("foobar", None, Some(2.0));
        let c = frame("  foo  ", None, Some(3.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("/^foo$/", &[&a, &b, &c], &diagnostics);

        let names: Vec<&str> = results.values().map(|f| f.frame.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "  foo  "]);
    }

    #[test]
    fn test_regex_case_insensitive_flag() {
        let a = frame("Tokio::Spawn", None, Some(1.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("/^tokio/i", &[&a], &diagnostics);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_malformed_regex_reported_once() {
        for query in ["/[/", "/(/"] {
            let a = frame("foo", None, Some(1.0));
            let diagnostics = CollectingDiagnostics::new();
            let results = search(query, &[&a], &diagnostics);
            assert!(results.is_empty(), "query {query} should match nothing");
            assert_eq!(
                diagnostics.messages().len(),
                1,
                "query {query} should report once"
            );
        }
    }

    #[test]
    fn test_empty_pattern_reported() {
        let a = frame("foo", None, Some(1.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("//", &[&a], &diagnostics);
        assert!(results.is_empty());
        assert_eq!(diagnostics.messages().len(), 1);
    }

    #[test]
    fn test_fuzzy_hits_sorted_by_start() {
        let a = frame("foobar", None, Some(10.0));
        let b = frame("zfoo", None, Some(2.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("foo", &[&a, &b], &diagnostics);

        let starts: Vec<Option<f64>> = results.values().map(|f| f.start).collect();
        assert_eq!(starts, vec![Some(2.0), Some(10.0)]);
    }

    #[test]
    fn test_fuzzy_missing_start_sorts_last() {
        let a = frame("afoo", None, None);
        let b = frame("bfoo", None, Some(7.0));
        let c = frame("cfoo", None, Some(3.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("foo", &[&a, &b, &c], &diagnostics);

        let starts: Vec<Option<f64>> = results.values().map(|f| f.start).collect();
        assert_eq!(starts, vec![Some(3.0), Some(7.0), None]);
    }

    #[test]
    fn test_identity_collision_last_wins() {
        let first = frame("f", Some("a.js"), Some(5.0));
        let mut second = frame("f", Some("a.js"), Some(5.0));
        second.depth = 3;
        let diagnostics = CollectingDiagnostics::new();
        let results = search("/f/", &[&first, &second], &diagnostics);

        assert_eq!(results.len(), 1);
        assert_eq!(results.values().next().unwrap().depth, 3);
    }

    #[test]
    fn test_distinct_files_do_not_collide() {
        let a = frame("f", Some("a.js"), Some(5.0));
        let b = frame("f", Some("b.js"), Some(5.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("/f/", &[&a, &b], &diagnostics);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_repeat_invocation_is_stateless() {
        let a = frame("foo", None, Some(1.0));
        let b = frame("foobar", None, Some(2.0));
        let frames = [&a, &b];
        let index = FuzzyIndex::build(&frames, FuzzyIndexOptions::default());
        let diagnostics = CollectingDiagnostics::new();

        // The g flag must not introduce cursor state across calls.
        let first = frame_search("/foo/g", &frames, &index, &diagnostics);
        let second = frame_search("/foo/g", &frames, &index, &diagnostics);
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            second.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_slash_in_free_text_stays_fuzzy() {
        let a = frame("src/main", None, Some(1.0));
        let diagnostics = CollectingDiagnostics::new();
        let results = search("src/main", &[&a], &diagnostics);
        assert_eq!(results.len(), 1);
        assert!(diagnostics.messages().is_empty());
    }
}
