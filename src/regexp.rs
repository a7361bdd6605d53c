//! Recognition of delimited regex literal queries.
//!
//! A search query written as `/pattern/flags` is interpreted as a regular
//! expression instead of free text. Recognition is strict: the string must
//! start and end with the delimiter and any trailing flags must come from
//! the JavaScript flag set, so a bare `/` inside ordinary free text never
//! triggers the regex path.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Pattern: /pattern/flags with flags restricted to the JavaScript set.
/// The greedy group makes the last `/` the closing delimiter, so patterns
/// may themselves contain `/`.
static REGEXP_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(.*)/([gimsuy]*)$").expect("Invalid regexp literal pattern")
});

/// Whether `input` is syntactically a delimited regex literal.
pub fn is_regexp_string(input: &str) -> bool {
    REGEXP_LITERAL_RE.is_match(input)
}

/// Split a delimited literal into `(pattern, flags)`. Returns `None` when
/// `input` is not a delimited literal.
pub fn parse_regexp(input: &str) -> Option<(&str, &str)> {
    let captures = REGEXP_LITERAL_RE.captures(input)?;
    Some((
        captures.get(1).map_or("", |m| m.as_str()),
        captures.get(2).map_or("", |m| m.as_str()),
    ))
}

/// Compile a pattern with JavaScript-style flags.
///
/// `i`, `m`, and `s` map onto the matching builder options. `g`, `u`, and
/// `y` affect cursor reuse and encoding in JavaScript engines; a boolean
/// match test holds no cursor state, so they are accepted and ignored.
pub fn compile_regexp(pattern: &str, flags: &str) -> Result<Regex, regex::Error> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            _ => {}
        }
    }
    builder.build()
}
