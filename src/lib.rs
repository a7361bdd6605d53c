//! Stacksift library - search stack frames in captured profiling data.
//!
//! # Modules
//!
//! - [`profile`] - Profile import (speedscope, collapsed) and flame-chart
//!   construction
//! - [`fuzzy`] - Fuzzy search index over frame names
//! - [`regexp`] - Recognition of delimited regex literal queries
//! - [`search`] - The frame matcher
//! - [`diagnostics`] - Best-effort diagnostics sinks
//!
//! # Example
//!
//! ```
//! use stacksift::diagnostics::LogDiagnostics;
//! use stacksift::fuzzy::{FuzzyIndex, FuzzyIndexOptions};
//! use stacksift::profile::collapsed::parse_collapsed;
//! use stacksift::search::frame_search;
//!
//! let group = parse_collapsed("main;decode 3\nmain;render 1\n", "demo").unwrap();
//! let frames = group.all_frames();
//! let index = FuzzyIndex::build(&frames, FuzzyIndexOptions::default());
//!
//! let results = frame_search("decode", &frames, &index, &LogDiagnostics);
//! assert_eq!(results.len(), 1);
//! ```

pub mod diagnostics;
pub mod fuzzy;
pub mod profile;
pub mod regexp;
pub mod search;

// Re-export for convenience
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use fuzzy::{FuzzyIndex, FuzzyIndexOptions};
pub use profile::{load_profile, Flamegraph, FlamegraphFrame, Frame, ProfileFormat, ProfileGroup};
pub use search::{frame_search, numeric_sort, FrameResults, Query, SortDirection};
