//! Profile data model structs shared between the import and search paths.
//!
//! These structs represent the canonical in-memory format for a loaded
//! profile. Both importers (speedscope, collapsed) produce them and the
//! search path consumes them without further conversion.

use serde::Serialize;

/// Symbol-level identity of a stack node.
///
/// # Fields
/// - `name`: display name of the function/symbol (may be empty for
///   anonymous frames)
/// - `file`: source file path, when the profiler recorded one
/// - `line`: line number within `file`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    pub name: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

/// One flame-chart rectangle: a frame occupying a span of the profile
/// timeline at a given stack depth.
///
/// # Fields
/// - `frame`: the symbol this rectangle represents
/// - `start`: temporal position where the frame opened, in profile weight
///   units. `None` for synthetic frames that carry no timeline position.
/// - `end`: position where the frame closed
/// - `depth`: stack depth, root = 0
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FlamegraphFrame {
    pub frame: Frame,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub depth: usize,
}

impl FlamegraphFrame {
    /// Duration of the rectangle, when both endpoints are known.
    pub fn weight(&self) -> Option<f64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// One thread's flame chart: the ordered frame list built from its samples.
///
/// Frames are ordered by open time, root-first within a sample. This order
/// is what the search path iterates and what frame indices refer to.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Flamegraph {
    pub name: String,
    pub frames: Vec<FlamegraphFrame>,
    pub total_weight: f64,
}

/// A multi-thread capture: one [`Flamegraph`] per recorded thread plus the
/// index of the thread the profiler considered active.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileGroup {
    pub name: String,
    pub active_profile_index: usize,
    pub profiles: Vec<Flamegraph>,
}

impl ProfileGroup {
    /// The flamegraph of the active thread.
    pub fn active_profile(&self) -> Option<&Flamegraph> {
        self.profiles.get(self.active_profile_index)
    }

    /// Frames of every thread appended in thread order. Ordering across
    /// the thread boundary is the append order, nothing is re-sorted.
    pub fn all_frames(&self) -> Vec<&FlamegraphFrame> {
        self.profiles
            .iter()
            .flat_map(|profile| profile.frames.iter())
            .collect()
    }
}
