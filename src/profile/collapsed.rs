//! Collapsed (folded) stack import.
//!
//! Parses the `root;child;leaf COUNT` format emitted by `perf script`
//! post-processing and flamegraph tooling: one stack per line with a
//! trailing sample count, `#` comment lines and blank lines ignored.
//! Frame names are interned into a table so repeated stacks share
//! [`Frame`] entries, then the samples go through the flame-chart builder.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use crate::profile::flamegraph::build_flamechart;
use crate::profile::models::{Frame, ProfileGroup};

/// Parse folded stack lines into a single-thread [`ProfileGroup`].
///
/// `name` becomes both the group and thread name; the format has no
/// thread separation of its own.
pub fn parse_collapsed(data: &str, name: &str) -> Result<ProfileGroup> {
    let mut frame_table: Vec<Frame> = Vec::new();
    let mut interned: HashMap<String, usize> = HashMap::new();
    let mut samples: Vec<Vec<usize>> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for (line_no, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((stack, count)) = line.rsplit_once(' ') else {
            bail!("line {}: expected 'stack count', got '{}'", line_no + 1, line);
        };
        let count: u64 = count
            .parse()
            .with_context(|| format!("line {}: invalid sample count '{}'", line_no + 1, count))?;

        let mut sample = Vec::new();
        for frame_name in stack.split(';') {
            let id = match interned.get(frame_name) {
                Some(&id) => id,
                None => {
                    frame_table.push(Frame {
                        name: frame_name.to_string(),
                        ..Frame::default()
                    });
                    let id = frame_table.len() - 1;
                    interned.insert(frame_name.to_string(), id);
                    id
                }
            };
            sample.push(id);
        }
        samples.push(sample);
        weights.push(count as f64);
    }

    let flamegraph = build_flamechart(name, &frame_table, &samples, &weights)?;
    Ok(ProfileGroup {
        name: name.to_string(),
        active_profile_index: 0,
        profiles: vec![flamegraph],
    })
}
