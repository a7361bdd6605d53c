//! Flame-chart construction from sampled stacks.
//!
//! A sampled profile is a sequence of stacks (root first) with a weight per
//! sample. The chart is built by walking the samples in order with the
//! cumulative weight as the clock: the stack prefix shared with the
//! previous sample stays open, everything below the first difference closes
//! at the current clock, and the new suffix opens at it. Consecutive
//! identical stacks therefore merge into one set of rectangles.

use anyhow::{bail, Result};

use crate::profile::models::{Flamegraph, FlamegraphFrame, Frame};

/// Build the flame chart for one thread.
///
/// `samples` hold indices into `frame_table`, root first. Out-of-range
/// indices and a samples/weights length mismatch are import errors.
pub fn build_flamechart(
    name: &str,
    frame_table: &[Frame],
    samples: &[Vec<usize>],
    weights: &[f64],
) -> Result<Flamegraph> {
    if samples.len() != weights.len() {
        bail!(
            "profile '{}': {} samples but {} weights",
            name,
            samples.len(),
            weights.len()
        );
    }

    let mut clock = 0.0;
    // Open frames: (frame table index, position in `frames`).
    let mut open: Vec<(usize, usize)> = Vec::new();
    let mut frames: Vec<FlamegraphFrame> = Vec::new();

    for (sample_idx, (stack, &weight)) in samples.iter().zip(weights).enumerate() {
        let common = open
            .iter()
            .zip(stack.iter())
            .take_while(|((open_id, _), stack_id)| open_id == *stack_id)
            .count();

        // Close the divergent tail, deepest first.
        for (_, pos) in open.drain(common..).rev() {
            frames[pos].end = Some(clock);
        }

        for (depth, &frame_id) in stack.iter().enumerate().skip(common) {
            let Some(frame) = frame_table.get(frame_id) else {
                bail!(
                    "profile '{}': sample {} references frame {} but the table has {} frames",
                    name,
                    sample_idx,
                    frame_id,
                    frame_table.len()
                );
            };
            frames.push(FlamegraphFrame {
                frame: frame.clone(),
                start: Some(clock),
                end: None,
                depth,
            });
            open.push((frame_id, frames.len() - 1));
        }

        clock += weight;
    }

    for (_, pos) in open.drain(..).rev() {
        frames[pos].end = Some(clock);
    }

    Ok(Flamegraph {
        name: name.to_string(),
        frames,
        total_weight: clock,
    })
}
