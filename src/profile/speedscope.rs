//! Speedscope JSON import.
//!
//! Parses the speedscope file schema (shared frame table plus one profile
//! per thread) and converts each sampled profile into a flame chart. Only
//! `"sampled"` profiles are supported; evented profiles need open/close
//! event pairing that samplers do not produce.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::profile::flamegraph::build_flamechart;
use crate::profile::models::{Frame, ProfileGroup};

#[derive(Debug, Deserialize)]
struct SpeedscopeFile {
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "activeProfileIndex", default)]
    active_profile_index: Option<usize>,
    shared: SpeedscopeShared,
    profiles: Vec<SpeedscopeProfile>,
}

#[derive(Debug, Deserialize)]
struct SpeedscopeShared {
    frames: Vec<SpeedscopeFrame>,
}

#[derive(Debug, Deserialize)]
struct SpeedscopeFrame {
    name: String,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    line: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SpeedscopeProfile {
    #[serde(rename = "type")]
    profile_type: String,
    name: String,
    #[serde(default)]
    samples: Vec<Vec<usize>>,
    #[serde(default)]
    weights: Vec<f64>,
}

/// Parse a speedscope JSON document into a [`ProfileGroup`].
pub fn parse_speedscope(data: &str) -> Result<ProfileGroup> {
    let file: SpeedscopeFile =
        serde_json::from_str(data).context("failed to parse speedscope JSON")?;

    let frame_table: Vec<Frame> = file
        .shared
        .frames
        .into_iter()
        .map(|f| Frame {
            name: f.name,
            file: f.file,
            line: f.line,
        })
        .collect();

    let mut profiles = Vec::with_capacity(file.profiles.len());
    for profile in &file.profiles {
        if profile.profile_type != "sampled" {
            bail!(
                "profile '{}' has type '{}', only sampled profiles are supported",
                profile.name,
                profile.profile_type
            );
        }
        profiles.push(build_flamechart(
            &profile.name,
            &frame_table,
            &profile.samples,
            &profile.weights,
        )?);
    }

    let active_profile_index = match file.active_profile_index {
        Some(index) if index < profiles.len() => index,
        Some(index) => {
            warn!(
                index,
                profiles = profiles.len(),
                "activeProfileIndex out of range, defaulting to 0"
            );
            0
        }
        None => 0,
    };

    Ok(ProfileGroup {
        name: file.name.unwrap_or_default(),
        active_profile_index,
        profiles,
    })
}
