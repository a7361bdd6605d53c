//! Profile loading and in-memory representation.
//!
//! # Module Organization
//!
//! - [`models`]: canonical structs for frames, flame charts, and groups
//! - [`flamegraph`]: flame-chart construction from sampled stacks
//! - [`speedscope`]: speedscope JSON import
//! - [`collapsed`]: folded-stack text import

pub mod collapsed;
pub mod flamegraph;
pub mod models;
pub mod speedscope;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::debug;

pub use models::{Flamegraph, FlamegraphFrame, Frame, ProfileGroup};

/// On-disk profile formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Speedscope,
    Collapsed,
}

impl ProfileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speedscope => "speedscope",
            Self::Collapsed => "collapsed",
        }
    }

    /// Infer the format from the file name: `.json` is speedscope,
    /// anything else is folded text.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Speedscope,
            _ => Self::Collapsed,
        }
    }
}

impl FromStr for ProfileFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "speedscope" => Ok(Self::Speedscope),
            "collapsed" => Ok(Self::Collapsed),
            _ => anyhow::bail!("Invalid profile format: {s}. Must be one of: speedscope, collapsed"),
        }
    }
}

/// Load a profile file, inferring the format from the file name unless
/// `format` overrides it.
pub fn load_profile(path: &Path, format: Option<ProfileFormat>) -> Result<ProfileGroup> {
    let format = format.unwrap_or_else(|| ProfileFormat::detect(path));
    debug!(path = %path.display(), format = format.as_str(), "loading profile");

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;

    let group = match format {
        ProfileFormat::Speedscope => speedscope::parse_speedscope(&data)?,
        ProfileFormat::Collapsed => {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("collapsed");
            collapsed::parse_collapsed(&data, name)?
        }
    };

    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(
            "speedscope".parse::<ProfileFormat>().unwrap(),
            ProfileFormat::Speedscope
        );
        assert_eq!(
            "collapsed".parse::<ProfileFormat>().unwrap(),
            ProfileFormat::Collapsed
        );
        assert!("perfetto".parse::<ProfileFormat>().is_err());
    }

    #[test]
    fn test_format_detect() {
        assert_eq!(
            ProfileFormat::detect(Path::new("trace.json")),
            ProfileFormat::Speedscope
        );
        assert_eq!(
            ProfileFormat::detect(Path::new("stacks.folded")),
            ProfileFormat::Collapsed
        );
        assert_eq!(
            ProfileFormat::detect(Path::new("stacks")),
            ProfileFormat::Collapsed
        );
    }
}
