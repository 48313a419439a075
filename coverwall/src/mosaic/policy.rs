//! Composition policy selection.

use std::fmt;
use std::str::FromStr;

/// Default canonical tile width, in pixels.
pub const DEFAULT_CANONICAL_WIDTH: u32 = 184;

/// Default canonical tile height, in pixels.
pub const DEFAULT_CANONICAL_HEIGHT: u32 = 69;

/// How tiles of different sizes are normalized before composition.
///
/// One policy applies to a whole request; policies are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionPolicy {
    /// Center-crop every tile in a row to the row's smallest tile.
    #[default]
    CenterCrop,

    /// Resize every tile to a fixed size first (Lanczos3), then compose.
    Canonical { width: u32, height: u32 },
}

impl CompositionPolicy {
    /// Canonical policy with the default 184 × 69 tile size.
    pub fn canonical() -> Self {
        Self::Canonical {
            width: DEFAULT_CANONICAL_WIDTH,
            height: DEFAULT_CANONICAL_HEIGHT,
        }
    }

    /// Short name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CenterCrop => "crop",
            Self::Canonical { .. } => "canonical",
        }
    }
}

impl fmt::Display for CompositionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CenterCrop => write!(f, "crop"),
            Self::Canonical { width, height } => write!(f, "canonical ({}x{})", width, height),
        }
    }
}

impl FromStr for CompositionPolicy {
    type Err = String;

    /// Parses `crop` or `canonical`. Canonical uses the default size.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crop" | "center-crop" => Ok(Self::CenterCrop),
            "canonical" => Ok(Self::canonical()),
            other => Err(format!(
                "unknown composition policy '{}' (expected 'crop' or 'canonical')",
                other
            )),
        }
    }
}
