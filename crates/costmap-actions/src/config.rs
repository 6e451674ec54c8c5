use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ActionResult};

/// Which entries the merge sweep refuses to fold into a larger region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeGuard {
    /// Only the initiating entry's kind is checked. A `TrueOverwrite` entry
    /// never starts a merge, but it can be absorbed by an earlier mergeable
    /// entry, in which case its kind is lost.
    #[default]
    InitiatorOnly,
    /// `TrueOverwrite` entries neither start a merge nor get absorbed.
    ProtectTrueOverwrite,
}

/// Settings for [`MergeOptimizer`](crate::MergeOptimizer).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Largest gap, in cells, across which two regions still merge.
    pub tolerance: u32,
    /// Which kinds are kept out of merges.
    pub guard: MergeGuard,
}

/// On-disk shape. The tolerance is read signed so that a negative value is
/// reported as such instead of as a generic type mismatch.
#[derive(Deserialize)]
struct RawOptimizeConfig {
    #[serde(default)]
    tolerance: i64,
    #[serde(default)]
    guard: MergeGuard,
}

impl OptimizeConfig {
    /// Initiator-only guard with the given tolerance.
    pub fn new(tolerance: u32) -> Self {
        Self {
            tolerance,
            guard: MergeGuard::InitiatorOnly,
        }
    }

    /// Guard that never lets a `TrueOverwrite` entry be absorbed.
    pub fn protective(tolerance: u32) -> Self {
        Self {
            tolerance,
            guard: MergeGuard::ProtectTrueOverwrite,
        }
    }

    /// Validate a signed tolerance coming from an untyped source.
    pub fn checked_tolerance(value: i64) -> ActionResult<u32> {
        if value < 0 {
            return Err(ActionError::NegativeTolerance(value));
        }
        u32::try_from(value).map_err(|_| ActionError::ToleranceOutOfRange(value))
    }

    /// Parse a TOML document such as:
    ///
    /// ```toml
    /// tolerance = 2
    /// guard = "protect_true_overwrite"
    /// ```
    ///
    /// Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ActionResult<Self> {
        let raw: RawOptimizeConfig =
            toml::from_str(text).map_err(|e| ActionError::Config(e.to_string()))?;
        Ok(Self {
            tolerance: Self::checked_tolerance(raw.tolerance)?,
            guard: raw.guard,
        })
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ActionResult<String> {
        toml::to_string(self).map_err(|e| ActionError::Serialization(e.to_string()))
    }
}
