use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The intent recorded with a pending grid write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// No action. Returned by ledger accessors for invalid indices.
    #[default]
    None,
    /// Plain overwrite of the destination cells.
    Overwrite,
    /// Overwrite whose effect must apply exactly to its declared region.
    /// Never initiates a merge.
    TrueOverwrite,
    /// Blend the source into the destination.
    Modify,
    /// Keep the larger of source and destination cost per cell.
    MaxCombine,
}

impl ActionKind {
    /// Every kind a real ledger entry can carry.
    pub const RECORDABLE: [ActionKind; 4] = [
        ActionKind::Overwrite,
        ActionKind::TrueOverwrite,
        ActionKind::Modify,
        ActionKind::MaxCombine,
    ];

    /// Returns `true` if an entry of this kind may absorb its neighbours
    /// during optimization.
    pub fn initiates_merge(&self) -> bool {
        !matches!(self, Self::TrueOverwrite)
    }

    /// The `snake_case` name used in plans and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Overwrite => "overwrite",
            Self::TrueOverwrite => "true_overwrite",
            Self::Modify => "modify",
            Self::MaxCombine => "max_combine",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "overwrite" => Ok(Self::Overwrite),
            "true_overwrite" => Ok(Self::TrueOverwrite),
            "modify" => Ok(Self::Modify),
            "max_combine" => Ok(Self::MaxCombine),
            other => Err(TypeError::UnknownActionKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_none() {
        assert_eq!(ActionKind::default(), ActionKind::None);
    }

    #[test]
    fn only_true_overwrite_refuses_to_initiate() {
        for kind in ActionKind::RECORDABLE {
            assert_eq!(kind.initiates_merge(), kind != ActionKind::TrueOverwrite);
        }
    }

    #[test]
    fn name_roundtrip() {
        for kind in ActionKind::RECORDABLE {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "blend".parse::<ActionKind>(),
            Err(TypeError::UnknownActionKind(_))
        ));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ActionKind::MaxCombine).unwrap();
        assert_eq!(json, "\"max_combine\"");
        let parsed: ActionKind = serde_json::from_str("\"true_overwrite\"").unwrap();
        assert_eq!(parsed, ActionKind::TrueOverwrite);
    }
}
