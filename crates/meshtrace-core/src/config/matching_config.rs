//! Interaction matching configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the interaction matcher picks among several satisfying catalog entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// The first satisfying entry in catalog order wins.
    #[default]
    First,
    /// The satisfying entry with the longest literal prefix wins; ties keep catalog order.
    LongestPrefix,
}

impl MatchPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::LongestPrefix => "longest-prefix",
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first" => Ok(Self::First),
            "longest-prefix" => Ok(Self::LongestPrefix),
            other => Err(format!("unknown match policy: {other}")),
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the interaction matcher.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MatchingConfig {
    /// Tie-break policy. Default: "first".
    pub policy: Option<MatchPolicy>,
}

impl MatchingConfig {
    pub fn effective_policy(&self) -> MatchPolicy {
        self.policy.unwrap_or_default()
    }
}
