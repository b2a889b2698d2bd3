//! HTTP verbs recognised on both sides of an interaction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HTTP verb of a declared endpoint or an outbound call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Returns the canonical uppercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    pub fn all() -> &'static [HttpVerb] {
        &[Self::Get, Self::Post, Self::Put, Self::Delete, Self::Patch]
    }
}

impl FromStr for HttpVerb {
    type Err = String;

    /// Case-insensitive; anything outside the five supported verbs is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            other => Err(format!("unsupported HTTP verb: {other}")),
        }
    }
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
