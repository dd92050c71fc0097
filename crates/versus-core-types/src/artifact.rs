//! Names for temporary server-side artifacts
//!
//! Every view or table a comparison creates on the connection carries a
//! generated name. Two comparisons sharing a connection never collide
//! because each name embeds a fresh UUID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by every generated artifact name
pub const ARTIFACT_PREFIX: &str = "__versus";

/// Kind of temporary object backing an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// A temp view over a caller-supplied source
    View,
    /// A temp table holding materialized rows
    Table,
}

/// Unique name of a temporary artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Generate a fresh name of the form `__versus_<role>_<uuid>`
    ///
    /// `role` is sanitized to ASCII alphanumerics and underscores so the
    /// result is a plain identifier even before quoting.
    pub fn generate(role: &str) -> Self {
        let role: String = role
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Self(format!(
            "{}_{}_{}",
            ARTIFACT_PREFIX,
            role,
            Uuid::new_v4().simple()
        ))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
