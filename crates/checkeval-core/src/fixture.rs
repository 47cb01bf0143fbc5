//! Fixture sets and their ground-truth labels.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Known label of every entry in a fixture set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroundTruth {
    /// Entries contain no defect; flagging any of them is a false positive.
    Safe,

    /// Entries all contain a defect; clearing any of them is a false negative.
    Unsafe,
}

impl GroundTruth {
    /// Get the label as a string.
    pub fn name(&self) -> &'static str {
        match self {
            GroundTruth::Safe => "safe",
            GroundTruth::Unsafe => "unsafe",
        }
    }
}

impl std::fmt::Display for GroundTruth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A pre-labeled collection of compilation entries, identified by path.
///
/// The harness never opens the path itself; it is handed to the checker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureSet {
    /// Path to the compilation-entries manifest.
    pub path: PathBuf,

    /// Ground truth shared by every entry in the manifest.
    pub label: GroundTruth,
}

impl FixtureSet {
    /// Create a fixture set with an explicit label.
    pub fn new(path: impl Into<PathBuf>, label: GroundTruth) -> Self {
        Self {
            path: path.into(),
            label,
        }
    }

    /// Fixture set whose entries are all safe.
    pub fn safe(path: impl Into<PathBuf>) -> Self {
        Self::new(path, GroundTruth::Safe)
    }

    /// Fixture set whose entries are all unsafe.
    pub fn unsafe_set(path: impl Into<PathBuf>) -> Self {
        Self::new(path, GroundTruth::Unsafe)
    }

    /// Path rendered for logs and error messages.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_truth_names() {
        assert_eq!(GroundTruth::Safe.name(), "safe");
        assert_eq!(GroundTruth::Unsafe.to_string(), "unsafe");
    }

    #[test]
    fn test_fixture_constructors_attach_label() {
        let safe = FixtureSet::safe("./tests/compile_commands_safe.json");
        let unsafe_set = FixtureSet::unsafe_set("./tests/compile_commands_unsafe.json");
        assert_eq!(safe.label, GroundTruth::Safe);
        assert_eq!(unsafe_set.label, GroundTruth::Unsafe);
        assert_eq!(safe.display_path(), "./tests/compile_commands_safe.json");
    }

    #[test]
    fn test_ground_truth_serde_snake_case() {
        let json = serde_json::to_string(&GroundTruth::Unsafe).expect("serialize");
        assert_eq!(json, "\"unsafe\"");
    }
}
