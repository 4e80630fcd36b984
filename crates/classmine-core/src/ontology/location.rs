//! Provenance attached to every fact.

use serde::{Deserialize, Serialize};

/// Where a fact came from.
///
/// The package is fixed for the duration of a class-file pass; the class-file
/// name is set once per jar entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Package FQN derived from the archive path.
    pub package: String,
    /// Source file name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line information placeholder. Bytecode extraction never fills it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Dotted name of the class file the fact was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_file: Option<String>,
}

impl Location {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_class_file(mut self, class_file: impl Into<String>) -> Self {
        self.class_file = Some(class_file.into());
        self
    }
}
