//! Relation facts: typed, directed edges between FQNs.
//!
//! Relations are organized by semantic meaning:
//!
//! - **Structural**: INSIDE, ANNOTATED_BY
//! - **Type system**: EXTENDS, IMPLEMENTS, HOLDS, RETURNS, THROWS, PARAMETRIZED_BY
//! - **Behavioral**: READS, WRITES, CALLS, CASTS, CHECKS, INSTANTIATES

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Kind of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    /// A extends B (class extends class)
    Extends,
    /// A implements B (class implements interface)
    Implements,
    /// A is declared inside B
    Inside,
    /// A carries annotation B
    AnnotatedBy,
    /// Field A holds values of type B
    Holds,
    /// A writes field B
    Writes,
    /// A reads field B
    Reads,
    /// A calls method B
    Calls,
    /// A declares that it throws B
    Throws,
    /// A casts to B
    Casts,
    /// A performs an instanceof check against B
    Checks,
    /// A instantiates B
    Instantiates,
    /// Method A returns B
    Returns,
    /// A is parametrized by the formal type parameter B
    ParametrizedBy,
}

/// Categories of relations for filtering and organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationCategory {
    /// Declaration structure (inside, annotated by)
    Structural,
    /// Type system relationships (extends, holds, returns)
    TypeSystem,
    /// Relationships derived from method bodies (calls, reads)
    Behavioral,
}

impl RelationKind {
    /// Stable wire name of the relation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extends => "EXTENDS",
            Self::Implements => "IMPLEMENTS",
            Self::Inside => "INSIDE",
            Self::AnnotatedBy => "ANNOTATED_BY",
            Self::Holds => "HOLDS",
            Self::Writes => "WRITES",
            Self::Reads => "READS",
            Self::Calls => "CALLS",
            Self::Throws => "THROWS",
            Self::Casts => "CASTS",
            Self::Checks => "CHECKS",
            Self::Instantiates => "INSTANTIATES",
            Self::Returns => "RETURNS",
            Self::ParametrizedBy => "PARAMETRIZED_BY",
        }
    }

    /// Get the category of this relation.
    pub fn category(&self) -> RelationCategory {
        match self {
            Self::Inside | Self::AnnotatedBy => RelationCategory::Structural,

            Self::Extends | Self::Implements | Self::Holds | Self::Throws |
            Self::Returns | Self::ParametrizedBy => RelationCategory::TypeSystem,

            Self::Writes | Self::Reads | Self::Calls | Self::Casts |
            Self::Checks | Self::Instantiates => RelationCategory::Behavioral,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A relation between two FQNs.
///
/// Targets are unresolved: they name a type or member that may live in
/// another class file or another jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationFact {
    pub kind: RelationKind,
    /// Source FQN
    pub source: String,
    /// Target FQN
    pub target: String,
    pub location: Location,
}

impl RelationFact {
    pub fn new(
        kind: RelationKind,
        source: impl Into<String>,
        target: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
            location,
        }
    }
}
