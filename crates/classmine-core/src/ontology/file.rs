//! File and parameter facts.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Kind of a file fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileKind {
    /// A compiled class entry inside an archive
    Class,
    /// The archive itself
    Jar,
}

/// A file that declares extracted entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFact {
    pub kind: FileKind,
    /// Simple name (class simple name, or archive file name).
    pub name: String,
    /// Path on disk, when the file has one.
    pub path: Option<String>,
    pub location: Location,
}

/// Kind of a local variable fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalVariableKind {
    Param,
}

/// A formal parameter of a method.
///
/// Bytecode does not reliably carry parameter names, so names are positional
/// (`arg0`, `arg1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVariableFact {
    pub kind: LocalVariableKind,
    pub name: String,
    pub modifiers: u16,
    /// Decoded parameter type.
    pub type_fqn: String,
    pub declared_at: Location,
    /// FQN of the declaring method.
    pub owner: String,
    /// Zero-based parameter position.
    pub position: usize,
    pub used_at: Location,
}

impl LocalVariableFact {
    /// Positional parameter fact.
    pub fn param(
        owner: impl Into<String>,
        position: usize,
        type_fqn: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            kind: LocalVariableKind::Param,
            name: format!("arg{}", position),
            modifiers: 0,
            type_fqn: type_fqn.into(),
            declared_at: location.clone(),
            owner: owner.into(),
            position,
            used_at: location,
        }
    }
}
