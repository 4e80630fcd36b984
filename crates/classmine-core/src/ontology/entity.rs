//! Entity facts: one per declared package, type or member.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Kind of a declared entity.
///
/// Exactly one kind is attached to every entity fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Package,
    Class,
    Interface,
    Enum,
    Annotation,
    Field,
    EnumConstant,
    Method,
    Constructor,
    Initializer,
    AnnotationElement,
}

impl EntityKind {
    /// Stable wire name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Package => "PACKAGE",
            Self::Class => "CLASS",
            Self::Interface => "INTERFACE",
            Self::Enum => "ENUM",
            Self::Annotation => "ANNOTATION",
            Self::Field => "FIELD",
            Self::EnumConstant => "ENUM_CONSTANT",
            Self::Method => "METHOD",
            Self::Constructor => "CONSTRUCTOR",
            Self::Initializer => "INITIALIZER",
            Self::AnnotationElement => "ANNOTATION_ELEMENT",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared entity.
///
/// FQNs are expected to be unique per compilation unit, but uniqueness is not
/// enforced here: ill-formed input may yield the same FQN twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFact {
    /// Entity kind.
    pub kind: EntityKind,
    /// Fully-qualified name (methods include their parameter list).
    pub fqn: String,
    /// Simple name as it appears in the class file.
    pub name: Option<String>,
    /// Raw access flag bits.
    pub modifiers: u16,
    /// Erased parameter signature, e.g. `(java.util.List)`.
    pub raw_signature: Option<String>,
    /// Generic parameter signature, only present when it differs from the raw one.
    pub generic_signature: Option<String>,
    /// Provenance.
    pub location: Location,
}

impl EntityFact {
    pub fn new(kind: EntityKind, fqn: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            fqn: fqn.into(),
            name: None,
            modifiers: 0,
            raw_signature: None,
            generic_signature: None,
            location,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_modifiers(mut self, modifiers: u16) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attach signatures.
    ///
    /// The generic signature is dropped when it is byte-identical to the raw one.
    pub fn with_signatures(mut self, raw: impl Into<String>, generic: Option<String>) -> Self {
        let raw = raw.into();
        self.generic_signature = generic.filter(|g| *g != raw);
        self.raw_signature = Some(raw);
        self
    }
}
