//! Fact graph ontology.
//!
//! Defines the closed vocabulary of facts the extractor emits from bytecode:
//!
//! - `entity` - Declared entities (packages, types, members) and their kinds
//! - `relation` - Typed, directed relations between FQNs (INSIDE, CALLS, ...)
//! - `location` - Provenance attached to every fact
//! - `file` - File and parameter facts
//!
//! All type references are emitted as unresolved FQN strings; joining them to
//! declared entities is left to downstream consumers.

pub mod entity;
pub mod file;
pub mod location;
pub mod relation;

pub use entity::{EntityFact, EntityKind};
pub use file::{FileFact, FileKind, LocalVariableFact, LocalVariableKind};
pub use location::Location;
pub use relation::{RelationCategory, RelationFact, RelationKind};

/// FQN used for classes compiled into the unnamed (default) package.
pub const DEFAULT_PACKAGE: &str = "";
