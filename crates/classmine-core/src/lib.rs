pub mod classfile;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ontology;
pub mod scope;
pub mod signature;
pub mod sink;
pub mod walker;

pub use classfile::ClassFile;
pub use config::Config;
pub use error::{ExtractError, WalkError};
pub use extractor::Extractor;
pub use ontology::{EntityFact, EntityKind, RelationFact, RelationKind};
pub use sink::{FactSink, JsonlSink, MemorySink};
pub use walker::{discover_jars, extract_jars, JarWalker, WalkSummary};
