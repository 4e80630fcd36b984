//! Fact sinks.
//!
//! The extractor writes every fact through [`FactSink`], one call per fact.
//! Sinks are append-only and never queried by the extractor.

mod error;
mod jsonl;
mod memory;

pub use error::SinkError;
pub use jsonl::JsonlSink;
pub use memory::MemorySink;

use crate::ontology::{EntityFact, FileFact, LocalVariableFact, RelationFact};
use crate::walker::WalkSummary;

/// Append-only destination for extracted facts.
pub trait FactSink {
    fn write_entity(&mut self, fact: EntityFact) -> Result<(), SinkError>;

    fn write_relation(&mut self, fact: RelationFact) -> Result<(), SinkError>;

    fn write_file(&mut self, fact: FileFact) -> Result<(), SinkError>;

    fn write_local_variable(&mut self, fact: LocalVariableFact) -> Result<(), SinkError>;

    /// Record that the archive was walked to the end.
    ///
    /// Facts written before an aborted walk stay in the sink; consumers detect
    /// incomplete extraction by the absence of this marker.
    fn finish(&mut self, summary: &WalkSummary) -> Result<(), SinkError>;
}

impl<S: FactSink + ?Sized> FactSink for &mut S {
    fn write_entity(&mut self, fact: EntityFact) -> Result<(), SinkError> {
        (**self).write_entity(fact)
    }

    fn write_relation(&mut self, fact: RelationFact) -> Result<(), SinkError> {
        (**self).write_relation(fact)
    }

    fn write_file(&mut self, fact: FileFact) -> Result<(), SinkError> {
        (**self).write_file(fact)
    }

    fn write_local_variable(&mut self, fact: LocalVariableFact) -> Result<(), SinkError> {
        (**self).write_local_variable(fact)
    }

    fn finish(&mut self, summary: &WalkSummary) -> Result<(), SinkError> {
        (**self).finish(summary)
    }
}
