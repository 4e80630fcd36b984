use crate::ontology::{
    EntityFact, FileFact, LocalVariableFact, Location, RelationFact, RelationKind,
};
use crate::scope::ScopeStack;
use crate::sink::{FactSink, SinkError};
use crate::walker::FactCounts;

use crate::error::ExtractError;

/// Mutable state threaded through one archive's traversal.
///
/// Holds the scope stack, the location facts are stamped with, and the sink
/// they go to.
pub struct ExtractionContext<'s, S: FactSink + ?Sized> {
    pub scope: ScopeStack,
    pub location: Location,
    sink: &'s mut S,
    counts: FactCounts,
}

impl<'s, S: FactSink + ?Sized> ExtractionContext<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            scope: ScopeStack::new(),
            location: Location::default(),
            sink,
            counts: FactCounts::default(),
        }
    }

    pub fn counts(&self) -> FactCounts {
        self.counts
    }

    pub fn entity(&mut self, fact: EntityFact) -> Result<(), ExtractError> {
        self.sink.write_entity(fact)?;
        self.counts.entities += 1;
        Ok(())
    }

    pub fn relation(
        &mut self,
        kind: RelationKind,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), ExtractError> {
        let fact = RelationFact::new(kind, source, target, self.location.clone());
        self.sink.write_relation(fact)?;
        self.counts.relations += 1;
        Ok(())
    }

    /// Relation whose source is the innermost open scope.
    pub fn relation_from_scope(
        &mut self,
        kind: RelationKind,
        target: impl Into<String>,
    ) -> Result<(), ExtractError> {
        let source = self.scope.current_fqn()?.to_string();
        self.relation(kind, source, target)
    }

    pub fn file(&mut self, fact: FileFact) -> Result<(), SinkError> {
        self.sink.write_file(fact)?;
        self.counts.files += 1;
        Ok(())
    }

    pub fn local_variable(&mut self, fact: LocalVariableFact) -> Result<(), ExtractError> {
        self.sink.write_local_variable(fact)?;
        self.counts.local_variables += 1;
        Ok(())
    }
}
