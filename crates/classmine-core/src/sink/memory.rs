use crate::ontology::{
    EntityFact, EntityKind, FileFact, LocalVariableFact, RelationFact, RelationKind,
};
use crate::walker::WalkSummary;

use super::{FactSink, SinkError};

/// Keeps every fact in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entities: Vec<EntityFact>,
    pub relations: Vec<RelationFact>,
    pub files: Vec<FileFact>,
    pub local_variables: Vec<LocalVariableFact>,
    pub summary: Option<WalkSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&self, fqn: &str) -> Option<&EntityFact> {
        self.entities.iter().find(|e| e.fqn == fqn)
    }

    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &EntityFact> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn relations_of(&self, kind: RelationKind) -> impl Iterator<Item = &RelationFact> {
        self.relations.iter().filter(move |r| r.kind == kind)
    }

    /// Relations of `kind` leaving `source`.
    pub fn targets(&self, kind: RelationKind, source: &str) -> Vec<&str> {
        self.relations_of(kind)
            .filter(|r| r.source == source)
            .map(|r| r.target.as_str())
            .collect()
    }

    pub fn count_relation(&self, kind: RelationKind, source: &str, target: &str) -> usize {
        self.relations_of(kind)
            .filter(|r| r.source == source && r.target == target)
            .count()
    }

    pub fn has_relation(&self, kind: RelationKind, source: &str, target: &str) -> bool {
        self.count_relation(kind, source, target) > 0
    }

    /// Parameter facts owned by `method_fqn`, in position order.
    pub fn params_of(&self, method_fqn: &str) -> Vec<&LocalVariableFact> {
        let mut params: Vec<_> = self
            .local_variables
            .iter()
            .filter(|v| v.owner == method_fqn)
            .collect();
        params.sort_by_key(|v| v.position);
        params
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }
}

impl FactSink for MemorySink {
    fn write_entity(&mut self, fact: EntityFact) -> Result<(), SinkError> {
        self.entities.push(fact);
        Ok(())
    }

    fn write_relation(&mut self, fact: RelationFact) -> Result<(), SinkError> {
        self.relations.push(fact);
        Ok(())
    }

    fn write_file(&mut self, fact: FileFact) -> Result<(), SinkError> {
        self.files.push(fact);
        Ok(())
    }

    fn write_local_variable(&mut self, fact: LocalVariableFact) -> Result<(), SinkError> {
        self.local_variables.push(fact);
        Ok(())
    }

    fn finish(&mut self, summary: &WalkSummary) -> Result<(), SinkError> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}
