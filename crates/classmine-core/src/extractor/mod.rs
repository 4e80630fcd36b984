//! Bytecode-to-fact extraction.
//!
//! One [`Extractor`] serves one archive: it owns the extraction context
//! (scope stack, location, sink handle) and runs one class-file pass per
//! archive entry.

mod annotation;
mod class;
mod code;
mod context;
mod member;

pub use class::{classify_class, extract_class};
pub use context::ExtractionContext;

use tracing::error;

use crate::classfile::ClassFile;
use crate::error::ExtractError;
use crate::ontology::{EntityFact, EntityKind, FileFact, FileKind, Location, DEFAULT_PACKAGE};
use crate::scope::{ScopeKind, ScopeStack};
use crate::signature::decode_class_name;
use crate::sink::{FactSink, SinkError};
use crate::walker::FactCounts;

/// Package and class names derived from an archive entry path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryName {
    /// Dotted package, empty for the default package.
    pub package: String,
    /// Class simple name (binary, so nested classes keep their `$`).
    pub class_name: String,
    /// Dotted class name, `package.class_name`.
    pub class_fqn: String,
}

impl EntryName {
    /// Split `a/b/C$D.class` into package `a.b` and class `C$D`.
    pub fn parse(entry: &str) -> Result<Self, ExtractError> {
        let stem = entry.strip_suffix(".class").unwrap_or(entry);
        let class_fqn = decode_class_name(stem)?;
        let (package, class_name) = match class_fqn.rfind('.') {
            Some(dot) => (class_fqn[..dot].to_string(), class_fqn[dot + 1..].to_string()),
            None => (DEFAULT_PACKAGE.to_string(), class_fqn.clone()),
        };
        Ok(Self {
            package,
            class_name,
            class_fqn,
        })
    }
}

pub struct Extractor<'s, S: FactSink + ?Sized> {
    ctx: ExtractionContext<'s, S>,
}

impl<'s, S: FactSink + ?Sized> Extractor<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            ctx: ExtractionContext::new(sink),
        }
    }

    pub fn scope(&self) -> &ScopeStack {
        &self.ctx.scope
    }

    pub fn counts(&self) -> FactCounts {
        self.ctx.counts()
    }

    /// Write a file fact outside any class pass (e.g. the archive itself).
    pub fn write_file(&mut self, fact: FileFact) -> Result<(), SinkError> {
        self.ctx.file(fact)
    }

    /// Run the full procedure for one archive entry.
    ///
    /// Parses the class, emits the package entity, opens the package frame,
    /// runs the class pass and records the class file. On failure the scope
    /// stack is restored to its depth before the entry and the file fact is
    /// not written.
    pub fn extract_entry(&mut self, entry: &str, bytes: &[u8]) -> Result<(), ExtractError> {
        let names = EntryName::parse(entry)?;
        let base_depth = self.ctx.scope.depth();

        self.ctx.location = Location::new(names.package.clone()).with_class_file(&names.class_fqn);
        let result = self.run_entry(&names, entry, bytes);

        if let Err(e) = &result {
            error!(entry = %entry, error = %e, "Class extraction aborted");
            self.ctx.scope.truncate(base_depth);
        }
        self.ctx.location = Location::default();
        result
    }

    fn run_entry(&mut self, names: &EntryName, entry: &str, bytes: &[u8]) -> Result<(), ExtractError> {
        let class = ClassFile::parse(bytes)?;
        self.ctx.location.file = class.source_file.clone();

        self.ctx.entity(EntityFact::new(
            EntityKind::Package,
            names.package.clone(),
            self.ctx.location.clone(),
        ))?;
        self.ctx
            .scope
            .push(names.package.clone(), ScopeKind::Entity(EntityKind::Package));

        extract_class(&mut self.ctx, &class)?;

        let location = self.ctx.location.clone();
        self.ctx.file(FileFact {
            kind: FileKind::Class,
            name: names.class_name.clone(),
            path: Some(entry.to_string()),
            location,
        })?;

        self.ctx.scope.pop()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_split() {
        let names = EntryName::parse("org/example/Outer$Inner.class").unwrap();
        assert_eq!(names.package, "org.example");
        assert_eq!(names.class_name, "Outer$Inner");
        assert_eq!(names.class_fqn, "org.example.Outer$Inner");
    }

    #[test]
    fn test_default_package_entry() {
        let names = EntryName::parse("Main.class").unwrap();
        assert_eq!(names.package, DEFAULT_PACKAGE);
        assert_eq!(names.class_name, "Main");
    }
}
