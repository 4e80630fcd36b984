use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::config::OutputConfig;
use crate::ontology::{EntityFact, FileFact, LocalVariableFact, RelationFact};
use crate::walker::WalkSummary;

use super::{FactSink, SinkError};

struct JsonlFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonlFile {
    fn create(path: PathBuf) -> Result<Self, SinkError> {
        let file = File::create(&path).map_err(|e| SinkError::io(&path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn append<T: Serialize>(&mut self, fact: &T) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, fact)?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| SinkError::io(&self.path, e))
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|e| SinkError::io(&self.path, e))
    }
}

/// Writes one JSON-lines file per fact family.
///
/// ```text
/// <dir>/
///   entities.jsonl
///   relations.jsonl
///   files.jsonl
///   local_variables.jsonl
///   extraction.json        # completion marker, written by finish()
/// ```
pub struct JsonlSink {
    dir: PathBuf,
    marker_file: String,
    entities: JsonlFile,
    relations: JsonlFile,
    files: JsonlFile,
    local_variables: JsonlFile,
    finished: bool,
}

impl JsonlSink {
    /// Creates a sink with default file names.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        Self::with_config(dir, &OutputConfig::default())
    }

    /// Creates a sink using the file names from `config`.
    ///
    /// The directory is created if needed; existing fact files are truncated.
    pub fn with_config(dir: impl AsRef<Path>, config: &OutputConfig) -> Result<Self, SinkError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| SinkError::io(&dir, e))?;

        // A stale marker would make a partial rerun look complete.
        let marker = dir.join(&config.marker_file);
        if marker.exists() {
            fs::remove_file(&marker).map_err(|e| SinkError::io(&marker, e))?;
        }

        Ok(Self {
            entities: JsonlFile::create(dir.join(&config.entities_file))?,
            relations: JsonlFile::create(dir.join(&config.relations_file))?,
            files: JsonlFile::create(dir.join(&config.files_file))?,
            local_variables: JsonlFile::create(dir.join(&config.local_variables_file))?,
            marker_file: config.marker_file.clone(),
            dir,
            finished: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn check_open(&self) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        Ok(())
    }
}

impl FactSink for JsonlSink {
    fn write_entity(&mut self, fact: EntityFact) -> Result<(), SinkError> {
        self.check_open()?;
        self.entities.append(&fact)
    }

    fn write_relation(&mut self, fact: RelationFact) -> Result<(), SinkError> {
        self.check_open()?;
        self.relations.append(&fact)
    }

    fn write_file(&mut self, fact: FileFact) -> Result<(), SinkError> {
        self.check_open()?;
        self.files.append(&fact)
    }

    fn write_local_variable(&mut self, fact: LocalVariableFact) -> Result<(), SinkError> {
        self.check_open()?;
        self.local_variables.append(&fact)
    }

    fn finish(&mut self, summary: &WalkSummary) -> Result<(), SinkError> {
        self.check_open()?;
        self.entities.flush()?;
        self.relations.flush()?;
        self.files.flush()?;
        self.local_variables.flush()?;

        let path = self.dir.join(&self.marker_file);
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&path, json).map_err(|e| SinkError::io(&path, e))?;

        self.finished = true;
        debug!(dir = %self.dir.display(), "Fact output finished");
        Ok(())
    }
}
