//! Archive walking.
//!
//! [`JarWalker`] drives one class-file pass per class entry of a jar, in the
//! order of the archive's entry table. [`extract_jars`] fans independent jars
//! out over a rayon pool, one JSON-lines sink per jar.

mod discover;
mod summary;

pub use discover::discover_jars;
pub use summary::{FactCounts, WalkSummary};

use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::config::{Config, ExtractionConfig};
use crate::error::{ExtractError, WalkError};
use crate::extractor::Extractor;
use crate::ontology::{FileFact, FileKind, Location};
use crate::sink::{FactSink, JsonlSink};

/// Walks class entries of jar archives.
#[derive(Debug, Clone, Default)]
pub struct JarWalker {
    config: ExtractionConfig,
}

impl JarWalker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Open and walk the jar at `path`.
    pub fn walk_path<S: FactSink + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        sink: &mut S,
    ) -> Result<WalkSummary, WalkError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| WalkError::io(path, e))?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        self.walk(&path.display().to_string(), Cursor::new(bytes), Some(sha256), sink)
    }

    /// Walk an already-open archive. `name` identifies it in facts and logs.
    pub fn walk_archive<R: Read + Seek, S: FactSink + ?Sized>(
        &self,
        name: &str,
        archive: R,
        sink: &mut S,
    ) -> Result<WalkSummary, WalkError> {
        self.walk(name, archive, None, sink)
    }

    fn walk<R: Read + Seek, S: FactSink + ?Sized>(
        &self,
        name: &str,
        reader: R,
        sha256: Option<String>,
        sink: &mut S,
    ) -> Result<WalkSummary, WalkError> {
        let mut summary = WalkSummary::start(name);
        summary.sha256 = sha256;

        let mut archive = ZipArchive::new(reader).map_err(|e| WalkError::zip(name, e))?;
        let mut extractor = Extractor::new(&mut *sink);

        let file_name = Path::new(name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        extractor.write_file(FileFact {
            kind: FileKind::Jar,
            name: file_name,
            path: Some(name.to_string()),
            location: Location::default(),
        })?;

        for idx in 0..archive.len() {
            let mut entry = archive.by_index(idx).map_err(|e| WalkError::zip(name, e))?;
            if !entry.is_file() || !self.config.is_class_entry(entry.name()) {
                continue;
            }

            let entry_name = entry.name().to_string();
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| WalkError::io(format!("{}!{}", name, entry_name), e))?;
            drop(entry);

            summary.classes_seen += 1;
            match extractor.extract_entry(&entry_name, &bytes) {
                Ok(()) => summary.classes_extracted += 1,
                Err(ExtractError::Sink(e)) => return Err(WalkError::Sink(e)),
                Err(_) => summary.classes_failed += 1,
            }
        }

        summary.facts = extractor.counts();
        drop(extractor);

        summary.finished_at = Utc::now();
        sink.finish(&summary)?;

        info!(
            jar = %name,
            classes = summary.classes_extracted,
            failed = summary.classes_failed,
            facts = summary.facts.total(),
            duration_ms = summary.duration_ms(),
            "Jar extracted"
        );
        Ok(summary)
    }
}

/// Result of extracting one jar in a multi-jar run.
#[derive(Debug)]
pub struct JarOutcome {
    pub jar: PathBuf,
    pub output_dir: PathBuf,
    pub result: Result<WalkSummary, WalkError>,
}

/// Assign each jar its own output directory, disambiguating repeated stems.
///
/// Generated `<stem>-N` names are checked against every directory already
/// handed out, including other jars' plain stems.
fn output_dirs(paths: &[PathBuf], output_root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut taken: HashSet<PathBuf> = paths
        .iter()
        .map(|jar| config.output.jar_dir(output_root, jar))
        .collect();
    let mut assigned: HashSet<PathBuf> = HashSet::new();

    paths
        .iter()
        .map(|jar| {
            let dir = config.output.jar_dir(output_root, jar);
            if assigned.insert(dir.clone()) {
                return dir;
            }
            let mut n = 2;
            loop {
                let mut name = dir.as_os_str().to_owned();
                name.push(format!("-{}", n));
                let candidate = PathBuf::from(name);
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// Extract independent jars in parallel, one [`JsonlSink`] per jar.
///
/// `on_done` is invoked from worker threads as each jar finishes. A failing
/// jar never affects the others.
pub fn extract_jars<F>(
    paths: &[PathBuf],
    output_root: &Path,
    config: &Config,
    on_done: F,
) -> Result<Vec<JarOutcome>, WalkError>
where
    F: Fn(&JarOutcome) + Sync + Send,
{
    let dirs = output_dirs(paths, output_root, config);
    let walker = JarWalker::with_config(config.extraction.clone());

    let run = || {
        paths
            .par_iter()
            .zip(dirs.par_iter())
            .map(|(jar, dir)| {
                debug!(jar = %jar.display(), output = %dir.display(), "Extracting jar");
                let result = JsonlSink::with_config(dir, &config.output)
                    .map_err(WalkError::from)
                    .and_then(|mut sink| walker.walk_path(jar, &mut sink));
                let outcome = JarOutcome {
                    jar: jar.clone(),
                    output_dir: dir.clone(),
                    result,
                };
                on_done(&outcome);
                outcome
            })
            .collect::<Vec<_>>()
    };

    if config.extraction.threads == 0 {
        return Ok(run());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.extraction.threads)
        .build()
        .map_err(|e| WalkError::ThreadPool(e.to_string()))?;
    Ok(pool.install(run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dirs_disambiguate_stems() {
        let config = Config::default();
        let paths = vec![
            PathBuf::from("a/lib.jar"),
            PathBuf::from("b/lib.jar"),
            PathBuf::from("c/other.jar"),
        ];
        let dirs = output_dirs(&paths, Path::new("out"), &config);
        assert_eq!(dirs[0], PathBuf::from("out/lib"));
        assert_eq!(dirs[1], PathBuf::from("out/lib-2"));
        assert_eq!(dirs[2], PathBuf::from("out/other"));
    }

    #[test]
    fn test_output_dirs_skip_existing_stems() {
        let config = Config::default();
        let paths = vec![
            PathBuf::from("a/lib-2.jar"),
            PathBuf::from("a/lib.jar"),
            PathBuf::from("b/lib.jar"),
            PathBuf::from("c/lib.jar"),
        ];
        let dirs = output_dirs(&paths, Path::new("out"), &config);
        assert_eq!(dirs[0], PathBuf::from("out/lib-2"));
        assert_eq!(dirs[1], PathBuf::from("out/lib"));
        assert_eq!(dirs[2], PathBuf::from("out/lib-3"));
        assert_eq!(dirs[3], PathBuf::from("out/lib-4"));

        let unique: HashSet<_> = dirs.iter().collect();
        assert_eq!(unique.len(), dirs.len());
    }
}
