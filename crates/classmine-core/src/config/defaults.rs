//! Default values for classmine configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Extraction Defaults
// ============================================================================

/// Skip `META-INF/` entries (multi-release overlays, shaded copies).
pub const DEFAULT_SKIP_META_INF: bool = true;

/// Worker threads for multi-jar extraction. 0 lets rayon decide.
pub const DEFAULT_THREADS: usize = 0;

/// Archive extensions picked up when scanning a directory.
pub const DEFAULT_JAR_EXTENSIONS: &[&str] = &["jar"];

/// Directories never descended into when scanning for archives.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    ".gradle",
    ".idea",
    ".classmine",
];

/// Suffix marking an archive entry as a compiled class.
pub const CLASS_FILE_SUFFIX: &str = ".class";

/// Archive prefix skipped when `skip_meta_inf` is set.
pub const META_INF_PREFIX: &str = "META-INF/";

// ============================================================================
// Output Defaults
// ============================================================================

/// Root directory for per-jar fact output.
pub const DEFAULT_OUTPUT_DIR: &str = "classmine-out";

/// Entity facts, one JSON object per line.
pub const DEFAULT_ENTITIES_FILE: &str = "entities.jsonl";

/// Relation facts, one JSON object per line.
pub const DEFAULT_RELATIONS_FILE: &str = "relations.jsonl";

/// File facts, one JSON object per line.
pub const DEFAULT_FILES_FILE: &str = "files.jsonl";

/// Parameter facts, one JSON object per line.
pub const DEFAULT_LOCAL_VARIABLES_FILE: &str = "local_variables.jsonl";

/// Completion marker written once a jar has been fully walked.
pub const DEFAULT_MARKER_FILE: &str = "extraction.json";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default tracing filter level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "classmine.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "classmine";

/// File name under the user config directory.
pub const USER_CONFIG_FILE: &str = "config.toml";
