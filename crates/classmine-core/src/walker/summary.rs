use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of facts written per family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCounts {
    pub entities: usize,
    pub relations: usize,
    pub files: usize,
    pub local_variables: usize,
}

impl FactCounts {
    pub fn total(&self) -> usize {
        self.entities + self.relations + self.files + self.local_variables
    }

    pub fn add(&mut self, other: &FactCounts) {
        self.entities += other.entities;
        self.relations += other.relations;
        self.files += other.files;
        self.local_variables += other.local_variables;
    }
}

/// Outcome of walking one archive. Written as the completion marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkSummary {
    /// Archive path as given, or a caller-supplied name for in-memory archives.
    pub jar: String,
    /// Hex SHA-256 of the archive bytes, when read from disk.
    pub sha256: Option<String>,
    /// Archive entries that were class files.
    pub classes_seen: usize,
    /// Class passes that completed.
    pub classes_extracted: usize,
    /// Class passes that were aborted.
    pub classes_failed: usize,
    pub facts: FactCounts,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl WalkSummary {
    pub(crate) fn start(jar: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            jar: jar.into(),
            sha256: None,
            classes_seen: 0,
            classes_extracted: 0,
            classes_failed: 0,
            facts: FactCounts::default(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Whether every class pass completed.
    pub fn is_clean(&self) -> bool {
        self.classes_failed == 0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

impl std::fmt::Display for WalkSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.jar)?;
        writeln!(f, "Classes:")?;
        writeln!(f, "  Seen:      {}", self.classes_seen)?;
        writeln!(f, "  Extracted: {}", self.classes_extracted)?;
        if self.classes_failed > 0 {
            writeln!(f, "  Failed:    {}", self.classes_failed)?;
        }
        writeln!(f, "Facts:")?;
        writeln!(f, "  Entities:  {}", self.facts.entities)?;
        writeln!(f, "  Relations: {}", self.facts.relations)?;
        writeln!(f, "  Files:     {}", self.facts.files)?;
        writeln!(f, "  Params:    {}", self.facts.local_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_add_and_total() {
        let mut a = FactCounts {
            entities: 1,
            relations: 2,
            files: 1,
            local_variables: 0,
        };
        a.add(&FactCounts {
            entities: 2,
            relations: 3,
            files: 0,
            local_variables: 4,
        });
        assert_eq!(a.total(), 13);
        assert_eq!(a.relations, 5);
    }

    #[test]
    fn test_display_hides_zero_failures() {
        let summary = WalkSummary::start("lib.jar");
        let text = summary.to_string();
        assert!(text.contains("lib.jar"));
        assert!(!text.contains("Failed"));
        assert!(summary.is_clean());
    }
}
