//! Extended (override) dataset
//!
//! The extended dataset is a tab-separated file with one `rsid chromosome position genotype`
//! line per marker. Markers found here replace the ones decoded from the baseline genome.

use std::fs;
use std::io;
use std::path::Path;

use super::{GenomeMap, GenotypeRecord};

/// Parsed override dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideRecord {
    entries: GenomeMap,
    /// 1-based line numbers that could not be parsed.
    skipped_lines: Vec<usize>,
}

impl OverrideRecord {
    /// Load an override dataset from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let record = Self::parse(&text);
        if !record.skipped_lines.is_empty() {
            tracing::warn!(
                path = %path.display(),
                skipped = record.skipped_lines.len(),
                "ignored malformed lines in extended data"
            );
        }
        Ok(record)
    }

    /// Parse override lines; malformed lines are skipped and remembered.
    pub fn parse(text: &str) -> Self {
        let mut record = Self::default();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            match fields.as_slice() {
                [rsid, chromosome, position, genotype] if !rsid.is_empty() => {
                    record.insert(rsid, GenotypeRecord::new(*genotype, *chromosome, *position));
                }
                _ => record.skipped_lines.push(i + 1),
            }
        }
        record
    }

    /// Add or replace one marker (keyed case-insensitively).
    pub fn insert(&mut self, rsid: &str, record: GenotypeRecord) {
        self.entries.insert(rsid.to_lowercase(), record);
    }

    pub fn get(&self, rsid: &str) -> Option<&GenotypeRecord> {
        self.entries.get(&rsid.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped_lines(&self) -> &[usize] {
        &self.skipped_lines
    }

    /// Merge into a resolved genome; on equal keys the override wins.
    pub fn merge_into(&self, genome: &mut GenomeMap) {
        for (rsid, record) in &self.entries {
            genome.insert(rsid.clone(), record.clone());
        }
    }
}
