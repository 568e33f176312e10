//! Raw genome decoding
//!
//! A raw sample record stores genotypes as one long string: two characters per marker, in the
//! order given by the reference index for the record's array format. An index file has one
//! `rsid<TAB>chromosome<TAB>position` line per marker; line `n` describes characters
//! `2n..2n+2` of the data string.

use std::collections::HashMap;

use thiserror::Error;
use weapp_core::conventions::{DEFAULT_ARRAY_FORMAT, index_file_name};

use super::{GenomeMap, GenotypeRecord, SampleGenome};

/// Reference index bundled with the binary (also copied into every new project).
pub const BUNDLED_INDEX: &str = include_str!("../../assets/indexes/index_wegene_affy_2.idx");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no reference index for array format `{0}`")]
    UnknownFormat(String),

    #[error("malformed line {line} in {file}")]
    MalformedIndex { file: String, line: usize },

    #[error("genome data for `{format}` is too short: {markers} markers need {needed} characters, found {found}")]
    DataTooShort {
        format: String,
        markers: usize,
        needed: usize,
        found: usize,
    },
}

/// Resolve a raw sample record into a marker map.
pub trait GenomeLookup {
    fn lookup(&self, raw: &SampleGenome) -> Result<GenomeMap, LookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexEntry {
    rsid: String,
    chromosome: String,
    position: String,
}

/// Index-driven decoder, one index per array format.
#[derive(Debug, Clone, Default)]
pub struct IndexedGenomeLookup {
    indexes: HashMap<String, Vec<IndexEntry>>,
}

impl IndexedGenomeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder preloaded with the bundled index.
    pub fn bundled() -> Result<Self, LookupError> {
        let mut lookup = Self::new();
        lookup.add_index(DEFAULT_ARRAY_FORMAT, BUNDLED_INDEX)?;
        Ok(lookup)
    }

    /// Register the index text for an array format, replacing any previous one.
    pub fn add_index(&mut self, format: &str, text: &str) -> Result<(), LookupError> {
        let file = index_file_name(format);
        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t').map(str::trim);
            match (fields.next(), fields.next(), fields.next()) {
                (Some(rsid), Some(chromosome), Some(position)) if !rsid.is_empty() => entries.push(IndexEntry {
                    rsid: rsid.to_lowercase(),
                    chromosome: chromosome.to_string(),
                    position: position.to_string(),
                }),
                _ => {
                    return Err(LookupError::MalformedIndex {
                        file: file.clone(),
                        line: i + 1,
                    });
                }
            }
        }
        self.indexes.insert(format.to_string(), entries);
        Ok(())
    }
}

impl GenomeLookup for IndexedGenomeLookup {
    #[tracing::instrument(skip_all, fields(format = %raw.format))]
    fn lookup(&self, raw: &SampleGenome) -> Result<GenomeMap, LookupError> {
        let entries = self
            .indexes
            .get(&raw.format)
            .ok_or_else(|| LookupError::UnknownFormat(raw.format.clone()))?;

        let data = raw.data.as_bytes();
        let needed = entries.len() * 2;
        if data.len() < needed {
            return Err(LookupError::DataTooShort {
                format: raw.format.clone(),
                markers: entries.len(),
                needed,
                found: data.len(),
            });
        }

        let genome: GenomeMap = entries
            .iter()
            .zip(data.chunks_exact(2))
            .map(|(entry, genotype)| {
                (
                    entry.rsid.clone(),
                    GenotypeRecord::new(
                        String::from_utf8_lossy(genotype),
                        entry.chromosome.clone(),
                        entry.position.clone(),
                    ),
                )
            })
            .collect();
        tracing::debug!(markers = genome.len(), "decoded raw genome");
        Ok(genome)
    }
}
