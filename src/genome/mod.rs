//! Baseline sample genome and genotype lookups
//!
//! ## Modules
//!
//! - `lookup` - decode a raw sample record into a marker -> genotype map
//! - `overrides` - extended (override) dataset loading
//!
//! ## Design
//!
//! The baseline genome is supplied through [`GenomeProvider`] instead of a global constant so
//! fixture generation can be exercised against hand-built genomes in tests.

pub mod lookup;
pub mod overrides;

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub use lookup::{GenomeLookup, IndexedGenomeLookup, LookupError};
pub use overrides::OverrideRecord;

/// Sample genome bundled with the binary.
const BUNDLED_SAMPLE: &str = include_str!("../../assets/sample_genome.json");

/// One resolved marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeRecord {
    pub genotype: String,
    pub chromosome: String,
    pub position: String,
}

impl GenotypeRecord {
    pub fn new(genotype: impl Into<String>, chromosome: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            genotype: genotype.into(),
            chromosome: chromosome.into(),
            position: position.into(),
        }
    }
}

/// Resolved genome, keyed by lower-cased marker id.
pub type GenomeMap = HashMap<String, GenotypeRecord>;

/// Baseline raw sample record.
///
/// `sex`, `age`, `ancestry` and `haplogroup` are copied verbatim into fixtures, so they are kept
/// as untyped JSON values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SampleGenome {
    pub format: String,
    #[serde(default)]
    pub sex: Value,
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub ancestry: Value,
    #[serde(default)]
    pub haplogroup: Value,
    #[serde(default)]
    pub data: String,
}

#[derive(Deserialize)]
struct SampleDocument {
    inputs: SampleGenome,
}

impl SampleGenome {
    /// Parse a sample document of the form `{"inputs": {...}}`.
    pub fn from_document(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<SampleDocument>(text).map(|doc| doc.inputs)
    }
}

/// Source of the baseline sample genome.
pub trait GenomeProvider {
    fn baseline(&self) -> &SampleGenome;
}

/// The sample genome shipped inside the binary.
#[derive(Debug, Clone)]
pub struct BundledSample {
    genome: SampleGenome,
}

impl BundledSample {
    pub fn load() -> Result<Self, serde_json::Error> {
        Ok(Self {
            genome: SampleGenome::from_document(BUNDLED_SAMPLE)?,
        })
    }
}

impl GenomeProvider for BundledSample {
    fn baseline(&self) -> &SampleGenome {
        &self.genome
    }
}

/// A provider wrapping an explicit genome (useful for tests and alternative samples).
#[derive(Debug, Clone)]
pub struct FixedSample(pub SampleGenome);

impl GenomeProvider for FixedSample {
    fn baseline(&self) -> &SampleGenome {
        &self.0
    }
}
