//! Test fixture synthesis
//!
//! Builds the `{"inputs": {...}}` document a weapp reads on stdin during `weapp-cli test`.
//!
//! ## Precedence
//!
//! 1. `format` is always present.
//! 2. `sex`, `age`, `ancestry`, `haplogroup` are copied from the baseline genome when enabled.
//! 3. Whole-genome mode copies `data` and ignores any requested marker list.
//! 4. Otherwise requested markers are resolved through the genome lookup, with the override
//!    dataset winning over decoded genotypes, and stored under upper-cased keys.
//!
//! Building never fails: anything that cannot be resolved becomes a [`FixtureWarning`].

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use weapp_core::conventions::DEFAULT_ARRAY_FORMAT;

use crate::genome::{GenomeLookup, GenomeMap, GenomeProvider, OverrideRecord};

/// Which inputs the weapp requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFlags {
    pub sex: bool,
    pub age: bool,
    pub ancestry: bool,
    pub haplogroup: bool,
    pub whole_genome: bool,
    pub array_format: String,
}

impl Default for FixtureFlags {
    fn default() -> Self {
        Self {
            sex: false,
            age: false,
            ancestry: false,
            haplogroup: false,
            whole_genome: false,
            array_format: DEFAULT_ARRAY_FORMAT.to_string(),
        }
    }
}

/// Non-fatal problems found while building a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureWarning {
    /// Whole-genome data was requested, so the marker list was not used.
    IgnoredMarkerList,
    /// A requested marker is not in the resolved genome (spelled as requested).
    MissingMarker { marker: String },
    /// The baseline genome could not be decoded; every requested marker is missing.
    LookupUnavailable { reason: String },
}

impl fmt::Display for FixtureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureWarning::IgnoredMarkerList => {
                write!(f, "Whole genome data is required; the RSID list will be ignored.")
            }
            FixtureWarning::MissingMarker { marker } => write!(f, "{marker} does not exist, ignored"),
            FixtureWarning::LookupUnavailable { reason } => {
                write!(f, "Sample genome could not be decoded ({reason}); requested SNPs are left out")
            }
        }
    }
}

/// The generated test input document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fixture {
    inputs: Map<String, Value>,
}

impl Fixture {
    fn new(format: &str) -> Self {
        let mut inputs = Map::new();
        inputs.insert("format".to_string(), Value::String(format.to_string()));
        Self { inputs }
    }

    pub fn inputs(&self) -> &Map<String, Value> {
        &self.inputs
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inputs.get(key)
    }

    /// Compact JSON, the form written to `data/data.json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Write the fixture, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)
    }
}

/// Fixture plus the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct FixtureReport {
    pub fixture: Fixture,
    pub warnings: Vec<FixtureWarning>,
}

/// Builds fixtures from a baseline genome provider and a genome lookup.
pub struct FixtureBuilder<'a> {
    provider: &'a dyn GenomeProvider,
    lookup: &'a dyn GenomeLookup,
}

impl<'a> FixtureBuilder<'a> {
    pub fn new(provider: &'a dyn GenomeProvider, lookup: &'a dyn GenomeLookup) -> Self {
        Self { provider, lookup }
    }

    #[tracing::instrument(skip_all, fields(markers = markers.len(), whole_genome = flags.whole_genome))]
    pub fn build(&self, flags: &FixtureFlags, markers: &[String], overrides: Option<&OverrideRecord>) -> FixtureReport {
        let baseline = self.provider.baseline();
        let mut fixture = Fixture::new(&flags.array_format);
        let mut warnings = Vec::new();

        let optional_fields = [
            (flags.sex, "sex", &baseline.sex),
            (flags.age, "age", &baseline.age),
            (flags.ancestry, "ancestry", &baseline.ancestry),
            (flags.haplogroup, "haplogroup", &baseline.haplogroup),
        ];
        for (enabled, key, value) in optional_fields {
            if enabled {
                fixture.inputs.insert(key.to_string(), value.clone());
            }
        }

        let requested: Vec<&str> = markers.iter().map(|m| m.trim()).filter(|m| !m.is_empty()).collect();

        if flags.whole_genome {
            fixture
                .inputs
                .insert("data".to_string(), Value::String(baseline.data.clone()));
            if !requested.is_empty() {
                warnings.push(FixtureWarning::IgnoredMarkerList);
            }
        } else if !requested.is_empty() {
            let mut genome = match self.lookup.lookup(baseline) {
                Ok(genome) => genome,
                Err(e) => {
                    warnings.push(FixtureWarning::LookupUnavailable { reason: e.to_string() });
                    GenomeMap::new()
                }
            };
            if let Some(overrides) = overrides {
                overrides.merge_into(&mut genome);
            }

            let mut seen = HashSet::new();
            for marker in requested {
                let key = marker.to_lowercase();
                if !seen.insert(key.clone()) {
                    continue;
                }
                match genome.get(&key) {
                    Some(record) => {
                        fixture
                            .inputs
                            .insert(key.to_uppercase(), Value::String(record.genotype.clone()));
                    }
                    None => warnings.push(FixtureWarning::MissingMarker {
                        marker: marker.to_string(),
                    }),
                }
            }
        }

        for warning in &warnings {
            tracing::debug!(%warning, "fixture warning");
        }
        FixtureReport { fixture, warnings }
    }
}

/// Read a marker list file: one id per line, blank lines skipped.
pub fn read_marker_list(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
