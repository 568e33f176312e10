//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.
//!
//! Each command takes the directory it operates on explicitly (the current directory when
//! called from `run()`), so tests can drive them against scratch trees.

use std::path::{Path, PathBuf};
use std::time::Duration;

use weapp_core::conventions::{DATA_DIR, FIXTURE_FILE, REPORT_FILE};
use weapp_core::lang::platforms;

use crate::archive;
use crate::config;
use crate::extras;
use crate::fixture::{self, FixtureBuilder, FixtureFlags, FixtureWarning};
use crate::genome::{BundledSample, IndexedGenomeLookup, OverrideRecord};
use crate::harness::{ExecutionHarness, RuntimeSpec};
use crate::meta::{MetaError, ProjectMeta};
use crate::render::{self, section_or_placeholder};
use crate::scaffold::{ProjectGenerator, ScaffoldError};

use super::output;
use super::{CliError, CliResult, ExitCode, InitArgs};

// ============================================================================
// init
// ============================================================================

/// Create a new project under `parent`.
pub fn init(parent: &Path, args: &InitArgs, data_home: &Path) -> CliResult<ExitCode> {
    output::progress("Initializing the project...");

    let meta = ProjectMeta::new(&args.project, args.language, args.markdown.enabled());
    let generator = ProjectGenerator::new(parent, meta).with_data_home(data_home);
    if let Err(ScaffoldError::AlreadyExists(_)) = generator.check_target() {
        return Err(CliError::aborted("Project folder already exists!"));
    }

    let whole_genome = args.genome.enabled();
    let markers = match &args.rsid_file {
        Some(path) if !whole_genome => {
            let path = parent.join(path);
            if !path.is_file() {
                return Err(CliError::aborted("RSID list file does not exist!"));
            }
            fixture::read_marker_list(&path)
                .map_err(|e| CliError::failure(format!("Error reading {}: {e}", path.display())))?
        }
        Some(path) => {
            let listed = fixture::read_marker_list(&parent.join(path)).unwrap_or_default();
            if listed.is_empty() {
                output::highlight(&FixtureWarning::IgnoredMarkerList.to_string());
            }
            listed
        }
        None => Vec::new(),
    };

    output::progress("Generating test data...");
    let flags = FixtureFlags {
        sex: args.sex.enabled(),
        age: args.age.enabled(),
        ancestry: args.ancestry.enabled(),
        haplogroup: args.haplogroup.enabled(),
        whole_genome,
        ..FixtureFlags::default()
    };
    let provider =
        BundledSample::load().map_err(|e| CliError::failure(format!("Error loading the bundled sample genome: {e}")))?;
    let lookup =
        IndexedGenomeLookup::bundled().map_err(|e| CliError::failure(format!("Error loading the bundled index: {e}")))?;
    let overrides = load_overrides(data_home);
    let report = FixtureBuilder::new(&provider, &lookup).build(&flags, &markers, overrides.as_ref());
    for warning in &report.warnings {
        output::highlight(&warning.to_string());
    }

    output::progress("Generating scaffold scripts...");
    let root = generator
        .generate(&report.fixture)
        .map_err(|e| CliError::failure(format!("Error generating project: {e}")))?;

    output::progress(&format!("Project Initialization Completed: {}", root.display()));
    Ok(ExitCode::SUCCESS)
}

/// The installed override dataset, if any. Problems are warnings.
fn load_overrides(data_home: &Path) -> Option<OverrideRecord> {
    let dir = config::extended_data_dir(data_home);
    if !dir.is_dir() {
        return None;
    }
    let file = config::extended_data_file(data_home);
    match OverrideRecord::load(&file) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(path = %file.display(), error = %e, "extended data unavailable");
            output::highlight(&format!("Extended data could not be read ({e}); using the sample genome only."));
            None
        }
    }
}

// ============================================================================
// test
// ============================================================================

fn load_meta(root: &Path) -> CliResult<ProjectMeta> {
    ProjectMeta::load(root).map_err(|e| match e {
        MetaError::Missing(_) => CliError::aborted("Not a weapp project folder!"),
        other => CliError::aborted(&other.to_string()),
    })
}

/// What `test` showed for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestSummary {
    /// The `WeApp Outputs` section, `None` when the weapp printed nothing.
    pub outputs: String,
    /// The `WeApp Errors` section.
    pub errors: String,
    /// The HTML report written for this run.
    pub report: Option<PathBuf>,
    /// Why the run or the report failed, if it did. Never fatal.
    pub failure: Option<String>,
    pub exit_code: Option<i32>,
}

/// Run the project's weapp against `data/data.json` and show its output.
pub fn test(root: &Path, timeout_secs: u64) -> CliResult<ExitCode> {
    if platforms::current().is_none() {
        return Err(CliError::aborted("Unsupported operation system!"));
    }
    let meta = load_meta(root)?;
    let runtime = RuntimeSpec::for_host(meta.language).map_err(|e| CliError::aborted(&e.to_string()))?;
    run_test(root, &meta, &runtime, timeout_secs)?;
    Ok(ExitCode::SUCCESS)
}

/// `test` with an explicit runtime instead of the host's strategy-table row.
pub fn test_with(root: &Path, runtime: &RuntimeSpec, timeout_secs: u64) -> CliResult<TestSummary> {
    let meta = load_meta(root)?;
    run_test(root, &meta, runtime, timeout_secs)
}

fn run_test(root: &Path, meta: &ProjectMeta, runtime: &RuntimeSpec, timeout_secs: u64) -> CliResult<TestSummary> {
    output::progress("Testing your weapp using the generated testing data...\n");

    let harness = ExecutionHarness::new(Duration::from_secs(timeout_secs.max(1)));
    let fixture = Path::new(DATA_DIR).join(FIXTURE_FILE);
    let captured = match harness.run_with(runtime, root, &fixture) {
        Ok(captured) => captured,
        Err(e) => {
            output::failure("An error has occured during the test: ");
            output::failure(&e.to_string());
            return Ok(TestSummary {
                failure: Some(e.to_string()),
                ..TestSummary::default()
            });
        }
    };

    let mut summary = TestSummary {
        outputs: section_or_placeholder(&captured.stdout_text).to_string(),
        errors: section_or_placeholder(&captured.stderr_text).to_string(),
        exit_code: captured.exit_code,
        ..TestSummary::default()
    };

    output::progress("WeApp Outputs: ");
    output::highlight(&format!("{}\n", summary.outputs));
    if captured.stdout_text.is_empty() {
        if meta.markdown_enabled {
            match render::clear_report(root) {
                Ok(_) => output::highlight(&format!("No output, so no {REPORT_FILE} was generated.\n")),
                Err(e) => {
                    output::failure(&format!("Could not remove the previous HTML report: {e}\n"));
                    summary.failure = Some(e.to_string());
                }
            }
        }
    } else {
        match render::render(&captured.stdout_text, meta.markdown_enabled, root).report {
            Some(Ok(path)) => {
                output::progress(&format!(
                    "Note: An HTML file named \"{}\" is generated for you to test styles\n",
                    path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
                ));
                summary.report = Some(path);
            }
            Some(Err(e)) => {
                output::failure(&format!("Could not generate the HTML report: {e}\n"));
                summary.failure = Some(e.to_string());
            }
            None => {}
        }
    }

    output::progress("WeApp Errors: ");
    output::highlight(&format!("{}\n", summary.errors));

    if let Some(code) = summary.exit_code.filter(|c| *c != 0) {
        output::highlight(&format!("WeApp exited with status {code}"));
    }
    Ok(summary)
}

// ============================================================================
// package
// ============================================================================

/// Archive the project at `root` into `<project>.zip`.
pub fn package(root: &Path) -> CliResult<ExitCode> {
    let meta = load_meta(root)?;
    output::progress("Archiving the weapp...");

    let summary =
        archive::package(&meta, root).map_err(|e| CliError::failure(format!("Error archiving the weapp: {e}")))?;
    for dir in &summary.skipped_dirs {
        output::highlight(&format!("Ignoring folder for local testing: ./{dir}"));
    }

    output::progress(&format!(
        "Archiving completed! {} ({} entries)",
        summary.path.display(),
        summary.entries.len()
    ));
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// download-extra
// ============================================================================

/// Fetch the extended dataset into `data_home`. Failures are reported, not fatal.
pub fn download_extra(url: &str, data_home: &Path) -> CliResult<ExitCode> {
    output::progress("Downloading extended data, please wait...");
    match extras::download_extra(url, data_home) {
        Ok(home) => {
            output::progress(&format!("Successfully updated extended data in {}!", home.display()));
        }
        Err(e) => {
            tracing::debug!(error = ?e, "download-extra failed");
            output::failure("Failed to download extended data, please try again!");
            output::failure(&e.to_string());
        }
    }
    Ok(ExitCode::SUCCESS)
}
