//! Execution harness: run a weapp against its fixture and capture what it prints
//!
//! The fixture file is streamed into the interpreter the same way a shell pipeline would
//! (`cat data/data.json | python3 main.py`), using the `(platform, language)` strategy table
//! from `weapp_core`. Both output streams are drained on their own threads while the children
//! are polled, so a chatty weapp can't fill a pipe buffer and stall.
//!
//! ## Notes
//! - The interpreter's exit code is recorded but a non-zero code is not an error; whatever it
//!   printed is still shown to the user.
//! - One deadline covers both the children and the output readers. A weapp that exits but leaves
//!   a background process holding its stdout or stderr open still times out.
//! - When the deadline passes both children are killed and reaped. The reader threads are then
//!   left to finish on their own, since a grandchild may still hold the pipes open.

mod pipeline;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use encoding_rs::Encoding;
use thiserror::Error;
use weapp_core::lang::languages::{self, LanguageId};
use weapp_core::lang::platforms::{self, PlatformId};
use weapp_core::lang::runtimes;

use crate::meta::ProjectMeta;
use pipeline::{Deadline, Pipeline};

/// Default wall-clock limit for one `test` run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no runtime is defined for {language} on {platform}")]
    Unsupported { platform: String, language: String },

    #[error("fixture not found: {}", .0.display())]
    MissingFixture(PathBuf),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect the fixture stream to the interpreter: {0}")]
    Wire(String),

    #[error("failed to wait for the weapp process: {0}")]
    Wait(#[source] io::Error),

    #[error("failed to read weapp {stream}: {source}")]
    Read {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("weapp {stream} is not valid {encoding}")]
    Decode { stream: &'static str, encoding: &'static str },

    #[error("weapp did not finish within {seconds}s and was killed")]
    Timeout { seconds: u64 },

    #[error("unknown output encoding `{0}`")]
    UnknownEncoding(String),
}

/// How to feed a fixture to a weapp: resolved from the strategy table, or built by hand.
#[derive(Debug, Clone)]
pub struct RuntimeSpec {
    stream: Vec<String>,
    interpreter: Vec<String>,
    encoding: &'static Encoding,
}

impl RuntimeSpec {
    /// Build a runtime from explicit command lines and a WHATWG encoding label.
    pub fn custom<S: Into<String>>(
        stream: impl IntoIterator<Item = S>,
        interpreter: impl IntoIterator<Item = S>,
        encoding: &str,
    ) -> Result<Self, HarnessError> {
        let encoding =
            Encoding::for_label(encoding.as_bytes()).ok_or_else(|| HarnessError::UnknownEncoding(encoding.to_string()))?;
        Ok(Self {
            stream: stream.into_iter().map(Into::into).collect(),
            interpreter: interpreter.into_iter().map(Into::into).collect(),
            encoding,
        })
    }

    /// Look up the strategy-table row for a platform/language pair.
    pub fn resolve(platform: PlatformId, language: LanguageId) -> Result<Self, HarnessError> {
        let info = runtimes::lookup(platform, language).ok_or_else(|| HarnessError::Unsupported {
            platform: platforms::as_str(platform).to_string(),
            language: languages::as_str(language).to_string(),
        })?;
        Self::custom(info.stream.iter().copied(), info.interpreter.iter().copied(), info.encoding)
    }

    /// Runtime for `language` on the host platform.
    pub fn for_host(language: LanguageId) -> Result<Self, HarnessError> {
        let platform = platforms::current().ok_or_else(|| HarnessError::Unsupported {
            platform: std::env::consts::OS.to_string(),
            language: languages::as_str(language).to_string(),
        })?;
        Self::resolve(platform, language)
    }

    pub fn interpreter(&self) -> &[String] {
        &self.interpreter
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    fn decode(&self, bytes: &[u8], stream: &'static str) -> Result<String, HarnessError> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or(HarnessError::Decode {
                stream,
                encoding: self.encoding.name(),
            })
    }
}

/// Output captured from one weapp run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_text: String,
    pub stderr_text: String,
    pub exit_code: Option<i32>,
}

/// Runs weapps under a deadline.
#[derive(Debug, Clone)]
pub struct ExecutionHarness {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for ExecutionHarness {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ExecutionHarness {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Run the project's declared runtime on the host platform.
    pub fn run(&self, meta: &ProjectMeta, root: &Path, fixture: &Path) -> Result<CapturedResult, HarnessError> {
        let runtime = RuntimeSpec::for_host(meta.language)?;
        self.run_with(&runtime, root, fixture)
    }

    /// Run an explicit runtime from `root`, streaming `fixture` into it.
    #[tracing::instrument(skip_all, fields(root = %root.display(), interpreter = ?runtime.interpreter))]
    pub fn run_with(&self, runtime: &RuntimeSpec, root: &Path, fixture: &Path) -> Result<CapturedResult, HarnessError> {
        let fixture_on_disk = if fixture.is_absolute() { fixture.to_path_buf() } else { root.join(fixture) };
        if !fixture_on_disk.is_file() {
            return Err(HarnessError::MissingFixture(fixture_on_disk));
        }

        let deadline = Deadline::after(self.timeout);
        let mut children = Pipeline::spawn(runtime, root, fixture)?;
        let (out, err) = children.take_outputs()?;
        let out = pipeline::drain(out);
        let err = pipeline::drain(err);

        let status = match children.wait(&deadline, self.poll_interval) {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(error = %e, "abandoning reader threads");
                return Err(e);
            }
        };
        let stdout = pipeline::collect(&out, "stdout", &deadline)?;
        let stderr = pipeline::collect(&err, "stderr", &deadline)?;
        tracing::debug!(
            exit_code = ?status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "weapp finished"
        );

        Ok(CapturedResult {
            stdout_text: runtime.decode(&stdout, "stdout")?,
            stderr_text: runtime.decode(&stderr, "stderr")?,
            stdout,
            stderr,
            exit_code: status.code(),
        })
    }
}
