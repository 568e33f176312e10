#![forbid(unsafe_code)]
//! weapp-cli: scaffold, test and package WeGene weapps
//!
//! A weapp is a small analysis script that reads a JSON genome document on stdin and prints
//! a report. This crate provides the tooling around that contract: fixture synthesis from a
//! bundled sample genome, a harness that runs the weapp the way the platform does, report
//! rendering, and packaging.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod archive;
pub mod cli;
pub mod config;
pub mod extras;
pub mod fixture;
pub mod genome;
pub mod harness;
pub mod meta;
pub mod render;
pub mod scaffold;
pub mod version;

pub use archive::{ArchiveError, ArchiveSummary};
pub use fixture::{Fixture, FixtureBuilder, FixtureFlags, FixtureReport, FixtureWarning};
pub use harness::{CapturedResult, ExecutionHarness, HarnessError, RuntimeSpec};
pub use meta::ProjectMeta;
pub use render::{RenderError, Rendered};
pub use scaffold::ProjectGenerator;
