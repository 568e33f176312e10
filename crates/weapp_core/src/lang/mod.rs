//! Registry-first vocabularies used by `weapp-cli`.
//!
//! - [`languages`]: supported weapp runtime languages.
//! - [`platforms`]: host operating systems the test harness knows how to drive.
//! - [`runtimes`]: the `(platform, language)` strategy table.
//! - [`toggles`]: accepted spellings for yes/no flags across historical config encodings.

pub mod languages;
pub mod platforms;
pub mod registry;
pub mod runtimes;
pub mod toggles;
