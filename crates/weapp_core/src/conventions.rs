//! Well-known names inside a weapp project and the tool's data home.
//!
//! Every component that reads or writes one of these paths goes through these constants so that
//! scaffolding, fixture generation, the test harness, and packaging agree on the layout.

/// Project metadata record, written once by `init`.
pub const META_FILE: &str = ".weapp";

/// Local test-data directory (holds the fixture).
pub const DATA_DIR: &str = "data";

/// Generated fixture file name, stored under [`DATA_DIR`].
pub const FIXTURE_FILE: &str = "data.json";

/// Reference-index directory copied into every project.
pub const INDEX_DIR: &str = "indexes";

/// Optional extended/override dataset directory.
pub const EXTENDED_DATA_DIR: &str = "extended_data";

/// Override dataset file name, stored under [`EXTENDED_DATA_DIR`].
pub const EXTENDED_DATA_FILE: &str = "extended_data.dat";

/// HTML report template written by `init` when markdown output is enabled.
pub const REPORT_TEMPLATE_FILE: &str = "html_template.html";

/// Rendered report written by `test` when markdown output is enabled.
pub const REPORT_FILE: &str = "test_result.html";

/// Placeholder token substituted with the rendered output inside the report template.
pub const RESULTS_PLACEHOLDER: &str = "{{RESULTS}}";

/// Archive extension used by `package`.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Raw genome array format of the bundled sample genome.
pub const DEFAULT_ARRAY_FORMAT: &str = "wegene_affy_2";

/// Default project name offered by `init`.
pub const DEFAULT_PROJECT_NAME: &str = "weapp-project";

/// Text shown in place of an empty output section.
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "None";

/// Directories that only exist for local testing and never ship in a package.
pub const LOCAL_ONLY_DIRS: &[&str] = &[DATA_DIR, INDEX_DIR, EXTENDED_DATA_DIR];

/// File names that never ship in a package (the archive itself is excluded separately).
pub const LOCAL_ONLY_FILES: &[&str] = &[META_FILE, FIXTURE_FILE, REPORT_TEMPLATE_FILE, REPORT_FILE];

/// Return the archive file name for a project.
///
/// ## Examples
/// ```rust
/// use weapp_core::conventions::archive_name;
///
/// assert_eq!(archive_name("my-app"), "my-app.zip");
/// ```
pub fn archive_name(project: &str) -> String {
    format!("{project}.{ARCHIVE_EXTENSION}")
}

/// Return the index file name for a raw genome array format.
///
/// ## Examples
/// ```rust
/// use weapp_core::conventions::index_file_name;
///
/// assert_eq!(index_file_name("wegene_affy_2"), "index_wegene_affy_2.idx");
/// ```
pub fn index_file_name(format: &str) -> String {
    format!("index_{format}.idx")
}

/// Whether `name` can be used as a project (and folder) name.
///
/// The name must be a single path component: not empty, not `.` or `..`, and free of `/`, `\`
/// and NUL.
///
/// ## Examples
/// ```rust
/// use weapp_core::conventions::is_valid_project_name;
///
/// assert!(is_valid_project_name("my-app"));
/// assert!(!is_valid_project_name("../my-app"));
/// ```
pub fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
