//! Tool-wide settings resolved from the environment.

use std::path::PathBuf;

use weapp_core::conventions::{EXTENDED_DATA_DIR, EXTENDED_DATA_FILE};

/// Overrides the data home directory.
pub const HOME_ENV: &str = "WEAPP_HOME";

/// Default `test` timeout in seconds (overridable via `--timeout` / `WEAPP_TEST_TIMEOUT`).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where `download-extra` fetches the extended dataset from.
pub const DEFAULT_EXTRA_URL: &str = "http://wegene-upload-prod.oss-cn-hangzhou.aliyuncs.com/sample_data/extended_data.zip";

const APP_DIR: &str = "weapp-cli";

/// Directory holding downloaded data (`$WEAPP_HOME`, else the platform data dir).
pub fn data_home() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{APP_DIR}")))
}

/// `extended_data/` inside a data home.
pub fn extended_data_dir(home: &std::path::Path) -> PathBuf {
    home.join(EXTENDED_DATA_DIR)
}

/// The override dataset file inside a data home.
pub fn extended_data_file(home: &std::path::Path) -> PathBuf {
    extended_data_dir(home).join(EXTENDED_DATA_FILE)
}
