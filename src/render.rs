//! Result rendering
//!
//! Plain mode shows what the weapp printed. Markdown mode also converts it (CommonMark with
//! tables) to HTML, drops the fragment into the project's report template and writes
//! `test_result.html`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Options, Parser, html};
use thiserror::Error;
use weapp_core::conventions::{EMPTY_OUTPUT_PLACEHOLDER, REPORT_FILE, REPORT_TEMPLATE_FILE, RESULTS_PLACEHOLDER};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("report template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("failed to read report template {}: {source}", path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report {}: {source}", path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of rendering one run.
#[derive(Debug)]
pub struct Rendered {
    /// Text to echo on the console.
    pub display_text: String,
    /// `None` in plain mode; otherwise where the report went, or why it didn't.
    pub report: Option<Result<PathBuf, RenderError>>,
}

/// Convert Markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Replace every results token in `template` with `fragment`, verbatim.
pub fn fill_template(template: &str, fragment: &str) -> String {
    template.replace(RESULTS_PLACEHOLDER, fragment)
}

/// Text shown for an output section; empty sections read `None`.
pub fn section_or_placeholder(text: &str) -> &str {
    if text.is_empty() { EMPTY_OUTPUT_PLACEHOLDER } else { text }
}

/// Render decoded weapp output.
#[tracing::instrument(skip_all, fields(markdown = markdown_enabled))]
pub fn render(decoded: &str, markdown_enabled: bool, root: &Path) -> Rendered {
    let report = markdown_enabled.then(|| write_report(decoded, root));
    Rendered {
        display_text: decoded.to_string(),
        report,
    }
}

/// Delete a report left by an earlier run. Returns whether one was there.
pub fn clear_report(root: &Path) -> Result<bool, RenderError> {
    let report_path = root.join(REPORT_FILE);
    match fs::remove_file(&report_path) {
        Ok(()) => {
            tracing::debug!(path = %report_path.display(), "removed stale HTML report");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(RenderError::WriteReport {
            path: report_path,
            source,
        }),
    }
}

fn write_report(decoded: &str, root: &Path) -> Result<PathBuf, RenderError> {
    let template_path = root.join(REPORT_TEMPLATE_FILE);
    if !template_path.is_file() {
        return Err(RenderError::MissingTemplate(template_path));
    }
    let template = fs::read_to_string(&template_path).map_err(|source| RenderError::ReadTemplate {
        path: template_path.clone(),
        source,
    })?;

    let page = fill_template(&template, &markdown_to_html(decoded));
    let report_path = root.join(REPORT_FILE);
    fs::write(&report_path, page).map_err(|source| RenderError::WriteReport {
        path: report_path.clone(),
        source,
    })?;
    tracing::info!(path = %report_path.display(), "wrote HTML report");
    Ok(report_path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_extension_enabled() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_every_placeholder_replaced() {
        let page = fill_template("<p>{{RESULTS}}</p><div>{{RESULTS}}</div>", "<b>x</b>");
        assert_eq!(page, "<p><b>x</b></p><div><b>x</b></div>");
    }

    #[test]
    fn test_empty_section_placeholder() {
        assert_eq!(section_or_placeholder(""), "None");
        assert_eq!(section_or_placeholder("ok"), "ok");
    }

    #[test]
    fn test_plain_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let rendered = render("# hi", false, dir.path());
        assert_eq!(rendered.display_text, "# hi");
        assert!(rendered.report.is_none());
        assert!(!dir.path().join(REPORT_FILE).exists());
    }

    #[test]
    fn test_markdown_mode_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(REPORT_TEMPLATE_FILE), "<body>{{RESULTS}}</body>").unwrap();

        let rendered = render("# Result\n\nrisk: low", true, dir.path());

        let path = rendered.report.unwrap().unwrap();
        let page = fs::read_to_string(path).unwrap();
        assert!(page.contains("<h1>Result</h1>"));
        assert!(!page.contains(RESULTS_PLACEHOLDER));
        assert_eq!(rendered.display_text, "# Result\n\nrisk: low");
    }

    #[test]
    fn test_missing_template_keeps_display_text() {
        let dir = tempfile::tempdir().unwrap();
        let rendered = render("text", true, dir.path());
        assert_eq!(rendered.display_text, "text");
        assert!(matches!(rendered.report, Some(Err(RenderError::MissingTemplate(_)))));
        assert!(!dir.path().join(REPORT_FILE).exists());
    }

    #[test]
    fn test_clear_report_removes_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(REPORT_FILE), "<p>old</p>").unwrap();
        assert!(clear_report(dir.path()).unwrap());
        assert!(!dir.path().join(REPORT_FILE).exists());
        assert!(!clear_report(dir.path()).unwrap());
    }
}
