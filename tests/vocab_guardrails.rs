use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use weapp_core::conventions;
use weapp_core::lang::{languages, platforms};

/// Guardrail against reintroducing stringly-typed vocabulary checks.
///
/// Looks for patterns like `== "python3"` or `".weapp" =>` in Rust sources where callers are
/// expected to go through the `weapp_core` registries and conventions instead.
///
/// Notes:
/// - Occurrences in `crates/weapp_core/src/**` (the registries themselves) and in tests are allowed.
/// - This is a coarse net for "oops I added a string match", not a parser.
#[test]
fn no_new_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    let targets = [root.join("src"), root.join("crates")];
    for dir in targets {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed vocabulary checks. Prefer weapp_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn spellings() -> Vec<&'static str> {
    let mut set: BTreeSet<&'static str> = BTreeSet::new();

    for l in languages::LANGUAGES {
        set.insert(l.item.canonical);
        set.extend(l.item.aliases.iter().copied());
    }
    for p in platforms::PLATFORMS {
        set.insert(p.canonical);
        set.extend(p.aliases.iter().copied());
    }
    set.extend(conventions::LOCAL_ONLY_DIRS.iter().copied());
    set.extend(conventions::LOCAL_ONLY_FILES.iter().copied());

    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    // Registries define the spellings; allow them.
    if rel.starts_with("crates/weapp_core/src/") {
        return true;
    }
    rel.contains("/tests/") || rel.starts_with("tests/")
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    // Avoid false positives in comments/docstrings.
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }

    // - `... == "spelling"`
    // - `"spelling" => ...`
    for s in spellings {
        let eq = format!("== \"{s}\"");
        let arm = format!("\"{s}\" =>");
        if line.contains(&eq) || line.contains(&arm) {
            return true;
        }
    }

    false
}
