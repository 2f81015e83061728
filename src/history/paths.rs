use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const LATEST_FILE_NAME: &str = "latest.md";
pub const ARCHIVE_DIR_NAME: &str = "archived-versions";
pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";
pub const README_FILE_NAME: &str = "README.md";
pub const TOKEN_LOG_FILE_NAME: &str = "token-est.md";

#[derive(Debug, Clone)]
pub struct HistoryPaths {
    pub root: PathBuf,
    pub latest_file: PathBuf,
    pub archive_dir: PathBuf,
    pub changelog_file: PathBuf,
    pub readme_file: PathBuf,
    pub token_log: PathBuf,
}

fn env_or_default_path(
    lookup: &impl Fn(&str) -> Option<String>,
    root: &Path,
    var: &str,
    fallback: &str,
) -> PathBuf {
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => root.join(v.trim()),
        _ => root.join(fallback),
    }
}

fn resolve_root(
    root_override: Option<&Path>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(root) = root_override {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = lookup("RULES_HISTORY_ROOT") {
        let trimmed = root.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    env::current_dir().context("failed to resolve current directory")
}

pub fn resolve_paths_with(
    root_override: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<HistoryPaths> {
    let root = resolve_root(root_override, &lookup)?;

    let latest_file =
        env_or_default_path(&lookup, &root, "RULES_HISTORY_LATEST_FILE", LATEST_FILE_NAME);
    let archive_dir =
        env_or_default_path(&lookup, &root, "RULES_HISTORY_ARCHIVE_DIR", ARCHIVE_DIR_NAME);
    let changelog_file = env_or_default_path(
        &lookup,
        &root,
        "RULES_HISTORY_CHANGELOG_FILE",
        CHANGELOG_FILE_NAME,
    );
    let readme_file =
        env_or_default_path(&lookup, &root, "RULES_HISTORY_README_FILE", README_FILE_NAME);
    let token_log =
        env_or_default_path(&lookup, &root, "RULES_HISTORY_TOKEN_LOG", TOKEN_LOG_FILE_NAME);

    Ok(HistoryPaths {
        root,
        latest_file,
        archive_dir,
        changelog_file,
        readme_file,
        token_log,
    })
}

pub fn resolve_paths(root_override: Option<&Path>) -> Result<HistoryPaths> {
    resolve_paths_with(root_override, |var| env::var(var).ok())
}

/// `/` separated link from the root, e.g. `archived-versions/030825.md`.
pub fn relative_link(root: &Path, path: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        return path.display().to_string();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
