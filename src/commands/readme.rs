use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::history::config::load_config;
use crate::history::inject::{LEGACY_LATEST_HEADING, inject_rules};
use crate::history::paths::resolve_paths;
use crate::history::source::read_current;
use crate::history::util::write_atomic;

#[derive(Debug, Clone, Default)]
pub struct ReadmeOptions {
    pub root: Option<PathBuf>,
    pub to_stdout: bool,
}

pub fn run(opts: &ReadmeOptions) -> Result<CommandReport> {
    let paths = resolve_paths(opts.root.as_deref())?;
    let cfg = load_config(&paths.root)?.config;
    let mut report = CommandReport::new("readme");

    let (latest, _) = read_current(&paths.latest_file)?;
    let readme = fs::read_to_string(&paths.readme_file)
        .with_context(|| format!("failed to read {}", paths.readme_file.display()))?;
    let injected = inject_rules(
        &readme,
        &latest,
        &cfg.readme.start_marker,
        &cfg.readme.end_marker,
    )?;

    if injected.removed_legacy {
        report.detail(format!("removed legacy section `{LEGACY_LATEST_HEADING}`"));
    }

    if opts.to_stdout {
        report.output(injected.text);
        return Ok(report);
    }

    write_atomic(&paths.readme_file, &injected.text)?;
    tracing::info!(
        path = %paths.readme_file.display(),
        bytes = injected.text.len(),
        "rules content injected"
    );
    report.detail(format!("readme_file={}", paths.readme_file.display()));
    Ok(report)
}
