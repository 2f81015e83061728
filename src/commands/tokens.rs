use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::history::paths::{relative_link, resolve_paths};
use crate::history::source::read_current;
use crate::history::tokens::{estimate_tokens, group_thousands, prepend_token_entry, render_token_entry};
use crate::history::util::write_atomic;

#[derive(Debug, Clone, Default)]
pub struct TokensOptions {
    pub root: Option<PathBuf>,
    pub skip_log: bool,
}

pub fn run(opts: &TokensOptions) -> Result<CommandReport> {
    let paths = resolve_paths(opts.root.as_deref())?;
    let mut report = CommandReport::new("tokens");

    let (text, _) = read_current(&paths.latest_file)?;
    let estimate = estimate_tokens(&text);
    let label = relative_link(&paths.root, &paths.latest_file);

    report.output(format!(
        "Word Count: {}\nCharacter Count: {}\n\nToken Estimates:\n  Word-based: ~{} tokens\n  Character-based: ~{} tokens\n  Subword-based: ~{} tokens\n  Average: ~{} tokens\n",
        group_thousands(estimate.word_count),
        group_thousands(estimate.character_count),
        group_thousands(estimate.word_based),
        group_thousands(estimate.character_based),
        group_thousands(estimate.subword_based),
        group_thousands(estimate.average),
    ));
    report.detail(format!("average_tokens={}", estimate.average));

    if opts.skip_log {
        return Ok(report);
    }

    let existing = if paths.token_log.exists() {
        Some(
            fs::read_to_string(&paths.token_log)
                .with_context(|| format!("failed to read {}", paths.token_log.display()))?,
        )
    } else {
        None
    };
    let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let entry = render_token_entry(&estimate, &label, &stamp);
    let updated = prepend_token_entry(existing.as_deref(), &entry, &label);
    write_atomic(&paths.token_log, &updated)?;
    tracing::info!(path = %paths.token_log.display(), average = estimate.average, "token estimate logged");
    report.detail(format!("token_log={}", paths.token_log.display()));

    Ok(report)
}
