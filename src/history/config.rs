use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::history::chain::DateStyle;
use crate::history::inject::{DEFAULT_RULES_END_MARKER, DEFAULT_RULES_START_MARKER};
use crate::history::versions::{DEFAULT_END_MARKER, DEFAULT_START_MARKER};

pub const CONFIG_FILE_NAME: &str = "rules-history.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChangelogConfig {
    pub heading: String,
    pub intro: String,
    pub date_style: DateStyle,
    /// IANA zone used for the footer timestamp.
    pub timezone: String,
    pub footer: bool,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            heading: "Rules Changelog".to_string(),
            intro: "This changelog documents the evolution of the rules document, \
generated by comparing archived snapshots."
                .to_string(),
            date_style: DateStyle::Long,
            timezone: "UTC".to_string(),
            footer: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionsConfig {
    pub start_marker: String,
    pub end_marker: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// Markers around the full rules text in README.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadmeConfig {
    pub start_marker: String,
    pub end_marker: String,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            start_marker: DEFAULT_RULES_START_MARKER.to_string(),
            end_marker: DEFAULT_RULES_END_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryConfig {
    pub changelog: ChangelogConfig,
    pub versions: VersionsConfig,
    pub readme: ReadmeConfig,
}

impl HistoryConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.changelog.timezone.trim().parse::<Tz>().map_err(|_| {
            HistoryError::InvalidConfig(format!(
                "unknown timezone `{}`",
                self.changelog.timezone
            ))
            .into()
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialHistoryConfig {
    changelog: Option<ChangelogConfig>,
    versions: Option<VersionsConfig>,
    readme: Option<ReadmeConfig>,
}

fn env_or_string(lookup: &impl Fn(&str) -> Option<String>, var: &str, fallback: &str) -> String {
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_bool(lookup: &impl Fn(&str) -> Option<String>, var: &str, fallback: bool) -> bool {
    match lookup(var) {
        Some(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        None => fallback,
    }
}

fn env_or_date_style(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    fallback: DateStyle,
) -> Result<DateStyle> {
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => DateStyle::parse(&v)
            .ok_or_else(|| {
                HistoryError::InvalidConfig(format!(
                    "invalid {var} `{}`: use `long` or `short`",
                    v.trim()
                ))
                .into()
            }),
        _ => Ok(fallback),
    }
}

fn validate(cfg: &HistoryConfig) -> Result<()> {
    if cfg.changelog.heading.trim().is_empty() {
        return Err(HistoryError::InvalidConfig("changelog heading cannot be empty".into()).into());
    }
    cfg.timezone()?;
    validate_markers("versions", &cfg.versions.start_marker, &cfg.versions.end_marker)?;
    validate_markers("readme", &cfg.readme.start_marker, &cfg.readme.end_marker)
}

fn validate_markers(section: &str, start: &str, end: &str) -> Result<()> {
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err(HistoryError::InvalidConfig(format!("{section} markers cannot be empty")).into());
    }
    if start == end {
        return Err(HistoryError::InvalidConfig(format!(
            "{section} start and end markers must differ"
        ))
        .into());
    }
    Ok(())
}

fn resolve_config_path(root: &Path, lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(custom) = lookup("RULES_HISTORY_CONFIG") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(root.join(trimmed));
        }
    }

    let local = root.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("rules-history").join("config.toml"))
}

fn merge_file_config(base: &mut HistoryConfig, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path).map_err(|err| {
        HistoryError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
    })?;
    let parsed: PartialHistoryConfig = toml::from_str(&raw).map_err(|err| {
        HistoryError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(changelog) = parsed.changelog {
        base.changelog = changelog;
    }
    if let Some(versions) = parsed.versions {
        base.versions = versions;
    }
    if let Some(readme) = parsed.readme {
        base.readme = readme;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: HistoryConfig,
    pub source: Option<PathBuf>,
}

pub fn load_config_with(
    root: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig> {
    let mut cfg = HistoryConfig::default();
    let path = resolve_config_path(root, &lookup);
    let mut source = None;
    if let Some(path) = path {
        merge_file_config(&mut cfg, &path)?;
        if path.exists() {
            source = Some(path);
        }
    }

    cfg.changelog.heading = env_or_string(&lookup, "RULES_HISTORY_HEADING", &cfg.changelog.heading);
    cfg.changelog.date_style =
        env_or_date_style(&lookup, "RULES_HISTORY_DATE_STYLE", cfg.changelog.date_style)?;
    cfg.changelog.timezone =
        env_or_string(&lookup, "RULES_HISTORY_TIMEZONE", &cfg.changelog.timezone);
    cfg.changelog.footer = env_or_bool(&lookup, "RULES_HISTORY_FOOTER", cfg.changelog.footer);
    cfg.readme.start_marker = env_or_string(
        &lookup,
        "RULES_HISTORY_README_START_MARKER",
        &cfg.readme.start_marker,
    );
    cfg.readme.end_marker =
        env_or_string(&lookup, "RULES_HISTORY_README_END_MARKER", &cfg.readme.end_marker);

    validate(&cfg)?;
    Ok(LoadedConfig {
        config: cfg,
        source,
    })
}

pub fn load_config(root: &Path) -> Result<LoadedConfig> {
    load_config_with(root, |var| env::var(var).ok())
}
