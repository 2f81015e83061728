pub mod changelog;
pub mod readme;
pub mod status;
pub mod tokens;
pub mod versions;

use serde::Serialize;

use crate::history::chain::SkippedSnapshot;
use crate::history::warn;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
    /// Primary output printed to stdout, e.g. a rendered table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
            output: None,
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    /// Skipped snapshots are warnings: logged and listed, never failures.
    pub fn skipped(&mut self, stage: &str, skipped: &SkippedSnapshot) {
        warn::skipped(stage, skipped);
        self.detail(format!("skipped {}: {}", skipped.name, skipped.reason));
    }

    pub fn output(&mut self, text: impl Into<String>) {
        self.output = Some(text.into());
    }
}
