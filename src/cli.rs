use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};
use crate::logging::{self, LogFormat};

/// Tracks how a rules document evolves across dated snapshots.
#[derive(Debug, Parser)]
#[command(name = "rules-history", version, about, long_about = None)]
struct Cli {
    /// Directory holding latest.md and archived-versions/ (default: cwd)
    #[arg(long, global = true, value_name = "DIR", value_hint = ValueHint::DirPath)]
    root: Option<PathBuf>,

    /// Print the command report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Regenerate CHANGELOG.md from the current and archived snapshots
    Changelog {
        /// Print the changelog instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Build the versions table, optionally splicing it into README.md
    Versions {
        #[arg(long)]
        readme: bool,
    },
    /// Copy the current snapshot into README between the rules markers
    Readme {
        /// Print the updated README instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Estimate token counts for the current snapshot
    Tokens {
        /// Do not prepend the estimate to the token log
        #[arg(long)]
        no_log: bool,
    },
    /// Show resolved paths, config, and archive health
    Status,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if let Some(output) = &report.output {
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
    }
    for detail in &report.details {
        eprintln!("  {detail}");
    }
    for issue in &report.issues {
        eprintln!("  issue: {issue}");
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format.into());

    let root = cli.root.clone();
    let report = match cli.command.unwrap_or(Command::Changelog { stdout: false }) {
        Command::Changelog { stdout } => commands::changelog::run(&commands::changelog::ChangelogOptions {
            root,
            to_stdout: stdout,
        })?,
        Command::Versions { readme } => commands::versions::run(&commands::versions::VersionsOptions {
            root,
            update_readme: readme,
        })?,
        Command::Readme { stdout } => commands::readme::run(&commands::readme::ReadmeOptions {
            root,
            to_stdout: stdout,
        })?,
        Command::Tokens { no_log } => commands::tokens::run(&commands::tokens::TokensOptions {
            root,
            skip_log: no_log,
        })?,
        Command::Status => commands::status::run(&commands::status::StatusOptions { root })?,
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
