use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const OLDER: &str = "# Agent Rules\n\n## Usage\nRun it.\n\n## Setup\nInstall.\n";
const NEWER: &str =
    "# Agent Rules\n\n## Setup\nInstall the toolchain and configure the workspace.\n\n## Workflow\nPlan, then build.\n";

fn history_cmd(root: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rules-history");
    cmd.current_dir(root)
        .env("RULES_HISTORY_CONFIG", "no-config.toml")
        .env("RULES_HISTORY_FOOTER", "off")
        .env_remove("RULES_HISTORY_ROOT")
        .env_remove("RULES_HISTORY_LATEST_FILE")
        .env_remove("RULES_HISTORY_ARCHIVE_DIR")
        .env_remove("RULES_HISTORY_CHANGELOG_FILE")
        .env_remove("RULES_HISTORY_DATE_STYLE")
        .env_remove("RULES_HISTORY_HEADING")
        .env_remove("RULES_HISTORY_TIMEZONE")
        .env_remove("RUST_LOG");
    cmd
}

fn seed(root: &Path) {
    let archive = root.join("archived-versions");
    fs::create_dir_all(&archive).expect("mkdir archive");
    fs::write(root.join("latest.md"), NEWER).expect("write latest");
    fs::write(archive.join("010725.md"), OLDER).expect("write older");
    fs::write(archive.join("030825.md"), NEWER).expect("write newer");
}

#[test]
fn changelog_is_written_with_both_archived_versions() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());

    history_cmd(tmp.path()).arg("changelog").assert().success();

    let text = fs::read_to_string(tmp.path().join("CHANGELOG.md")).expect("changelog");
    assert!(text.starts_with("# Rules Changelog\n"));
    assert!(text.contains("## [Latest] - Current"));
    assert!(text.contains("- **Title**: Agent Rules"));
    assert!(text.contains("## [030825] - August 3, 2025\n\n### Updated\n"));
    assert!(text.contains("## [010725] - July 1, 2025"));
    assert!(text.contains("### Added\n- **Workflow**"));
    assert!(text.contains("### Enhanced\n- **Setup**"));
    assert!(text.contains("### Removed\n- **Usage**"));
    assert!(text.contains("| 010725 | July 1, 2025 |"));
    assert!(text.contains("1 added, 1 enhanced, 1 removed"));
    assert!(!text.contains("Last updated"));

    let newer_at = text.find("## [030825]").expect("newer entry");
    let older_at = text.find("## [010725]").expect("older entry");
    assert!(newer_at < older_at);
}

#[test]
fn changelog_is_the_default_command() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());

    history_cmd(tmp.path()).assert().success();
    assert!(tmp.path().join("CHANGELOG.md").is_file());
}

#[test]
fn invalid_archive_names_are_skipped_with_a_warning() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());
    fs::write(
        tmp.path().join("archived-versions/badname.md"),
        "## Bogus\nnope\n",
    )
    .expect("write badname");

    history_cmd(tmp.path())
        .arg("changelog")
        .assert()
        .success()
        .stderr(predicate::str::contains("snapshot skipped"))
        .stderr(predicate::str::contains("skipped badname"));

    let text = fs::read_to_string(tmp.path().join("CHANGELOG.md")).expect("changelog");
    assert!(text.contains("## [030825]"));
    assert!(text.contains("## [010725]"));
    assert!(!text.contains("badname"));
    assert!(!text.contains("Bogus"));
}

#[test]
fn missing_current_snapshot_fails_without_writing() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());
    fs::remove_file(tmp.path().join("latest.md")).expect("remove latest");

    history_cmd(tmp.path())
        .arg("changelog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("current snapshot not found"));
    assert!(!tmp.path().join("CHANGELOG.md").exists());
}

#[test]
fn failed_run_leaves_an_existing_changelog_untouched() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());
    fs::write(tmp.path().join("CHANGELOG.md"), "previous\n").expect("write old changelog");
    fs::remove_dir_all(tmp.path().join("archived-versions")).expect("remove archive");

    history_cmd(tmp.path())
        .arg("changelog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("archive directory not found"));

    let text = fs::read_to_string(tmp.path().join("CHANGELOG.md")).expect("changelog");
    assert_eq!(text, "previous\n");
}

#[test]
fn stdout_mode_prints_instead_of_writing() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());

    history_cmd(tmp.path())
        .args(["changelog", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Version Comparison Summary"));
    assert!(!tmp.path().join("CHANGELOG.md").exists());
}

#[test]
fn root_flag_and_footer_timezone() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("rules");
    fs::create_dir_all(&root).expect("mkdir root");
    seed(&root);

    history_cmd(tmp.path())
        .env("RULES_HISTORY_FOOTER", "on")
        .env("RULES_HISTORY_DATE_STYLE", "short")
        .arg("--root")
        .arg(&root)
        .arg("changelog")
        .assert()
        .success();

    let text = fs::read_to_string(root.join("CHANGELOG.md")).expect("changelog");
    assert!(text.contains("## [030825] - 03/08/2025"));
    assert!(text.contains("Last updated: "));
    assert!(text.trim_end().ends_with("UTC*"));
}

#[test]
fn json_report_lists_archived_versions() {
    let tmp = tempdir().expect("tempdir");
    seed(tmp.path());

    let out = history_cmd(tmp.path())
        .args(["--json", "changelog", "--stdout"])
        .output()
        .expect("run");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");
    assert_eq!(report["command"], "changelog");
    assert_eq!(report["ok"], true);
    let details = report["details"].as_array().expect("details");
    assert!(details.iter().any(|d| d == "archived_versions=2"));
    let expected_stats = format!("latest_stats=8 lines, 17 words, 2 sections, {} B", NEWER.len());
    assert!(details.iter().any(|d| d == expected_stats.as_str()));
    assert!(report["output"].as_str().expect("output").starts_with("# Rules Changelog"));
}
