use std::collections::BTreeSet;
use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// `rules-history` -> `RULES_HISTORY_`
fn env_prefix(package: &str) -> String {
    let mut prefix: String = package
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_uppercase() } else { '_' })
        .collect();
    prefix.push('_');
    prefix
}

fn source_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// String literals naming an override, e.g. `"RULES_HISTORY_ROOT"`.
/// Only whole literals count, so prose mentioning a prefix is skipped.
fn quoted_keys<'a>(source: &'a str, prefix: &'a str) -> impl Iterator<Item = &'a str> {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .flat_map(|line| line.split('"').skip(1).step_by(2))
        .filter(move |literal| {
            literal.len() > prefix.len()
                && literal.starts_with(prefix)
                && literal
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
        })
}

fn main() -> Result<(), Box<dyn Error>> {
    let package = env::var("CARGO_PKG_NAME")?;
    let prefix = env_prefix(&package);

    let mut keys = BTreeSet::new();
    for file in source_files(Path::new("src"))? {
        let source = fs::read_to_string(&file)?;
        keys.extend(quoted_keys(&source, &prefix).map(str::to_owned));
    }

    let mut generated = String::from("pub const GENERATED_ENV_ALLOWLIST: &[&str] = &[\n");
    for key in &keys {
        generated.push_str(&format!("    {key:?},\n"));
    }
    generated.push_str("];\n");
    fs::write(
        Path::new(&env::var("OUT_DIR")?).join("env_allowlist.rs"),
        generated,
    )?;

    let built_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!(
        "cargo:rustc-env=HISTORY_BUILD_ID={}+{built_at}",
        env::var("CARGO_PKG_VERSION")?
    );
    println!("cargo:rerun-if-changed=src");
    Ok(())
}
