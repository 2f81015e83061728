use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::history::chain::SkippedSnapshot;

pub const ARCHIVE_EXTENSION: &str = ".md";

#[derive(Debug, Clone)]
pub struct ArchivedFile {
    pub file_name: String,
    /// File name without `.md`; a valid one is a `DDMMYY` identifier.
    pub stem: String,
    pub text: String,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct SnapshotSources {
    pub latest_path: PathBuf,
    pub latest_text: String,
    pub latest_bytes: u64,
    pub archive_dir: PathBuf,
    /// Sorted by file name.
    pub archived: Vec<ArchivedFile>,
    pub unreadable: Vec<SkippedSnapshot>,
}

impl SnapshotSources {
    /// `(stem, text)` pairs for the history engine.
    pub fn archived_pairs(&self) -> Vec<(String, String)> {
        self.archived
            .iter()
            .map(|file| (file.stem.clone(), file.text.clone()))
            .collect()
    }
}

fn read_lossy(path: &Path) -> std::io::Result<(String, u64)> {
    let raw = fs::read(path)?;
    let bytes = raw.len() as u64;
    Ok((String::from_utf8_lossy(&raw).into_owned(), bytes))
}

pub fn read_current(latest_path: &Path) -> Result<(String, u64), HistoryError> {
    if !latest_path.is_file() {
        return Err(HistoryError::MissingCurrentSnapshot(latest_path.to_path_buf()));
    }
    read_lossy(latest_path)
        .map_err(|_| HistoryError::MissingCurrentSnapshot(latest_path.to_path_buf()))
}

/// Reads every `.md` file in `archive_dir`. Other files are ignored; `.md`
/// files that cannot be read are reported in the second list.
pub fn read_archive(
    archive_dir: &Path,
) -> Result<(Vec<ArchivedFile>, Vec<SkippedSnapshot>), HistoryError> {
    let read_dir = fs::read_dir(archive_dir)
        .map_err(|_| HistoryError::MissingArchive(archive_dir.to_path_buf()))?;

    let mut archived = Vec::new();
    let mut unreadable = Vec::new();
    for entry in read_dir {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(stem) = file_name.strip_suffix(ARCHIVE_EXTENSION) else {
            continue;
        };

        match read_lossy(&path) {
            Ok((text, bytes)) => archived.push(ArchivedFile {
                file_name: file_name.to_string(),
                stem: stem.to_string(),
                text,
                bytes,
            }),
            Err(err) => unreadable.push(SkippedSnapshot {
                name: file_name.to_string(),
                code: "W001_UNREADABLE",
                reason: format!("failed to read {}: {err}", path.display()),
            }),
        }
    }

    archived.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok((archived, unreadable))
}

/// Loads the current document and the archive. Both are required; nothing is
/// returned unless both could be read.
pub fn load_sources(latest_path: &Path, archive_dir: &Path) -> Result<SnapshotSources, HistoryError> {
    let (latest_text, latest_bytes) = read_current(latest_path)?;
    let (archived, unreadable) = read_archive(archive_dir)?;

    Ok(SnapshotSources {
        latest_path: latest_path.to_path_buf(),
        latest_text,
        latest_bytes,
        archive_dir: archive_dir.to_path_buf(),
        archived,
        unreadable,
    })
}
