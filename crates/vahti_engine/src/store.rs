use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use vahti_core::{PageSnapshot, StoredSnapshot};
use vahti_logging::{vahti_debug, vahti_warn};

const FINGERPRINT_FILE: &str = "last_hash.txt";
const TEXT_FILE: &str = "last_text.txt";
const LISTINGS_FILE: &str = "last_listings.txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state directory unusable: {0}")]
    StateDir(String),
    #[error("state write failed: {0}")]
    Io(#[from] io::Error),
}

/// On-disk state between runs: fingerprint, normalized text, and listing set
/// as three separately readable files in one directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the previous snapshot, treating anything unreadable as absent.
    ///
    /// The fingerprint file is the presence marker: if it is missing, empty,
    /// or unreadable the whole snapshot counts as absent and the run starts
    /// from a fresh baseline. Text and listings degrade to empty values on
    /// their own so a partially damaged directory still produces a usable
    /// snapshot.
    pub fn load(&self) -> Option<StoredSnapshot> {
        let fingerprint = match fs::read_to_string(self.dir.join(FINGERPRINT_FILE)) {
            Ok(content) => {
                let trimmed = content.trim().to_string();
                if trimmed.is_empty() {
                    vahti_warn!(
                        "stored fingerprint in {:?} is empty, starting from baseline",
                        self.dir
                    );
                    return None;
                }
                trimmed
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                vahti_debug!("no stored fingerprint in {:?}", self.dir);
                return None;
            }
            Err(err) => {
                vahti_warn!(
                    "could not read stored fingerprint from {:?}: {}",
                    self.dir,
                    err
                );
                return None;
            }
        };

        let text = match fs::read_to_string(self.dir.join(TEXT_FILE)) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    vahti_warn!("could not read stored text from {:?}: {}", self.dir, err);
                }
                String::new()
            }
        };

        let listings: BTreeSet<String> = match fs::read_to_string(self.dir.join(LISTINGS_FILE)) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    vahti_warn!(
                        "could not read stored listings from {:?}: {}",
                        self.dir,
                        err
                    );
                }
                BTreeSet::new()
            }
        };

        Some(StoredSnapshot {
            fingerprint,
            text,
            listings,
        })
    }

    /// Persists a snapshot. Each file is written atomically, and the
    /// fingerprint goes last: an interrupted save leaves the old fingerprint
    /// in place, so the next run re-detects the change instead of trusting
    /// half-written state.
    pub fn save(&self, snapshot: &PageSnapshot) -> Result<(), StoreError> {
        ensure_state_dir(&self.dir)?;

        let mut listing_lines = String::new();
        for url in &snapshot.listings {
            listing_lines.push_str(url);
            listing_lines.push('\n');
        }

        write_atomic(&self.dir, TEXT_FILE, &snapshot.text)?;
        write_atomic(&self.dir, LISTINGS_FILE, &listing_lines)?;
        write_atomic(&self.dir, FINGERPRINT_FILE, &snapshot.fingerprint)?;
        vahti_debug!("state saved to {:?}", self.dir);
        Ok(())
    }
}

fn ensure_state_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(StoreError::StateDir(format!(
                "{:?} exists but is not a directory",
                dir
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir)
        .map_err(|err| StoreError::StateDir(format!("could not create {:?}: {}", dir, err)))
}

/// Writes content to `dir/filename` through a temp file in the same
/// directory, so readers only ever see the old or the new content.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<(), StoreError> {
    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|err| StoreError::Io(err.error))?;
    Ok(())
}
