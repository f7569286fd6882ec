//! Game scanner - recursive discovery of game files for a platform

use crate::platform::Platform;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Could not read the games folder {}: {source}", .path.display())]
    GamesFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A game file, relative to its platform's games folder
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Game {
    relative_path: PathBuf,
}

impl Game {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path.display())
    }
}

/// Walk the platform's games folder and collect every file whose suffix is
/// in the platform's extension list.
///
/// Entries are visited in file-name order. Unreadable entries below the
/// folder are skipped; only an unreadable folder itself is an error.
pub fn scan(platform: &Platform) -> Result<Vec<Game>, ScanError> {
    let root = &platform.games_folder;
    check_root(root)?;

    log::info!("Scanning games folder: {}", root.display());

    let mut games = Vec::new();
    let mut skipped = 0usize;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry: {}", e);
                skipped += 1;
                continue;
            }
        };

        if !is_file(&entry) {
            continue;
        }

        let Some(suffix) = file_suffix(entry.file_name()) else {
            continue;
        };
        if !platform.accepts_suffix(&suffix) {
            continue;
        }

        match entry.path().strip_prefix(root) {
            Ok(relative) => games.push(Game::new(relative)),
            Err(_) => log::debug!("Skipping entry outside games folder: {}", entry.path().display()),
        }
    }

    log::info!(
        "Scan of '{}' complete: {} games ({} entries skipped)",
        platform.name,
        games.len(),
        skipped
    );

    Ok(games)
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let fail = |source: io::Error| ScanError::GamesFolder {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(fail)?;
    if !metadata.is_dir() {
        return Err(fail(io::Error::other("not a directory")));
    }
    // Listing permission is only checked by actually listing
    fs::read_dir(root).map_err(fail)?;
    Ok(())
}

/// Regular files, and symlinks pointing at regular files
fn is_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false)
}

/// Suffix of a file name including its dot: `game.sfc` -> `.sfc`.
///
/// Leading dots don't start a suffix, so `.hidden` has none. Names that
/// aren't valid UTF-8 are read lossily, so their suffix can still match.
pub fn file_suffix(name: &OsStr) -> Option<Cow<'_, str>> {
    match name.to_string_lossy() {
        Cow::Borrowed(name) => suffix_of(name).map(Cow::Borrowed),
        Cow::Owned(name) => suffix_of(&name).map(|suffix| Cow::Owned(suffix.to_owned())),
    }
}

fn suffix_of(name: &str) -> Option<&str> {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    let dot = name[stem_start..].rfind('.')?;
    Some(&name[stem_start + dot..])
}
