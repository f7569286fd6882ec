//! Session state
//!
//! A [`Session`] is the loaded configuration; a [`Selection`] is one resolved
//! platform with its games. Both are immutable: reloading builds a new
//! session and picking a platform builds a new selection, so nothing from a
//! previous config can leak into the next one.

use crate::config::ConfigStore;
use crate::error::Error;
use crate::launcher::{self, LaunchError, LaunchOutcome, ProcessLauncher};
use crate::platform::Platform;
use crate::scanner::{self, Game};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Session {
    config_path: PathBuf,
    config: ConfigStore,
    platforms: Vec<String>,
}

impl Session {
    /// Read `path` into a new session
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let config_path = path.into();
        let config = ConfigStore::load(&config_path)?;
        let platforms = config.sections();
        Ok(Self {
            config_path,
            config,
            platforms,
        })
    }

    /// Read the same file again. The current session is left untouched.
    pub fn reload(&self) -> Result<Self, Error> {
        log::info!("Reloading {}", self.config_path.display());
        Self::load(self.config_path.clone())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Platform names in file order
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    pub fn resolve(&self, name: &str) -> Result<Platform, Error> {
        Ok(Platform::resolve(&self.config, name)?)
    }

    /// Resolve `name` and scan its games folder
    pub fn select(&self, name: &str) -> Result<Selection, Error> {
        let platform = self.resolve(name)?;
        let games = scanner::scan(&platform)?;
        Ok(Selection { platform, games })
    }
}

/// A platform together with the games found for it
#[derive(Debug, Clone)]
pub struct Selection {
    platform: Platform,
    games: Vec<Game>,
}

impl Selection {
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Launch the game at `index` in [`games`](Self::games) with this
    /// selection's platform. Blocks until the emulator exits.
    pub fn launch(&self, index: usize, runner: &dyn ProcessLauncher) -> LaunchOutcome {
        let game = self.games.get(index).ok_or(LaunchError::NoSuchGame {
            index,
            count: self.games.len(),
        })?;
        log::info!("Launching '{}' on {}", game, self.platform.name);
        launcher::launch(&self.platform, game, runner)
    }
}
