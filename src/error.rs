//! Crate-wide error type
//!
//! Every failure the front-end can show the user funnels into [`Error`].
//! [`ErrorKind`] is the closed classification the UI matches on.

use crate::config::ConfigError;
use crate::launcher::LaunchError;
use crate::platform::{OptionKind, ResolveError};
use crate::scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigMissing,
    ConfigEmpty,
    ConfigInvalid,
    UnknownPlatform,
    MissingOption(OptionKind),
    GamesFolderUnreadable,
    LaunchFailure,
    UnexpectedFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(ConfigError::Missing(_)) => ErrorKind::ConfigMissing,
            Error::Config(ConfigError::Empty(_)) => ErrorKind::ConfigEmpty,
            Error::Config(ConfigError::Read { .. } | ConfigError::Syntax { .. }) => {
                ErrorKind::ConfigInvalid
            }
            Error::Resolve(ResolveError::UnknownPlatform(_)) => ErrorKind::UnknownPlatform,
            Error::Resolve(ResolveError::MissingOption(kind)) => ErrorKind::MissingOption(*kind),
            Error::Scan(ScanError::GamesFolder { .. }) => ErrorKind::GamesFolderUnreadable,
            Error::Launch(LaunchError::Failed { .. }) => ErrorKind::LaunchFailure,
            Error::Launch(LaunchError::Spawn { .. } | LaunchError::NoSuchGame { .. }) => {
                ErrorKind::UnexpectedFailure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn kinds() {
        let missing: Error = ConfigError::Missing(PathBuf::from("config.ini")).into();
        assert_eq!(missing.kind(), ErrorKind::ConfigMissing);
        assert_eq!(missing.to_string(), "Your config.ini file is missing.");

        let empty: Error = ConfigError::Empty(PathBuf::from("/home/me/jgemu/config.ini")).into();
        assert_eq!(empty.kind(), ErrorKind::ConfigEmpty);
        assert_eq!(empty.to_string(), "Your config.ini file is empty.");

        let other: Error = ConfigError::Missing(PathBuf::from("setups/arcade.ini")).into();
        assert_eq!(other.to_string(), "Your arcade.ini file is missing.");

        let option: Error = ResolveError::MissingOption(OptionKind::Executable).into();
        assert_eq!(option.kind(), ErrorKind::MissingOption(OptionKind::Executable));
        assert_eq!(
            option.to_string(),
            "The selected platform is missing the 'executable' option."
        );

        let failed: Error = LaunchError::Failed {
            exit_code: Some(1),
            stderr: "bad rom".into(),
            stdout: String::new(),
        }
        .into();
        assert_eq!(failed.kind(), ErrorKind::LaunchFailure);
        assert_eq!(
            failed.to_string(),
            "Failed to launch emulator:\nSTDERR: bad rom\nSTDOUT: "
        );

        let nothing: Error = LaunchError::NoSuchGame { index: 3, count: 2 }.into();
        assert_eq!(nothing.kind(), ErrorKind::UnexpectedFailure);
    }
}
