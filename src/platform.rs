//! Platform resolution
//!
//! Turns one section of the config store into a validated [`Platform`].

use crate::config::ConfigStore;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Separator between entries of the `extensions` option
pub const EXTENSION_SEPARATOR: char = ',';

/// Separator between entries of the `parameters` option
pub const PARAMETER_SEPARATOR: char = ',';

/// Required options of a platform section, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Games,
    Executable,
    Extensions,
}

impl OptionKind {
    pub const REQUIRED: [OptionKind; 3] =
        [OptionKind::Games, OptionKind::Executable, OptionKind::Extensions];

    /// Option name as written in `config.ini`
    pub fn key(self) -> &'static str {
        match self {
            OptionKind::Games => "games",
            OptionKind::Executable => "executable",
            OptionKind::Extensions => "extensions",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("The platform '{0}' is not defined in the config file.")]
    UnknownPlatform(String),
    #[error("The selected platform is missing the '{0}' option.")]
    MissingOption(OptionKind),
}

/// A configured emulator target
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Section name
    pub name: String,

    /// Folder scanned for games
    pub games_folder: PathBuf,

    /// Emulator executable
    pub executable: PathBuf,

    /// Allowed file suffixes, compared case-sensitively (e.g. `.zip`)
    pub extensions: Vec<String>,

    /// Working directory for the emulator; the executable's folder when unset
    pub working_dir: Option<PathBuf>,

    /// Unsplit `parameters` option
    raw_parameters: Option<String>,
}

impl Platform {
    /// Build a platform directly, without a config file
    pub fn new(
        name: impl Into<String>,
        games_folder: impl AsRef<Path>,
        executable: impl AsRef<Path>,
        extensions: &str,
    ) -> Self {
        Self {
            name: name.into(),
            games_folder: normalize_path(games_folder.as_ref()),
            executable: normalize_path(executable.as_ref()),
            extensions: split_list(extensions, EXTENSION_SEPARATOR),
            working_dir: None,
            raw_parameters: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(normalize_path(dir.as_ref()));
        self
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.raw_parameters = Some(parameters.into());
        self
    }

    /// Resolve the section `name` of `config` into a platform.
    ///
    /// Required options are checked for presence first, then for content,
    /// both in `games`, `executable`, `extensions` order. An option that is
    /// present but blank is reported exactly like a missing one.
    pub fn resolve(config: &ConfigStore, name: &str) -> Result<Self, ResolveError> {
        if !config.has_section(name) {
            return Err(ResolveError::UnknownPlatform(name.to_string()));
        }

        for kind in OptionKind::REQUIRED {
            if !config.has_option(name, kind.key()) {
                return Err(ResolveError::MissingOption(kind));
            }
        }

        let games = required_value(config, name, OptionKind::Games)?;
        let executable = required_value(config, name, OptionKind::Executable)?;
        let extensions = required_value(config, name, OptionKind::Extensions)?;

        let extensions = split_list(extensions, EXTENSION_SEPARATOR);
        if extensions.is_empty() {
            return Err(ResolveError::MissingOption(OptionKind::Extensions));
        }

        let working_dir = config
            .get(name, "working_dir")
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(|dir| normalize_path(Path::new(dir)));

        let platform = Self {
            name: name.to_string(),
            games_folder: normalize_path(Path::new(games)),
            executable: normalize_path(Path::new(executable)),
            extensions,
            working_dir,
            raw_parameters: config.get(name, "parameters").map(str::to_string),
        };

        log::debug!(
            "Resolved platform '{}': games={}, executable={}, extensions={:?}",
            platform.name,
            platform.games_folder.display(),
            platform.executable.display(),
            platform.extensions
        );

        Ok(platform)
    }

    /// Launch parameters, split on [`PARAMETER_SEPARATOR`] each time they are asked for
    pub fn parameters(&self) -> Vec<String> {
        self.raw_parameters
            .as_deref()
            .map(|raw| split_list(raw, PARAMETER_SEPARATOR))
            .unwrap_or_default()
    }

    /// Whether a file suffix (leading dot included) is in the allow-list
    pub fn accepts_suffix(&self, suffix: &str) -> bool {
        self.extensions.iter().any(|ext| ext == suffix)
    }

    /// Directory the emulator runs in: `working_dir`, or the executable's
    /// folder. `None` means "inherit ours" (bare executable name).
    pub fn effective_working_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.working_dir {
            return Some(dir.clone());
        }
        self.executable
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

fn required_value<'a>(
    config: &'a ConfigStore,
    name: &str,
    kind: OptionKind,
) -> Result<&'a str, ResolveError> {
    config
        .get(name, kind.key())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ResolveError::MissingOption(kind))
}

/// Split on `separator`, trim every token and drop the empty ones
pub fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lexical path normalization: drops `.` components, folds `name/..` and
/// redundant separators. Never touches the filesystem. An empty result is `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = "games = /roms/snes\nexecutable = /opt/snes9x/snes9x\nextensions = .sfc, .smc\n";

    fn config(body: &str) -> ConfigStore {
        ConfigStore::parse(&format!("[SNES]\n{}", body)).unwrap()
    }

    fn resolve(body: &str) -> Result<Platform, ResolveError> {
        Platform::resolve(&config(body), "SNES")
    }

    #[test]
    fn resolves_a_complete_section() {
        let platform = resolve(COMPLETE).unwrap();
        assert_eq!(platform.name, "SNES");
        assert_eq!(platform.games_folder, PathBuf::from("/roms/snes"));
        assert_eq!(platform.executable, PathBuf::from("/opt/snes9x/snes9x"));
        assert_eq!(platform.extensions, vec![".sfc", ".smc"]);
        assert_eq!(platform.working_dir, None);
        assert!(platform.parameters().is_empty());
    }

    #[test]
    fn unknown_platform_is_reported() {
        let err = Platform::resolve(&config(COMPLETE), "N64").unwrap_err();
        assert_eq!(err, ResolveError::UnknownPlatform("N64".into()));
    }

    #[test]
    fn first_missing_option_wins_in_check_order() {
        let cases = [
            ("", OptionKind::Games),
            ("executable = x\nextensions = .a\n", OptionKind::Games),
            ("extensions = .a\n", OptionKind::Games),
            ("games = g\n", OptionKind::Executable),
            ("games = g\nextensions = .a\n", OptionKind::Executable),
            ("games = g\nexecutable = x\n", OptionKind::Extensions),
        ];
        for (body, kind) in cases {
            assert_eq!(
                resolve(body).unwrap_err(),
                ResolveError::MissingOption(kind),
                "body: {:?}",
                body
            );
        }
    }

    #[test]
    fn empty_value_fails_like_a_missing_option() {
        let cases = [
            ("games =\nexecutable = x\nextensions = .a\n", OptionKind::Games),
            ("games = g\nexecutable =   \nextensions = .a\n", OptionKind::Executable),
            ("games = g\nexecutable = x\nextensions =\n", OptionKind::Extensions),
            ("games = g\nexecutable = x\nextensions = , ,\n", OptionKind::Extensions),
        ];
        for (body, kind) in cases {
            assert_eq!(resolve(body).unwrap_err(), ResolveError::MissingOption(kind));
        }
    }

    #[test]
    fn presence_is_checked_before_content() {
        // `games` is blank but `executable` is absent altogether
        let err = resolve("games =\nextensions = .a\n").unwrap_err();
        assert_eq!(err, ResolveError::MissingOption(OptionKind::Executable));
    }

    #[test]
    fn extensions_are_trimmed_and_keep_their_case() {
        let platform = resolve("games = g\nexecutable = x\nextensions = a, b ,c,.ZIP\n").unwrap();
        assert_eq!(platform.extensions, vec!["a", "b", "c", ".ZIP"]);
        assert!(platform.accepts_suffix(".ZIP"));
        assert!(!platform.accepts_suffix(".zip"));
    }

    #[test]
    fn optional_options() {
        let platform = resolve(&format!(
            "{}working_dir = /opt/snes9x/./cfg/..\nparameters = --fullscreen , -v,,\n",
            COMPLETE
        ))
        .unwrap();
        assert_eq!(platform.working_dir, Some(PathBuf::from("/opt/snes9x")));
        assert_eq!(platform.parameters(), vec!["--fullscreen", "-v"]);
        // Pure: asking again yields the same split
        assert_eq!(platform.parameters(), platform.parameters());
    }

    #[test]
    fn blank_working_dir_is_unset() {
        let platform = resolve(&format!("{}working_dir =\n", COMPLETE)).unwrap();
        assert_eq!(platform.working_dir, None);
    }

    #[test]
    fn working_dir_defaults_to_executable_folder() {
        let platform = Platform::new("p", "/g", "/opt/emu/bin/emu", ".a");
        assert_eq!(platform.effective_working_dir(), Some(PathBuf::from("/opt/emu/bin")));

        let platform = platform.with_working_dir("/tmp");
        assert_eq!(platform.effective_working_dir(), Some(PathBuf::from("/tmp")));

        let bare = Platform::new("p", "/g", "emu", ".a");
        assert_eq!(bare.effective_working_dir(), None);
    }

    #[test]
    fn default_section_supplies_missing_options() {
        let config = ConfigStore::parse(
            "[DEFAULT]\nexecutable = /usr/bin/mednafen\n[PCE]\ngames = /roms/pce\nextensions = .pce\n",
        )
        .unwrap();
        let platform = Platform::resolve(&config, "PCE").unwrap();
        assert_eq!(platform.executable, PathBuf::from("/usr/bin/mednafen"));
    }

    #[test]
    fn normalizes_paths_lexically() {
        assert_eq!(normalize_path(Path::new("a//b/./c/")), PathBuf::from("a/b/c"));
        assert_eq!(normalize_path(Path::new("a/b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_path(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(normalize_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("")), PathBuf::from("."));
    }
}
