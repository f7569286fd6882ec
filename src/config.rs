//! Config store for Jolly Good Emulation
//!
//! Reads the `config.ini` file that describes every emulator platform. The
//! format is a plain sections-and-options INI dialect:
//!
//! ```ini
//! [DEFAULT]
//! extensions = .zip
//!
//! [Nintendo - NES]
//! games = ~/roms/nes
//! executable = /usr/bin/retroarch
//! parameters = -L, /usr/lib/libretro/nestopia_libretro.so
//! ```
//!
//! Option names are case-insensitive, section names are not. Options of the
//! `[DEFAULT]` section are visible from every other section.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the section whose options every other section inherits
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Your {} file is missing.", file_label(.0))]
    Missing(PathBuf),
    #[error("Your {} file is empty.", file_label(.0))]
    Empty(PathBuf),
    #[error("Could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
}

#[derive(Debug, Clone, Default)]
struct Section {
    name: String,
    options: HashMap<String, String>,
}

/// Where parsed options go
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Defaults,
    Section(usize),
}

/// Option currently open for continuation lines
struct OpenOption {
    target: Target,
    key: String,
    indent: usize,
}

/// File name of a config path, as users know it
fn file_label(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

/// Parsed configuration, kept for the lifetime of a session
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    sections: Vec<Section>,
    defaults: HashMap<String, String>,
}

impl ConfigStore {
    /// Load and parse the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::parse(&text)?;
        if store.sections.is_empty() {
            return Err(ConfigError::Empty(path.to_path_buf()));
        }

        log::info!(
            "Loaded configuration from: {} ({} platforms)",
            path.display(),
            store.sections.len()
        );
        Ok(store)
    }

    /// Parse configuration text. An input without sections parses fine;
    /// only [`ConfigStore::load`] treats that as an error.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut store = Self::default();
        let mut target: Option<Target> = None;
        let mut open: Option<OpenOption> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                open = None;
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();

            // Continuation of a multi-line value
            if let Some(ref current) = open {
                if indent > current.indent {
                    if let Some(value) = store.options_mut(current.target).get_mut(&current.key) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }
            open = None;

            if let Some(name) = section_header(trimmed) {
                target = Some(store.open_section(name, line)?);
                continue;
            }

            let Some(current) = target else {
                return Err(syntax(line, "option found before any [section] header"));
            };

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(syntax(line, format!("expected 'key = value', found '{}'", trimmed)));
            };

            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(syntax(line, "option name is empty"));
            }

            let options = store.options_mut(current);
            if options.contains_key(&key) {
                return Err(syntax(line, format!("option '{}' is defined twice", key)));
            }
            options.insert(key.clone(), value);

            open = Some(OpenOption {
                target: current,
                key,
                indent,
            });
        }

        Ok(store)
    }

    fn open_section(&mut self, name: &str, line: usize) -> Result<Target, ConfigError> {
        if name.is_empty() {
            return Err(syntax(line, "section name is empty"));
        }
        if name == DEFAULT_SECTION {
            return Ok(Target::Defaults);
        }
        if self.has_section(name) {
            return Err(syntax(line, format!("section '{}' is defined twice", name)));
        }
        self.sections.push(Section {
            name: name.to_string(),
            options: HashMap::new(),
        });
        Ok(Target::Section(self.sections.len() - 1))
    }

    fn options_mut(&mut self, target: Target) -> &mut HashMap<String, String> {
        match target {
            Target::Defaults => &mut self.defaults,
            Target::Section(index) => &mut self.sections[index].options,
        }
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section names in file order, `[DEFAULT]` excluded
    pub fn sections(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// Value of `key` in `section`, falling back to `[DEFAULT]`.
    /// Returns `None` for unknown sections.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let section = self.section(section)?;
        let key = key.to_lowercase();
        section
            .options
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }

    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }
}

/// `[name]` -> `name`, trimmed
fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let close = rest.rfind(']')?;
    Some(rest[..close].trim())
}

fn syntax(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Syntax {
        line,
        message: message.into(),
    }
}
