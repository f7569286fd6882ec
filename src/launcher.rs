//! Emulator launching
//!
//! A [`LaunchRequest`] is built fresh for every launch from a platform and a
//! game, then handed to a [`ProcessLauncher`]. Two strategies exist:
//!
//! - [`DirectLauncher`] passes the argument vector straight to the OS.
//! - [`ShellLauncher`] joins it into one command line for the system shell.
//!   Windows setups rely on this: parameters are written in `config.ini`
//!   exactly as they would be typed at a `cmd` prompt.
//!
//! Launches are synchronous. The caller blocks until the emulator exits.

use crate::platform::{normalize_path, Platform};
use crate::scanner::Game;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    /// The emulator ran and exited with a non-zero status
    #[error("Failed to launch emulator:\nSTDERR: {stderr}\nSTDOUT: {stdout}")]
    Failed {
        /// `None` when the process was killed by a signal
        exit_code: Option<i32>,
        stderr: String,
        stdout: String,
    },
    /// The process could not be started at all
    #[error("Unexpected error: could not start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The selection has no game at this position
    #[error("Unexpected error: no game at position {index} ({count} listed)")]
    NoSuchGame { index: usize, count: usize },
}

/// Captured output of an emulator that exited successfully
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    pub stdout: String,
    pub stderr: String,
}

pub type LaunchOutcome = Result<LaunchOutput, LaunchError>;

/// Everything needed to start one emulator process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub executable: PathBuf,
    pub parameters: Vec<String>,
    /// Absolute, normalized path of the game file
    pub game_path: PathBuf,
    /// `None` inherits the front-end's working directory
    pub working_dir: Option<PathBuf>,
}

impl LaunchRequest {
    pub fn new(platform: &Platform, game: &Game) -> Self {
        let joined = platform.games_folder.join(game.relative_path());
        // The emulator runs elsewhere, so a relative games folder has to be
        // anchored on our own working directory
        let anchored = std::path::absolute(&joined).unwrap_or(joined);

        Self {
            executable: platform.executable.clone(),
            parameters: platform.parameters(),
            game_path: normalize_path(&anchored),
            working_dir: platform.effective_working_dir(),
        }
    }

    /// `[executable, parameters..., game_path]`
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(self.parameters.len() + 2);
        argv.push(self.executable.clone().into_os_string());
        argv.extend(self.parameters.iter().map(OsString::from));
        argv.push(self.game_path.clone().into_os_string());
        argv
    }

    /// Single command line for a shell: executable and game are quoted,
    /// parameters are passed through untouched.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.parameters.len() + 2);
        parts.push(quote(&self.executable));
        parts.extend(self.parameters.iter().cloned());
        parts.push(quote(&self.game_path));
        parts.join(" ")
    }
}

fn quote(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

/// A way of turning a [`LaunchRequest`] into a running process
pub trait ProcessLauncher {
    /// Short strategy name for logs
    fn name(&self) -> &'static str;

    /// Build the command, without working directory or I/O setup
    fn command(&self, request: &LaunchRequest) -> Command;

    /// Human-readable form of what will be executed
    fn describe(&self, request: &LaunchRequest) -> String;

    /// Run the request to completion and classify the result
    fn run(&self, request: &LaunchRequest) -> LaunchOutcome {
        let mut command = self.command(request);
        if let Some(ref dir) = request.working_dir {
            command.current_dir(dir);
        }

        log::info!("Command executed ({}): {}", self.name(), self.describe(request));
        match request.working_dir {
            Some(ref dir) => log::info!("Working directory: {}", dir.display()),
            None => log::info!("Working directory: (inherited)"),
        }

        let output = command.output().map_err(|source| {
            log::error!("Unexpected error: {}: {}", request.executable.display(), source);
            LaunchError::Spawn {
                program: request.executable.clone(),
                source,
            }
        })?;

        classify(output)
    }
}

fn classify(output: Output) -> LaunchOutcome {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        log::debug!("Emulator exited cleanly");
        return Ok(LaunchOutput { stdout, stderr });
    }

    log::error!("Execution error ({}) (STDERR): {}", output.status, stderr);
    log::error!("Execution output (STDOUT): {}", stdout);
    Err(LaunchError::Failed {
        exit_code: output.status.code(),
        stderr,
        stdout,
    })
}

/// Passes the argument vector directly to the OS, no shell involved
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectLauncher;

impl ProcessLauncher for DirectLauncher {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn command(&self, request: &LaunchRequest) -> Command {
        let mut command = Command::new(&request.executable);
        command.args(&request.parameters).arg(&request.game_path);
        command
    }

    fn describe(&self, request: &LaunchRequest) -> String {
        format!("{:?}", request.argv())
    }
}

/// Hands [`LaunchRequest::command_line`] to a shell
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    shell: PathBuf,
    flag: String,
}

impl ShellLauncher {
    pub fn new(shell: impl Into<PathBuf>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }

    /// `cmd /C` on Windows, `sh -c` elsewhere
    pub fn system() -> Self {
        if cfg!(windows) {
            let comspec = std::env::var_os("COMSPEC").unwrap_or_else(|| "cmd.exe".into());
            Self::new(comspec, "/C")
        } else {
            Self::new("/bin/sh", "-c")
        }
    }
}

impl ProcessLauncher for ShellLauncher {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn command(&self, request: &LaunchRequest) -> Command {
        let mut command = Command::new(&self.shell);
        command.arg(&self.flag);

        #[cfg(windows)]
        {
            // cmd strips one pair of outer quotes from the line it is given;
            // std's argument escaping would mangle the inner ones
            use std::os::windows::process::CommandExt;
            command.raw_arg(format!("\"{}\"", request.command_line()));
        }
        #[cfg(not(windows))]
        command.arg(request.command_line());

        command
    }

    fn describe(&self, request: &LaunchRequest) -> String {
        request.command_line()
    }
}

/// Strategy used on the current target
pub fn default_launcher() -> Box<dyn ProcessLauncher> {
    if cfg!(windows) {
        Box::new(ShellLauncher::system())
    } else {
        Box::new(DirectLauncher)
    }
}

/// Build the request for `game` and run it
pub fn launch(platform: &Platform, game: &Game, launcher: &dyn ProcessLauncher) -> LaunchOutcome {
    launcher.run(&LaunchRequest::new(platform, game))
}
