#![allow(async_fn_in_trait)]

use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::warn;
use tokio::process::Command;

// -----------------------------------------------------------------------------
// Types

/// An external command: program, arguments and optional working directory.
///
/// Arguments are passed to the program verbatim, there is no shell in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// Outcome of running a [`Cmd`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Stdout followed by stderr.
    pub output: String,
}

/// Runs external commands to completion.
///
/// Implementations never fail: a missing executable, a non-zero exit or an OS
/// error all come back as `success == false` with the error text in `output`.
pub trait CommandRunner {
    async fn run(&self, cmd: &Cmd) -> CommandOutput;
}

// -----------------------------------------------------------------------------
// Cmd impl

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            cwd: None,
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git").args(args)
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.cwd = Some(path.as_ref().to_path_buf());
        self
    }
}

impl Display for Cmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// RealRunner

/// Runner that spawns real processes and waits for them.
pub struct RealRunner;

impl CommandRunner for RealRunner {
    async fn run(&self, cmd: &Cmd) -> CommandOutput {
        debug!("Running: {} (cwd: {:?})", cmd, cmd.cwd);

        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(cwd) = &cmd.cwd {
            command.current_dir(cwd);
        }

        match command.output().await {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                let success = output.status.success();
                if !success {
                    warn!("{} exited with {}", cmd, output.status);
                }
                CommandOutput {
                    success,
                    output: combined,
                }
            }
            Err(e) => {
                warn!("Failed to execute {}: {}", cmd, e);
                CommandOutput {
                    success: false,
                    output: format!("Failed to execute {}: {}", cmd.program, e),
                }
            }
        }
    }
}
