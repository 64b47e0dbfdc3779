use std::fmt::Display;
use std::path::Path;

use tracing::instrument;

use crate::clients::runner::Cmd;
use crate::clients::runner::CommandRunner;
use crate::error::Error;
use crate::error::Result;

/// Name of the remote every command talks to.
pub const REMOTE: &str = "origin";

// -----------------------------------------------------------------------------
// Types

/// Git client bound to one working tree.
pub struct GitClient<'a, R> {
    runner: &'a R,
    path: &'a Path,
}

/// A command that ran successfully together with what it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub command: String,
    pub output: String,
}

impl Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$ {}", self.command)?;
        let output = self.output.trim_end();
        if !output.is_empty() {
            write!(f, "\n{}", output)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// GitClient impl

impl<'a, R: CommandRunner> GitClient<'a, R> {
    pub fn new(runner: &'a R, path: &'a Path) -> Self {
        Self { runner, path }
    }

    pub async fn set_user_name(&self, name: &str) -> Result<Transcript> {
        self.git(["config", "user.name", name]).await
    }

    pub async fn set_user_email(&self, email: &str) -> Result<Transcript> {
        self.git(["config", "user.email", email]).await
    }

    #[instrument(skip_all)]
    pub async fn fetch(&self) -> Result<Transcript> {
        self.git(["fetch", REMOTE]).await
    }

    pub async fn checkout(&self, branch: &str) -> Result<Transcript> {
        self.git(["checkout", branch]).await
    }

    /// Hard-reset the current branch to the remote tip of `branch`.
    pub async fn reset_hard_to_remote(&self, branch: &str) -> Result<Transcript> {
        self.git(["reset", "--hard", &format!("{}/{}", REMOTE, branch)])
            .await
    }

    /// Create `branch` and switch to it.
    pub async fn create_branch(&self, branch: &str) -> Result<Transcript> {
        self.git(["checkout", "-b", branch]).await
    }

    /// Stage a path given relative to the repository root.
    pub async fn add(&self, path: &Path) -> Result<Transcript> {
        self.git(["add", &path.to_string_lossy()]).await
    }

    pub async fn commit(&self, message: &str) -> Result<Transcript> {
        self.git(["commit", "-m", message]).await
    }

    #[instrument(skip_all)]
    pub async fn push(&self, branch: &str) -> Result<Transcript> {
        self.git(["push", REMOTE, branch]).await
    }

    /// Paths of modified or untracked entries in the working tree.
    #[instrument(skip_all)]
    pub async fn changed_paths(&self) -> Result<Vec<String>> {
        let transcript = self.git(["status", "--porcelain"]).await?;
        Ok(parse_porcelain(&transcript.output))
    }

    /// URL of the `origin` remote, if one is configured.
    #[instrument(skip_all)]
    pub async fn remote_url(&self) -> Option<String> {
        let key = format!("remote.{}.url", REMOTE);
        let url = self.git(["config", "--get", &key]).await.ok()?;
        let url = url.output.trim();
        (!url.is_empty()).then(|| url.to_string())
    }

    async fn git<const N: usize>(&self, args: [&str; N]) -> Result<Transcript> {
        run_checked(self.runner, Cmd::git(args).current_dir(self.path)).await
    }
}

/// Clone `url` into `target`. Runs without a working directory.
#[instrument(skip_all)]
pub async fn clone<R: CommandRunner>(runner: &R, url: &str, target: &Path) -> Result<Transcript> {
    let target = target.to_string_lossy();
    run_checked(runner, Cmd::git(["clone", url, &target])).await
}

async fn run_checked<R: CommandRunner>(runner: &R, cmd: Cmd) -> Result<Transcript> {
    let out = runner.run(&cmd).await;
    if !out.success {
        return Err(Error::CommandFailed {
            command: cmd.to_string(),
            output: out.output,
        });
    }
    Ok(Transcript {
        command: cmd.to_string(),
        output: out.output,
    })
}

/// Extract paths from `git status --porcelain` output.
///
/// Each line is a two character status, a space, then the path.
pub fn parse_porcelain(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.get(3..))
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}
