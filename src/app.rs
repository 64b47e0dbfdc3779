use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;

use crate::clients::git::GitClient;
use crate::clients::git::Transcript;
use crate::clients::runner::CommandRunner;
use crate::config::Config;
use crate::error::Error;
use crate::paths;
use crate::prompt::Prompt;
use crate::repository::RepositoryHandle;

/// How many times a destination folder is asked for before giving up.
pub const FOLDER_ATTEMPTS: usize = 2;

pub struct App<R, P> {
    pub config: Config,
    pub runner: R,
    pub prompt: P,
}

impl<R: CommandRunner, P: Prompt> App<R, P> {
    pub fn new(config: Config, runner: R, prompt: P) -> Self {
        Self {
            config,
            runner,
            prompt,
        }
    }

    pub(crate) fn git<'a>(&'a self, repo: &'a RepositoryHandle) -> GitClient<'a, R> {
        GitClient::new(&self.runner, repo.path())
    }
}

/// Shared helper methods for App
impl<R: CommandRunner, P: Prompt> App<R, P> {
    /// Ask for text that must not be empty.
    pub(crate) fn ask_required(
        &self,
        title: &str,
        default: &str,
        what: &'static str,
    ) -> Result<String> {
        self.prompt
            .ask_text(title, default)
            .ok_or_else(|| Error::MissingInput(what).into())
    }

    /// Ask for an existing file that must be provided.
    pub(crate) fn ask_required_file(&self, title: &str, what: &'static str) -> Result<PathBuf> {
        self.prompt
            .ask_file(title)
            .ok_or_else(|| Error::MissingInput(what).into())
    }

    /// Ask for a destination folder inside `repo`. A folder outside the
    /// repository is reported and asked for again, up to [`FOLDER_ATTEMPTS`]
    /// times.
    pub(crate) fn ask_folder_inside(
        &self,
        repo: &RepositoryHandle,
        title: &str,
        what: &'static str,
    ) -> Result<PathBuf> {
        let mut last_error = None;
        for _ in 0..FOLDER_ATTEMPTS {
            let folder = self
                .prompt
                .ask_folder(title)
                .ok_or(Error::MissingInput(what))?;
            if repo.contains(&folder) {
                return Ok(folder);
            }
            let error = Error::OutsideRepository {
                folder,
                repository: repo.path().to_path_buf(),
            };
            self.prompt.error(&error.to_string());
            last_error = Some(error);
        }
        Err(last_error
            .map(anyhow::Error::from)
            .unwrap_or_else(|| anyhow!("{} is required", what)))
    }

    /// Copy `file` into `folder` keeping its name. Returns the new path.
    pub(crate) async fn copy_into(&self, file: &Path, folder: &Path) -> Result<PathBuf> {
        let name = file
            .file_name()
            .ok_or_else(|| anyhow!("{} has no file name", file.display()))?;
        let target = folder.join(name);
        // Copying a file onto itself would truncate it
        if paths::normalize(file)? == paths::normalize(&target)? {
            return Ok(target);
        }
        tokio::fs::copy(file, &target).await.with_context(|| {
            format!(
                "Failed to copy {} to {}",
                file.display(),
                folder.display()
            )
        })?;
        Ok(target)
    }

    pub(crate) fn echo(
        &self,
        stdout: &mut impl std::io::Write,
        transcript: &Transcript,
    ) -> std::io::Result<()> {
        writeln!(stdout, "{}", transcript)
    }
}
