use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

use crate::App;
use crate::clients::runner::CommandRunner;
use crate::error::Error;
use crate::prompt::Prompt;
use crate::repository::RepositoryHandle;
use crate::repository::find_repositories;

impl<R: CommandRunner, P: Prompt> App<R, P> {
    /// Pick one of the repositories directly inside `folder`.
    ///
    /// Returns `None` when the folder holds no repositories or the user makes
    /// no choice.
    pub async fn cmd_select(
        &self,
        folder: Option<PathBuf>,
        stdout: &mut impl std::io::Write,
    ) -> Result<Option<RepositoryHandle>> {
        let folder = match folder {
            Some(folder) => folder,
            None => self
                .prompt
                .ask_folder("Select folder containing repositories")
                .ok_or(Error::MissingInput("Folder"))?,
        };

        let repos = find_repositories(&folder)
            .await
            .with_context(|| format!("Failed to scan {}", folder.display()))?;
        if repos.is_empty() {
            self.prompt.warn("No git repositories found");
            return Ok(None);
        }

        let items: Vec<String> = repos.iter().map(|repo| repo.to_string()).collect();
        let Some(index) = self.prompt.select("Select repository", &items) else {
            return Ok(None);
        };
        let Some(repo) = repos.into_iter().nth(index) else {
            return Ok(None);
        };

        writeln!(stdout, "Selected repo: {}", repo)?;
        Ok(Some(repo))
    }
}
