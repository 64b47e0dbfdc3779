use std::path::PathBuf;

use anyhow::Result;

use crate::App;
use crate::clients::runner::CommandRunner;
use crate::error::Error;
use crate::prompt::Prompt;
use crate::repository::RepositoryHandle;
use crate::repository::clone_repository;

impl<R: CommandRunner, P: Prompt> App<R, P> {
    /// Clone a remote repository into a new directory under `dest`, named
    /// after the repository. Missing arguments are asked for.
    pub async fn cmd_clone(
        &self,
        url: Option<String>,
        dest: Option<PathBuf>,
        stdout: &mut impl std::io::Write,
    ) -> Result<RepositoryHandle> {
        let url = match url {
            Some(url) => url,
            None => self.ask_required("Enter Git repository URL", "", "Repository URL")?,
        };
        let dest = match dest {
            Some(dest) => dest,
            None => self
                .prompt
                .ask_folder("Select destination folder")
                .ok_or(Error::MissingInput("Destination folder"))?,
        };

        writeln!(stdout, "Cloning repository...")?;
        let (repo, transcript) = clone_repository(&self.runner, &url, &dest).await?;
        self.echo(stdout, &transcript)?;

        self.prompt.info("Repository cloned successfully");
        writeln!(stdout, "Selected repo: {}", repo)?;
        Ok(repo)
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use super::*;
    use crate::Config;
    use crate::clients::runner::RealRunner;
    use crate::prompt::MockPrompt;

    #[tokio::test]
    async fn test_cmd_clone_local_remote() {
        let dir = tempfile::tempdir().unwrap();
        let remote = dir.path().join("warehouse.git");
        let status = Command::new("git")
            .args(["init", "--bare", "-q"])
            .arg(&remote)
            .status()
            .unwrap();
        assert!(status.success());
        let dest = dir.path().join("work");
        std::fs::create_dir(&dest).unwrap();

        let mut prompt = MockPrompt::new();
        prompt.expect_info().times(1).returning(|_| ());
        let app = App::new(Config::default_for_tests(), RealRunner, prompt);

        let mut stdout = Vec::new();
        let repo = app
            .cmd_clone(
                Some(remote.to_string_lossy().into_owned()),
                Some(dest.clone()),
                &mut stdout,
            )
            .await
            .unwrap();

        assert_eq!(repo.path(), dest.join("warehouse"));
        assert!(repo.path().join(".git").is_dir());
        let out = String::from_utf8(stdout).unwrap();
        assert!(out.contains("$ git clone"));
        assert!(out.contains("Selected repo:"));
    }

    #[tokio::test]
    async fn test_cmd_clone_cancelled_url() {
        let mut prompt = MockPrompt::new();
        prompt.expect_ask_text().returning(|_, _| None);
        let app = App::new(
            Config::default_for_tests(),
            crate::testutil::FakeRunner::new(),
            prompt,
        );

        let err = app.cmd_clone(None, None, &mut Vec::new()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingInput("Repository URL"))
        ));
        assert!(app.runner.calls.borrow().is_empty());
    }
}
