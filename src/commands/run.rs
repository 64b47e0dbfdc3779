use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use log::info;
use tracing::instrument;

use crate::App;
use crate::changelog;
use crate::changelog::ChangelogEntry;
use crate::changelog::ObjectType;
use crate::clients::runner::CommandRunner;
use crate::error::Error;
use crate::paths;
use crate::prompt::Prompt;
use crate::pull_request::pull_request_url;
use crate::repository::RepositoryHandle;
use crate::workflow::DEFAULT_BASE_BRANCH;
use crate::workflow::RunOutcome;
use crate::workflow::WorkflowMode;
use crate::workflow::WorkflowRequest;
use crate::workflow::default_branch_name;

/// Values given up front for a run. Anything missing is asked for.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub story_id: Option<String>,
    pub branch_name: Option<String>,
    pub commit_headline: Option<String>,
    pub mode: Option<WorkflowMode>,
    pub base_branch: Option<String>,
}

impl<R: CommandRunner, P: Prompt> App<R, P> {
    /// Run the whole workflow against `repo`.
    ///
    /// 1. Create the story branch from a freshly reset base branch.
    /// 2. Copy the selected files into the repository and, for database
    ///    objects, add a change-set to a changelog.
    /// 3. Stage, confirm, commit and push.
    /// 4. Offer a link to open a pull request when the remote is on GitHub.
    ///
    /// Nothing is rolled back when a step fails: the repository stays on
    /// whatever branch and state the failing step left it in.
    pub async fn cmd_run(
        &self,
        repo: Option<RepositoryHandle>,
        options: RunOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<RunOutcome> {
        let repo = match repo {
            Some(repo) => repo,
            None => self
                .choose_repository(stdout)
                .await?
                .ok_or(Error::MissingInput("Repository"))?,
        };
        let request = self.resolve_request(options)?;
        let branch = request.full_branch();
        let git = self.git(&repo);

        writeln!(stdout, "Repository: {}", repo)?;
        writeln!(stdout, "Branch: {}", branch)?;
        info!("Starting {} run on {} for {}", request.mode, repo, branch);

        // Branch preparation
        self.echo(stdout, &git.set_user_name(&self.config.git_name).await?)?;
        self.echo(stdout, &git.set_user_email(&self.config.git_email).await?)?;
        self.echo(stdout, &git.fetch().await?)?;
        self.echo(stdout, &git.checkout(&request.base_branch).await?)?;
        self.echo(
            stdout,
            &git.reset_hard_to_remote(&request.base_branch).await?,
        )?;
        self.echo(stdout, &git.create_branch(&branch).await?)?;

        // Artifacts
        let (first, second) = match request.mode {
            WorkflowMode::DbObjects => self.stage_migrations(&repo).await?,
            WorkflowMode::GenericScripts => self.stage_scripts(&repo).await?,
        };
        let mut to_add = vec![first.clone(), second.clone()];
        if request.mode == WorkflowMode::DbObjects
            && let Some(changelog) = self.update_changelog(&request, &first, &second).await
        {
            to_add.push(changelog);
        }

        for file in &to_add {
            let relative = repo.relative(file)?;
            let transcript = git
                .add(&relative)
                .await
                .with_context(|| format!("Failed to add {}", relative.display()))?;
            self.echo(stdout, &transcript)?;
        }

        let changed = git.changed_paths().await?;
        if changed.is_empty() {
            self.prompt.info("No modified/new files to commit.");
            writeln!(stdout, "Nothing to commit")?;
            return Ok(RunOutcome::NothingToCommit);
        }
        let question = format!(
            "The following files are staged for commit:\n\n{}\n\nProceed?",
            changed.join("\n")
        );
        if !self.prompt.confirm(&question) {
            self.prompt.info("Commit operation cancelled");
            return Ok(RunOutcome::Declined);
        }

        self.echo(stdout, &git.commit(&request.commit_message()).await?)?;
        self.echo(stdout, &git.push(&branch).await?)?;

        let pull_request_url = git
            .remote_url()
            .await
            .and_then(|url| pull_request_url(&url, &branch));
        match &pull_request_url {
            Some(url) => {
                writeln!(stdout, "Automation complete. Pull request: {}", url)?;
                self.prompt.show_link(url);
            }
            None => writeln!(stdout, "Automation complete.")?,
        }

        Ok(RunOutcome::Completed {
            branch,
            pull_request_url,
        })
    }

    async fn choose_repository(
        &self,
        stdout: &mut impl std::io::Write,
    ) -> Result<Option<RepositoryHandle>> {
        let choices = [
            "Clone repository".to_string(),
            "Select existing repository".to_string(),
        ];
        match self.prompt.select("No repository selected", &choices) {
            Some(0) => self.cmd_clone(None, None, stdout).await.map(Some),
            Some(_) => self.cmd_select(None, stdout).await,
            None => Ok(None),
        }
    }

    fn resolve_request(&self, options: RunOptions) -> Result<WorkflowRequest> {
        let story_id = match non_empty(options.story_id) {
            Some(story_id) => story_id,
            None => self.ask_required("Story ID", "", "Story ID")?,
        };
        let branch_name = match non_empty(options.branch_name) {
            Some(branch_name) => branch_name,
            None => self.ask_required(
                "Branch name",
                &default_branch_name(&story_id, &self.config.username),
                "Branch name",
            )?,
        };
        let commit_headline = match non_empty(options.commit_headline) {
            Some(headline) => headline,
            None => self.ask_required("Commit headline", "", "Commit headline")?,
        };
        let mode = match options.mode {
            Some(mode) => mode,
            None => {
                let items = WorkflowMode::ALL.map(|mode| mode.to_string());
                self.prompt
                    .select("Select workflow mode", &items)
                    .and_then(|index| WorkflowMode::ALL.get(index).copied())
                    .ok_or(Error::MissingInput("Workflow mode"))?
            }
        };
        let base_branch =
            non_empty(options.base_branch).unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());

        Ok(WorkflowRequest {
            story_id,
            branch_name,
            commit_headline,
            mode,
            base_branch,
        })
    }

    /// Copy the up and down migrations into one folder inside the repository.
    #[instrument(skip_all)]
    async fn stage_migrations(&self, repo: &RepositoryHandle) -> Result<(PathBuf, PathBuf)> {
        let up = self.ask_required_file("Select UP migration file", "UP migration file")?;
        let down = self.ask_required_file("Select DOWN migration file", "DOWN migration file")?;
        let folder = self.ask_folder_inside(
            repo,
            "Select target folder INSIDE repository",
            "Target folder",
        )?;

        Ok((
            self.copy_into(&up, &folder).await?,
            self.copy_into(&down, &folder).await?,
        ))
    }

    /// Copy the checkpoint and expectation files, each into its own folder
    /// inside the repository.
    #[instrument(skip_all)]
    async fn stage_scripts(&self, repo: &RepositoryHandle) -> Result<(PathBuf, PathBuf)> {
        let checkpoint = self.ask_required_file("Select Checkpoint file", "Checkpoint file")?;
        let expectation = self.ask_required_file("Select Expectation file", "Expectation file")?;
        let checkpoint_folder = self.ask_folder_inside(
            repo,
            "Select target folder for Checkpoint file",
            "Checkpoint target folder",
        )?;
        let expectation_folder = self.ask_folder_inside(
            repo,
            "Select target folder for Expectation file",
            "Expectation target folder",
        )?;

        Ok((
            self.copy_into(&checkpoint, &checkpoint_folder).await?,
            self.copy_into(&expectation, &expectation_folder).await?,
        ))
    }

    /// Add a change-set for the staged migrations. Returns the changelog path
    /// when it was updated. Skipping or failing here never fails the run.
    #[instrument(skip_all)]
    async fn update_changelog(
        &self,
        request: &WorkflowRequest,
        up: &Path,
        down: &Path,
    ) -> Option<PathBuf> {
        let choices = ObjectType::CHOICES.map(|object_type| object_type.to_string());
        let Some(Ok(object_type)) = self
            .prompt
            .select("Select the DB object type for the changelog", &choices)
            .and_then(|index| choices.get(index))
            .map(|label| label.parse::<ObjectType>())
        else {
            self.prompt
                .info("Changelog update skipped (no DB object type selected)");
            return None;
        };
        let Some(changelog) = self.prompt.ask_file("Select changelog.xml file") else {
            self.prompt.info("No changelog selected; skipping update");
            return None;
        };

        match self
            .write_change_set(request, object_type, &changelog, up, down)
            .await
        {
            Ok(changelog) => {
                self.prompt.info("Changelog updated successfully");
                self.prompt.open_path(&changelog);
                Some(changelog)
            }
            Err(e) => {
                self.prompt
                    .error(&format!("Failed to update changelog file:\n{e}"));
                None
            }
        }
    }

    async fn write_change_set(
        &self,
        request: &WorkflowRequest,
        object_type: ObjectType,
        changelog: &Path,
        up: &Path,
        down: &Path,
    ) -> Result<PathBuf> {
        let changelog = paths::normalize(changelog)?;
        let changelog_dir = changelog
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent directory", changelog.display()))?;

        let (up_ref, down_ref) = if object_type.uses_relative_paths() {
            (
                paths::to_slash(&paths::relative_path(up, changelog_dir)?),
                paths::to_slash(&paths::relative_path(down, changelog_dir)?),
            )
        } else {
            (file_name(up), file_name(down))
        };

        let entry = ChangelogEntry::new(
            &self.config.username,
            &request.story_id,
            up_ref,
            down_ref,
            object_type,
        );
        changelog::append_to_file(&changelog, &entry.render()).await?;
        info!("Added change-set {} to {}", entry.id(), changelog.display());
        Ok(changelog)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
