use std::fmt::Display;

/// Separator between story id and branch suffix. A branch name that already
/// contains it is used verbatim.
pub const BRANCH_SEPARATOR: char = '_';

/// Integration branch new work is branched from.
pub const DEFAULT_BASE_BRANCH: &str = "dev";

/// Which pair of artifacts a run stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WorkflowMode {
    /// Up/down migration files plus an optional changelog entry.
    DbObjects,
    /// Checkpoint and expectation script files.
    GenericScripts,
}

impl WorkflowMode {
    pub const ALL: [WorkflowMode; 2] = [WorkflowMode::DbObjects, WorkflowMode::GenericScripts];
}

impl Display for WorkflowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowMode::DbObjects => f.write_str("DB Objects"),
            WorkflowMode::GenericScripts => f.write_str("Generic Scripts"),
        }
    }
}

/// Inputs for a single run. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRequest {
    pub story_id: String,
    pub branch_name: String,
    pub commit_headline: String,
    pub mode: WorkflowMode,
    pub base_branch: String,
}

impl WorkflowRequest {
    /// Name of the branch the run creates and pushes.
    pub fn full_branch(&self) -> String {
        full_branch_name(&self.story_id, &self.branch_name)
    }

    pub fn commit_message(&self) -> String {
        format!("AB#{}: {}", self.story_id, self.commit_headline)
    }
}

pub fn full_branch_name(story_id: &str, branch: &str) -> String {
    if branch.contains(BRANCH_SEPARATOR) {
        branch.to_string()
    } else {
        format!("{story_id}{BRANCH_SEPARATOR}{branch}")
    }
}

/// Branch suggested when the user gives none.
pub fn default_branch_name(story_id: &str, username: &str) -> String {
    format!("{story_id}{BRANCH_SEPARATOR}{username}")
}

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Committed and pushed. The link is absent when the remote host is not
    /// recognised.
    Completed {
        branch: String,
        pull_request_url: Option<String>,
    },
    /// Staging left the working tree unchanged.
    NothingToCommit,
    /// The user declined the commit.
    Declined,
}
