use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

use log::debug;

use crate::clients::git;
use crate::clients::git::Transcript;
use crate::clients::runner::CommandRunner;
use crate::error::Error;
use crate::error::Result;
use crate::paths;

/// Directory name used when a clone URL has no path segment to borrow from.
pub const FALLBACK_REPO_NAME: &str = "cloned_repo";

/// Absolute path to the root of a git working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle(PathBuf);

impl RepositoryHandle {
    /// Validate that `path` is a working tree root, i.e. contains `.git`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = paths::normalize(path)?;
        if !path.join(".git").exists() {
            return Err(Error::NotARepository(path));
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Whether `folder` lies inside this working tree.
    pub fn contains(&self, folder: &Path) -> bool {
        paths::is_inside(folder, &self.0)
    }

    /// Path of `file` relative to the repository root, as git expects it.
    pub fn relative(&self, file: &Path) -> Result<PathBuf> {
        Ok(paths::relative_path(file, &self.0)?)
    }
}

impl Display for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Local directory name for a clone of `url`: the last path segment without
/// a trailing `.git`.
pub fn derive_repo_name(url: &str) -> String {
    let url = url.trim();
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        // scp-like syntax: git@host:owner/repo.git
        None => match url.split_once(':') {
            Some((host, path)) if host.contains('@') => path,
            _ => url,
        },
    };

    path.split(['/', '\\'])
        .rev()
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_REPO_NAME.to_string())
}

/// Clone `url` into a new directory under `dest` named after the repository.
pub async fn clone_repository<R: CommandRunner>(
    runner: &R,
    url: &str,
    dest: &Path,
) -> Result<(RepositoryHandle, Transcript)> {
    let target = paths::normalize(dest.join(derive_repo_name(url)))?;
    tokio::fs::create_dir_all(&target).await?;
    let transcript = git::clone(runner, url, &target).await?;
    Ok((RepositoryHandle::open(&target)?, transcript))
}

/// Immediate subdirectories of `folder` that are git working trees, sorted by
/// path.
pub async fn find_repositories(folder: &Path) -> Result<Vec<RepositoryHandle>> {
    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut repos = vec![];
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        match RepositoryHandle::open(&path) {
            Ok(repo) => repos.push(repo),
            Err(_) => debug!("Skipping {}: not a repository", path.display()),
        }
    }
    repos.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(repos)
}
