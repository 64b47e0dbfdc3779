use std::sync::LazyLock;

use regex::Regex;

/// Matches GitHub remotes in https, ssh and scp-like form.
static GITHUB_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(github\.com)[/:]([^/]+)/([^/]+?)(?:\.git)?/?$").expect("valid regex")
});

/// "Create pull request" page for `branch` on the repository behind
/// `remote_url`. Returns `None` when the remote is not a recognised host.
pub fn pull_request_url(remote_url: &str, branch: &str) -> Option<String> {
    let caps = GITHUB_REMOTE.captures(remote_url.trim())?;
    Some(format!(
        "https://{}/{}/{}/pull/new/{}",
        &caps[1], &caps[2], &caps[3], branch
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_remote() {
        assert_eq!(
            pull_request_url("https://github.com/acme/warehouse.git", "ST1_feature").as_deref(),
            Some("https://github.com/acme/warehouse/pull/new/ST1_feature")
        );
        assert_eq!(
            pull_request_url("https://github.com/acme/warehouse\n", "ST1_feature").as_deref(),
            Some("https://github.com/acme/warehouse/pull/new/ST1_feature")
        );
    }

    #[test]
    fn test_ssh_remotes() {
        assert_eq!(
            pull_request_url("git@github.com:acme/warehouse.git", "b").as_deref(),
            Some("https://github.com/acme/warehouse/pull/new/b")
        );
        assert_eq!(
            pull_request_url("ssh://git@github.com/acme/warehouse", "b").as_deref(),
            Some("https://github.com/acme/warehouse/pull/new/b")
        );
    }

    #[test]
    fn test_unrecognised_remote() {
        assert_eq!(pull_request_url("https://gitlab.com/acme/warehouse.git", "b"), None);
        assert_eq!(pull_request_url("/srv/git/warehouse.git", "b"), None);
        assert_eq!(pull_request_url("", "b"), None);
    }
}
