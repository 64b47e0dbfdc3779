//! Lexical path helpers.
//!
//! Nothing here touches the filesystem beyond reading the current directory,
//! so paths that do not exist yet are handled the same as existing ones.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Make `path` absolute and fold away `.` and `..` components.
pub fn normalize(path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path.as_ref())?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Whether `folder` is `root` itself or somewhere below it.
///
/// Comparison is per path component, so `/work/repo2` is not inside
/// `/work/repo`.
pub fn is_inside(folder: &Path, root: &Path) -> bool {
    match (normalize(folder), normalize(root)) {
        (Ok(folder), Ok(root)) => folder.starts_with(root),
        _ => false,
    }
}

/// Path of `target` relative to the directory `base`.
///
/// Falls back to the absolute target when the two share no common root
/// (different drives on Windows).
pub fn relative_path(target: &Path, base: &Path) -> std::io::Result<PathBuf> {
    let target = normalize(target)?;
    let base = normalize(base)?;

    let target_components: Vec<_> = target.components().collect();
    let base_components: Vec<_> = base.components().collect();
    let common = target_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 {
        return Ok(target);
    }

    let mut out = PathBuf::new();
    for _ in common..base_components.len() {
        out.push("..");
    }
    for component in &target_components[common..] {
        out.push(component);
    }
    Ok(out)
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(
            normalize("/work/repo/./db/../scripts").unwrap(),
            PathBuf::from("/work/repo/scripts")
        );
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize("db").unwrap(), cwd.join("db"));
    }

    #[test]
    fn test_is_inside() {
        let root = Path::new("/work/repo");
        assert!(is_inside(Path::new("/work/repo"), root));
        assert!(is_inside(Path::new("/work/repo/"), root));
        assert!(is_inside(Path::new("/work/repo/db/tables"), root));
        assert!(is_inside(Path::new("/work/repo/db/../scripts"), root));

        assert!(!is_inside(Path::new("/work"), root));
        assert!(!is_inside(Path::new("/work/other"), root));
        assert!(!is_inside(Path::new("/work/repo2"), root));
        assert!(!is_inside(Path::new("/work/repo/../other"), root));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(
                Path::new("/work/repo/db/tables/up.sql"),
                Path::new("/work/repo/db")
            )
            .unwrap(),
            PathBuf::from("tables/up.sql")
        );
        assert_eq!(
            relative_path(
                Path::new("/work/repo/db/tables/up.sql"),
                Path::new("/work/repo/changelog")
            )
            .unwrap(),
            PathBuf::from("../db/tables/up.sql")
        );
        assert_eq!(
            relative_path(Path::new("/work/repo/up.sql"), Path::new("/work/repo")).unwrap(),
            PathBuf::from("up.sql")
        );
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("db/tables/up.sql")), "db/tables/up.sql");
        assert_eq!(to_slash(Path::new(r"db\tables\up.sql")), "db/tables/up.sql");
    }
}
