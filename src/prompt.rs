//! User interaction.
//!
//! The workflow only talks to the user through [`Prompt`], which keeps it
//! independent of how questions are presented. [`TerminalPrompt`] is the
//! interactive implementation.

use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use colored::Colorize;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Select;
#[cfg(test)]
use mockall::automock;

/// Questions and notifications the workflow needs from its user.
///
/// Every `ask_*` method returns `None` when the user cancels or leaves the
/// answer empty.
#[cfg_attr(test, automock)]
pub trait Prompt {
    /// Free text. An empty `default` means no default.
    fn ask_text(&self, title: &str, default: &str) -> Option<String>;
    /// An existing file.
    fn ask_file(&self, title: &str) -> Option<PathBuf>;
    /// An existing directory.
    fn ask_folder(&self, title: &str) -> Option<PathBuf>;
    /// Index of one of `items`.
    fn select(&self, title: &str, items: &[String]) -> Option<usize>;
    fn confirm(&self, message: &str) -> bool;

    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Open a file in the user's default application.
    fn open_path(&self, path: &Path);
    /// Present a link the user can follow.
    fn show_link(&self, url: &str);
}

// -----------------------------------------------------------------------------
// TerminalPrompt

/// [`Prompt`] backed by `dialoguer` on the controlling terminal.
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ask_path(&self, title: &str, is_valid: fn(&Path) -> bool, kind: &str) -> Option<PathBuf> {
        let path = PathBuf::from(self.ask_text(title, "")?);
        if !is_valid(&path) {
            self.error(&format!("{} is not an existing {}", path.display(), kind));
            return None;
        }
        Some(path)
    }

    fn open(&self, target: &OsStr) {
        let (program, args) = opener_command();
        let result = std::process::Command::new(program)
            .args(args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = result {
            self.error(&format!(
                "Could not open {}:\n{}",
                target.to_string_lossy(),
                e
            ));
        }
    }
}

impl Prompt for TerminalPrompt {
    fn ask_text(&self, title: &str, default: &str) -> Option<String> {
        let mut input = Input::<String>::new().with_prompt(title).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text().ok()?;
        let answer = answer.trim();
        (!answer.is_empty()).then(|| answer.to_string())
    }

    fn ask_file(&self, title: &str) -> Option<PathBuf> {
        self.ask_path(title, Path::is_file, "file")
    }

    fn ask_folder(&self, title: &str) -> Option<PathBuf> {
        self.ask_path(title, Path::is_dir, "folder")
    }

    fn select(&self, title: &str, items: &[String]) -> Option<usize> {
        Select::new()
            .with_prompt(title)
            .items(items)
            .default(0)
            .interact_opt()
            .ok()
            .flatten()
    }

    fn confirm(&self, message: &str) -> bool {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn info(&self, message: &str) {
        println!("{}", message.green());
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.red().bold());
    }

    fn open_path(&self, path: &Path) {
        self.open(path.as_os_str());
    }

    fn show_link(&self, url: &str) {
        println!("Pull request URL: {}", url.blue().underline());
        if self.confirm("Open it in the browser?") {
            self.open(OsStr::new(url));
        }
    }
}

/// Platform command that hands a path or URL to its default application.
pub fn opener_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else if cfg!(target_os = "macos") {
        ("open", &[])
    } else {
        ("xdg-open", &[])
    }
}
