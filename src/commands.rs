//! Subcommand implementations, one `impl App` block per file.

pub mod clone;
pub mod init;
pub mod run;
pub mod select;
