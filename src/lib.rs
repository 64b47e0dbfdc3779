mod app;
pub mod changelog;
pub mod clients;
pub mod commands;
pub mod config;
pub mod error;
pub mod paths;
pub mod prompt;
pub mod pull_request;
pub mod repository;
pub mod workflow;

#[cfg(test)]
mod testutil;

// Re-export App and Config from modules
pub use app::App;
pub use config::Config;
pub use error::Error;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
