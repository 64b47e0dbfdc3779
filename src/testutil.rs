//! Shared test doubles.

use std::cell::RefCell;

use crate::clients::runner::Cmd;
use crate::clients::runner::CommandOutput;
use crate::clients::runner::CommandRunner;

/// Runner that records every command and answers from a table of canned
/// responses. Commands with no matching response succeed with empty output.
pub struct FakeRunner {
    responses: Vec<(Vec<String>, CommandOutput)>,
    pub calls: RefCell<Vec<Cmd>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            responses: vec![],
            calls: RefCell::new(vec![]),
        }
    }

    /// Answer commands whose program and leading arguments equal `prefix`.
    /// Earlier responses win.
    pub fn with_response(mut self, prefix: &[&str], success: bool, output: &str) -> Self {
        self.responses.push((
            prefix.iter().map(|s| s.to_string()).collect(),
            CommandOutput {
                success,
                output: output.to_string(),
            },
        ));
        self
    }

    /// Every recorded command on its own line.
    pub fn transcript(&self) -> String {
        self.calls
            .borrow()
            .iter()
            .map(|cmd| cmd.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn ran(&self, prefix: &[&str]) -> bool {
        self.calls.borrow().iter().any(|cmd| matches(cmd, prefix))
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, cmd: &Cmd) -> CommandOutput {
        self.calls.borrow_mut().push(cmd.clone());
        self.responses
            .iter()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                matches(cmd, &prefix)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                success: true,
                output: String::new(),
            })
    }
}

fn matches(cmd: &Cmd, prefix: &[&str]) -> bool {
    let words = std::iter::once(cmd.program.as_str()).chain(cmd.args.iter().map(String::as_str));
    let words: Vec<&str> = words.collect();
    words.len() >= prefix.len() && words.iter().zip(prefix).all(|(a, b)| a == b)
}
