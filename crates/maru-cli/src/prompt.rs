use std::io;

use console::Term;
use dialoguer::{Confirm, Input, Select};
use maru_core::{Error, Prompter};

/// Restore the cursor dialoguer may have hidden and classify the failure.
///
/// Only Ctrl-C counts as a cancellation; any other terminal error is fatal.
fn handle_interrupt(err: dialoguer::Error) -> Error {
    let _ = Term::stdout().show_cursor();
    classify(err)
}

fn classify(err: dialoguer::Error) -> Error {
    match &err {
        dialoguer::Error::IO(source) if source.kind() == io::ErrorKind::Interrupted => {
            tracing::debug!(error = %err, "prompt interrupted");
            Error::Interrupted
        }
        _ => {
            tracing::debug!(error = %err, "prompt failed");
            Error::Prompt(err.to_string())
        }
    }
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, message: &str, default: &str) -> maru_core::Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_owned());
        }
        input.interact_text().map_err(handle_interrupt)
    }

    fn confirm(&mut self, message: &str, default: bool) -> maru_core::Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(handle_interrupt)
    }

    fn select(&mut self, message: &str, options: &[&str], default: usize) -> maru_core::Result<usize> {
        Select::new()
            .with_prompt(message)
            .items(options)
            .default(default)
            .interact()
            .map_err(handle_interrupt)
    }

    /// Reads lines until an empty one. An immediately empty answer keeps `default`.
    fn multiline(&mut self, message: &str, default: &str) -> maru_core::Result<String> {
        println!("{message}");
        if default.is_empty() {
            println!("{}", console::style("(finish with an empty line)").dim());
        } else {
            println!(
                "{}",
                console::style(format!(
                    "(finish with an empty line; leave empty to keep: {default})"
                ))
                .dim()
            );
        }

        let mut lines = Vec::new();
        loop {
            let line = Input::<String>::new()
                .with_prompt(">")
                .allow_empty(true)
                .interact_text()
                .map_err(handle_interrupt)?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }

        if lines.is_empty() {
            Ok(default.to_owned())
        } else {
            Ok(lines.join("\n"))
        }
    }
}
