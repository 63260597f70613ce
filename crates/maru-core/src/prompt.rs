//! Prompt abstraction used by the interactive setup.
//!
//! The CLI supplies a terminal implementation; [`ScriptedPrompter`] replays a
//! fixed list of answers so setup flows can run without a TTY.

use std::collections::VecDeque;

use crate::{Error, Result};

/// One method per kind of input the setup flow asks for.
pub trait Prompter {
    /// Single-line text, pre-filled with `default`.
    fn input(&mut self, message: &str, default: &str) -> Result<String>;

    /// Yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Pick one of `options`; returns the selected index.
    fn select(&mut self, message: &str, options: &[&str], default: usize) -> Result<usize>;

    /// Free-form text spanning several lines.
    fn multiline(&mut self, message: &str, default: &str) -> Result<String>;
}

/// Replays queued answers in order.
///
/// An empty answer accepts the prompt's default. Confirm answers are parsed
/// as `y`/`yes`/`true` or `n`/`no`/`false`; select answers name the option text.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Messages of every prompt shown so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers that were queued but never consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("no scripted answer for '{message}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        let answer = self.next(message)?;
        if answer.is_empty() {
            Ok(default.to_owned())
        } else {
            Ok(answer)
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let answer = self.next(message)?;
        match answer.to_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" | "true" => Ok(true),
            "n" | "no" | "false" => Ok(false),
            other => Err(Error::Prompt(format!(
                "'{other}' is not a yes/no answer for '{message}'"
            ))),
        }
    }

    fn select(&mut self, message: &str, options: &[&str], default: usize) -> Result<usize> {
        let answer = self.next(message)?;
        if answer.is_empty() {
            return Ok(default);
        }
        options
            .iter()
            .position(|o| *o == answer)
            .ok_or_else(|| Error::Prompt(format!("'{answer}' is not an option for '{message}'")))
    }

    fn multiline(&mut self, message: &str, default: &str) -> Result<String> {
        self.input(message, default)
    }
}
