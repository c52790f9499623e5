//! Input providers used to fill missing configuration leaves.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Supplies a value for a configuration leaf nothing else defines.
///
/// Implementations may block (an interactive terminal is the usual caller).
/// Returning an empty string is allowed; reconciliation stores whatever the
/// provider answers.
pub trait InputProvider {
    /// Ask for the value labelled `label` (a dotted path such as `db.port`).
    ///
    /// # Errors
    ///
    /// Returns an error if no value can be obtained.
    fn prompt_for_value(&mut self, label: &str) -> Result<String>;
}

/// Prompts on stderr and reads one line from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl InputProvider for StdinPrompt {
    fn prompt_for_value(&mut self, label: &str) -> Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "Missing meta({label}):")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(Error::configuration(format!(
                "missing meta({label}): input closed"
            )));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

/// Answers prompts from a queue, recording every label asked.
///
/// # Examples
///
/// ```
/// use kard::reconcile::{InputProvider, ScriptedInput};
///
/// let mut input = ScriptedInput::new(["42"]);
/// assert_eq!(input.prompt_for_value("db.port").unwrap(), "42");
/// assert!(input.prompt_for_value("db.user").is_err());
/// assert_eq!(input.asked(), ["db.port", "db.user"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedInput {
    /// Queue `answers`, handed out in order.
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

    /// Labels prompted so far, in order.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl InputProvider for ScriptedInput {
    fn prompt_for_value(&mut self, label: &str) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::configuration(format!("missing meta({label}): no answer left")))
    }
}

/// Refuses every prompt; used when running non-interactively.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputProvider for NoInput {
    fn prompt_for_value(&mut self, label: &str) -> Result<String> {
        Err(Error::configuration(format!(
            "missing meta({label}) and interactive input is disabled"
        )))
    }
}
