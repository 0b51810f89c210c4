// UI layer: the interactive menu loop plus the prompts it reads from.
// Input goes through the `Prompt` trait and output through any `Write`, so
// the loop runs the same against a terminal or a test script.

use crate::api::Transport;
use crate::error::{Error, Result};
use crate::menu::{self, Command};
use crate::ops;
use crate::session::Session;
use dialoguer::{Input, Password};
use std::io::Write;
use tracing::debug;

/// Source of operator answers.
pub trait Prompt {
    /// Read one line of visible text. May be empty.
    fn line(&mut self, prompt: &str) -> Result<String>;

    /// Read one line without echoing it.
    fn secret(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts backed by `dialoguer`.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn line(&mut self, prompt: &str) -> Result<String> {
        // Empty answers are let through so the operations can reject them.
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        let value = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(value)
    }
}

/// Parse a menu selection.
pub fn parse_selector(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InputParse(raw.trim().to_string()))
}

/// Main interactive menu. Shows the menu, reads a selector and dispatches
/// until the operator picks Exit.
///
/// Operation failures are printed and the loop carries on. Only a failure
/// to read operator input (for example end of input) ends it early.
pub fn main_menu<T: Transport, W: Write>(
    session: &mut Session<T>,
    prompt: &mut dyn Prompt,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out)?;
        for entry in menu::entries(session.group()) {
            writeln!(out, "{}", entry)?;
        }

        let raw = prompt.line("Enter your choice")?;
        let selector = match parse_selector(&raw) {
            Ok(selector) => selector,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };
        let Some(command) = Command::from_selector(selector) else {
            writeln!(out, "Option {} is not defined, try again", selector)?;
            continue;
        };
        if command.is_exit() {
            debug!("exit selected");
            break;
        }

        writeln!(out, "{}", command.label(session.group()))?;
        match ops::execute(command, session, prompt) {
            Ok(outcome) => writeln!(out, "{}", outcome)?,
            Err(Error::Io(e)) => return Err(Error::Io(e)),
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
    Ok(())
}
