//! Line input for the interactive menu
//!
//! A terminal gets dialoguer prompts (PINs without echo). Piped stdin is read
//! line by line so scripted sessions work too.

use std::fmt;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use dialoguer::{Input, Password};

/// Stdin reached end of input
#[derive(Debug)]
pub struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("input closed")
    }
}

impl std::error::Error for InputClosed {}

pub trait Prompt {
    /// Read one trimmed line of visible input
    fn text(&mut self, label: &str) -> Result<String>;

    /// Read one trimmed line without echoing it where possible
    fn secret(&mut self, label: &str) -> Result<String>;
}

/// Map a closed terminal to `InputClosed`; anything else stays an error
fn terminal_error(err: dialoguer::Error) -> anyhow::Error {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::UnexpectedEof => InputClosed.into(),
        other => other.into(),
    }
}

/// dialoguer-backed prompt for interactive terminals
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn text(&mut self, label: &str) -> Result<String> {
        let value: String = Input::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(terminal_error)?;
        Ok(value.trim().to_string())
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        let value = Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(terminal_error)?;
        Ok(value.trim().to_string())
    }
}

/// Plain line reader for piped input
pub struct LinePrompt<R, W> {
    input: R,
    echo: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Labels are written to `echo` before each read
    pub fn new(input: R, echo: W) -> Self {
        Self { input, echo }
    }

    fn read_line(&mut self, label: &str) -> Result<String> {
        write!(self.echo, "{}: ", label)?;
        self.echo.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn text(&mut self, label: &str) -> Result<String> {
        self.read_line(label)
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        self.read_line(label)
    }
}
