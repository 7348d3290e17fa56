//! Headless and interactive command sessions.

use std::io::{BufRead, Write};

use zonecal_core::CalendarRegistry;

use crate::cli::OutputFormat;
use crate::command::{self, Command};
use crate::error::{Result, SessionError};

const PROMPT: &str = "> ";

/// A registry plus the output settings commands run with.
#[derive(Debug)]
pub struct Session {
    registry: CalendarRegistry,
    format: OutputFormat,
}

impl Session {
    pub fn new(registry: CalendarRegistry, format: OutputFormat) -> Self {
        Self { registry, format }
    }

    pub fn registry(&self) -> &CalendarRegistry {
        &self.registry
    }

    /// Runs one command line. Returns `None` when the line ends the session.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<String>> {
        let command = command::parse(line)?;
        if command == Command::Exit {
            return Ok(None);
        }

        tracing::debug!(?command, "Running command");
        command::execute(&mut self.registry, command, self.format).map(Some)
    }

    /// Runs a script, one command per line, skipping blank lines.
    ///
    /// Stops at an exit command or at the first failing line, which is reported with
    /// its 1-based line number. Returns the number of commands run.
    pub fn run_headless<R, W>(
        &mut self,
        input: R,
        out: &mut W,
    ) -> std::result::Result<usize, SessionError>
    where
        R: BufRead,
        W: Write,
    {
        let mut count = 0;

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.handle_line(line) {
                Ok(None) => break,
                Ok(Some(output)) => write_output(out, &output)?,
                Err(source) => {
                    return Err(SessionError::Command {
                        line: index + 1,
                        source,
                    })
                }
            }
            count += 1;
        }

        Ok(count)
    }

    /// Reads commands with a prompt until exit or end of input. Failing commands are
    /// reported and the session carries on.
    pub fn run_interactive<R, W>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> std::result::Result<(), SessionError>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "zonecal interactive mode. Type quit to exit.")?;

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.handle_line(line) {
                Ok(None) => break,
                Ok(Some(output)) => write_output(out, &output)?,
                Err(error) => {
                    tracing::debug!(%error, "Command failed");
                    writeln!(out, "Error: {error}")?;
                }
            }
        }

        writeln!(out, "Calendar closed.")?;
        Ok(())
    }
}

fn write_output<W: Write>(out: &mut W, output: &str) -> std::io::Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    writeln!(out, "{output}")
}
