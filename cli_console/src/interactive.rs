//! Interactive loop
//!
//! Reads lines from any [`BufRead`] and writes results to any [`Write`], so
//! the same loop serves stdin, script files and tests.

use crate::commands::CommandHandler;
use std::io::{self, BufRead, Write};

/// Interactive console
pub struct InteractiveConsole {
    handler: CommandHandler,
    /// Echo each line before its output (for scripts)
    echo: bool,
}

impl InteractiveConsole {
    pub fn new(handler: CommandHandler) -> Self {
        Self {
            handler,
            echo: false,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    /// Processes lines until the input ends or a line reads `.quit`
    ///
    /// Command errors are printed and do not stop the loop. `#` starts a
    /// comment line.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<usize> {
        let mut processed = 0;
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.starts_with('#') {
                continue;
            }
            if trimmed == ".quit" {
                break;
            }

            if self.echo {
                writeln!(output, "> {}", line)?;
            }
            match self.handler.execute_line(&line) {
                Ok(text) if text.is_empty() => {}
                Ok(text) => writeln!(output, "{}", text)?,
                Err(err) => writeln!(output, "Error: {}", err)?,
            }
            processed += 1;
        }
        output.flush()?;
        Ok(processed)
    }
}
