//! Command parsing

use thiserror::Error;

/// Command parsing error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to an open context whose title or location contains `filter`
    Buffer { filter: String },
}

/// Short forms and the command they stand for
pub const ALIASES: &[(&str, &str)] = &[("b", "buffer"), ("buf", "buffer")];

/// Command parser
pub struct CommandParser;

impl CommandParser {
    /// Parses a command line
    ///
    /// Surrounding whitespace and one leading `:` are ignored. Returns
    /// `Ok(None)` when nothing is left, which closes the command line.
    pub fn parse(raw: &str) -> Result<Option<Command>, CommandError> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix(':').unwrap_or(trimmed).trim();
        if body.is_empty() {
            return Ok(None);
        }

        let mut words = body.split_whitespace();
        let name = match words.next() {
            Some(word) => word.to_lowercase(),
            None => return Ok(None),
        };
        let args = words.collect::<Vec<_>>().join(" ");

        match Self::canonical(&name) {
            "buffer" => Ok(Some(Command::Buffer { filter: args })),
            _ => Err(CommandError::UnknownCommand(name)),
        }
    }

    /// Resolves an alias to its full command name
    pub fn canonical(name: &str) -> &str {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, full)| *full)
            .unwrap_or(name)
    }
}
