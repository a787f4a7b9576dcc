//! # Console Commands
//!
//! ## Command Set
//!
//! - `<keys>` - Key notation typed into the page
//! - `.tick <ms>` - Advance simulated time
//! - `.load <id>` - The context finished loading
//! - `.activate <id>` - The user switched to a context
//! - `.close <id>` - The user closed a context
//! - `.clip <text>` - Replace the clipboard contents
//! - `.hold <request>` - Hold requests of one kind until `.release`
//! - `.release` - Answer held requests
//! - `.overlay` - Print what is drawn over the page
//! - `.page` - Print the page location and scroll position
//! - `.tabs` - List open contexts
//! - `.logs` - Print engine log entries recorded since the last `.logs`

use core_types::ContextId;
use host_api::Page;
use services_keynav::Engine;
use sim_host::{RequestFault, SimHost};
use thiserror::Error;

/// Console command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleCommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// Console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Keys(String),
    Tick { millis: u64 },
    Load { context: ContextId },
    Activate { context: ContextId },
    Close { context: ContextId },
    Clip { text: String },
    Hold { request: String },
    Release,
    Overlay,
    Page,
    Tabs,
    Logs,
}

impl ConsoleCommand {
    /// Parses one input line
    ///
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleCommandError> {
        let Some(rest) = line.trim_end().strip_prefix('.') else {
            return Ok((!line.trim().is_empty()).then(|| ConsoleCommand::Keys(line.trim_end().to_string())));
        };

        let (name, argument) = match rest.split_once(' ') {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "tick" => ConsoleCommand::Tick {
                millis: number(name, argument)?,
            },
            "load" => ConsoleCommand::Load {
                context: ContextId::new(number(name, argument)?),
            },
            "activate" => ConsoleCommand::Activate {
                context: ContextId::new(number(name, argument)?),
            },
            "close" => ConsoleCommand::Close {
                context: ContextId::new(number(name, argument)?),
            },
            "clip" => ConsoleCommand::Clip {
                text: argument.to_string(),
            },
            "hold" => ConsoleCommand::Hold {
                request: required(name, argument)?.to_string(),
            },
            "release" => ConsoleCommand::Release,
            "overlay" => ConsoleCommand::Overlay,
            "page" => ConsoleCommand::Page,
            "tabs" => ConsoleCommand::Tabs,
            "logs" => ConsoleCommand::Logs,
            other => return Err(ConsoleCommandError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(name: &str, argument: &'a str) -> Result<&'a str, ConsoleCommandError> {
    if argument.is_empty() {
        Err(ConsoleCommandError::MissingArgument(name.to_string()))
    } else {
        Ok(argument)
    }
}

fn number(name: &str, argument: &str) -> Result<u64, ConsoleCommandError> {
    required(name, argument)?
        .parse()
        .map_err(|_| ConsoleCommandError::InvalidNumber(argument.to_string()))
}

/// Runs console commands against a simulated host
pub struct CommandHandler {
    pub host: SimHost<Engine>,
}

impl CommandHandler {
    pub fn new(host: SimHost<Engine>) -> Self {
        Self { host }
    }

    /// Parses and runs one line, returning the text to print
    pub fn execute_line(&mut self, line: &str) -> Result<String, String> {
        match ConsoleCommand::parse(line).map_err(|e| e.to_string())? {
            Some(command) => self.execute(command),
            None => Ok(String::new()),
        }
    }

    pub fn execute(&mut self, command: ConsoleCommand) -> Result<String, String> {
        match command {
            ConsoleCommand::Keys(notation) => {
                let dispatches = self
                    .host
                    .press(&notation)
                    .map_err(|e| e.to_string())?;
                let passed = dispatches.iter().filter(|d| !d.consumed).count();
                let mut output = self.status_line();
                if passed > 0 {
                    output.push_str(&format!("\n({} key(s) passed to the page)", passed));
                }
                Ok(output)
            }
            ConsoleCommand::Tick { millis } => {
                self.host.advance(millis);
                Ok(format!("t={}ms {}", self.host.now().as_millis(), self.status_line()))
            }
            ConsoleCommand::Load { context } => {
                self.host
                    .finish_loading(context)
                    .map_err(|e| e.to_string())?;
                Ok(format!("Context {} loaded", context))
            }
            ConsoleCommand::Activate { context } => {
                self.host.activate(context).map_err(|e| e.to_string())?;
                Ok(format!("Context {} active", context))
            }
            ConsoleCommand::Close { context } => {
                self.host.close(context).map_err(|e| e.to_string())?;
                Ok(format!("Context {} closed", context))
            }
            ConsoleCommand::Clip { text } => {
                self.host.set_clipboard(text);
                Ok("Clipboard set".to_string())
            }
            ConsoleCommand::Hold { request } => {
                let output = format!("Holding {}", request);
                self.host.add_fault(RequestFault::Hold { request });
                Ok(output)
            }
            ConsoleCommand::Release => {
                let held = self.host.held();
                self.host.release_held();
                Ok(format!("Released {} request(s)", held))
            }
            ConsoleCommand::Overlay => {
                let overlay = self.host.client().overlay(self.host.page());
                let mut output = overlay.render_text();
                output.push_str(&overlay.render_status_line());
                Ok(output)
            }
            ConsoleCommand::Page => {
                let page = self.host.page();
                let scroll = page.scroll_position();
                Ok(format!("{} @ ({}, {})", page.url(), scroll.x, scroll.y))
            }
            ConsoleCommand::Tabs => Ok(self.tabs()),
            ConsoleCommand::Logs => Ok(self
                .host
                .client_mut()
                .logger_mut()
                .drain()
                .iter()
                .map(|entry| entry.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn status_line(&self) -> String {
        self.host
            .client()
            .overlay(self.host.page())
            .render_status_line()
    }

    fn tabs(&self) -> String {
        let active = self.host.active();
        self.host
            .contexts()
            .iter()
            .map(|context| {
                let marker = if context.id == active { "*" } else { " " };
                let loading = if self.host.is_loading(context.id) {
                    " (loading)"
                } else {
                    ""
                };
                format!(
                    "{} [{}] {} {}{}",
                    marker,
                    context.id.as_u64(),
                    context.title,
                    context.url,
                    loading
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ConsoleCommand::parse("jj").unwrap(),
            Some(ConsoleCommand::Keys("jj".to_string()))
        );
        assert_eq!(ConsoleCommand::parse("   ").unwrap(), None);
        assert_eq!(
            ConsoleCommand::parse(".tick 1500").unwrap(),
            Some(ConsoleCommand::Tick { millis: 1500 })
        );
        assert_eq!(
            ConsoleCommand::parse(".load 4").unwrap(),
            Some(ConsoleCommand::Load {
                context: ContextId::new(4)
            })
        );
        assert_eq!(
            ConsoleCommand::parse(".clip https://x.test/").unwrap(),
            Some(ConsoleCommand::Clip {
                text: "https://x.test/".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            ConsoleCommand::parse(".bogus"),
            Err(ConsoleCommandError::UnknownCommand("bogus".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse(".tick"),
            Err(ConsoleCommandError::MissingArgument("tick".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse(".tick soon"),
            Err(ConsoleCommandError::InvalidNumber("soon".to_string()))
        );
    }

    #[test]
    fn test_keys_report_status_line() {
        let mut handler = CommandHandler::new(bootstrap());
        assert_eq!(handler.execute_line("g").unwrap(), "NORMAL g");
        assert!(handler
            .execute_line("q")
            .unwrap()
            .contains("passed to the page"));
    }

    #[test]
    fn test_page_and_logs() {
        let mut handler = CommandHandler::new(bootstrap());
        handler.execute_line("jj").unwrap();
        assert_eq!(
            handler.execute_line(".page").unwrap(),
            "https://alpha.test/docs/guide @ (0, 150)"
        );

        handler.execute_line("<S-Esc>").unwrap();
        let logs = handler.execute_line(".logs").unwrap();
        assert!(logs.contains("Keynav disabled"));
        assert_eq!(handler.execute_line(".logs").unwrap(), "");
    }

    #[test]
    fn test_bad_notation_is_reported() {
        let mut handler = CommandHandler::new(bootstrap());
        assert!(handler.execute_line("<Nope>").is_err());
    }

    #[test]
    fn test_hold_and_release() {
        let mut handler = CommandHandler::new(bootstrap());
        handler.execute_line(".hold tabs.list").unwrap();
        handler.execute_line(":b beta<CR>").unwrap();
        assert_eq!(handler.execute_line(".release").unwrap(), "Released 1 request(s)");
        assert!(handler.execute_line(".tabs").unwrap().contains("* [2] Beta"));
    }
}
