//! # Command Line Service
//!
//! The `:` command line of the keynav engine.
//!
//! ## Philosophy
//!
//! - **Tiny grammar**: A command name, an alias table, and one free-text
//!   argument
//! - **Multi-turn**: An ambiguous query becomes a numbered list and the next
//!   submission picks from it
//! - **Effects, not calls**: The command line never talks to the host; it
//!   returns [`Effect`]s and is told the results
//!
//! ## Example
//!
//! ```
//! use services_command_line::{Command, CommandParser};
//!
//! assert_eq!(
//!     CommandParser::parse(":b  Alpha  docs"),
//!     Ok(Some(Command::Buffer { filter: "Alpha docs".to_string() }))
//! );
//! assert_eq!(CommandParser::parse("  :  "), Ok(None));
//! ```

pub mod commands;
pub mod filter;
pub mod line;

pub use commands::{Command, CommandError, CommandParser, ALIASES};
pub use filter::{filter_contexts, truncate_title, truncate_url, BufferEntry, UNTITLED};
pub use line::{CommandLine, CommandLineTimings, Effect, Phase};
