//! The command line state machine

use crate::filter::{filter_contexts, truncate_title, truncate_url, BufferEntry};
use crate::{Command, CommandError, CommandParser};
use core_types::ContextInfo;
use host_api::HostError;
use input_types::{Key, KeyEvent};
use services_notification::{Notification, NotificationId, StatusLine};

/// What the next submission means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Typing a command
    Command,
    /// Typing the number of a listed entry
    Selection,
}

/// Work the command line asks its owner to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hide the command line now
    Close,
    /// List open contexts, then call [`CommandLine::on_contexts`]
    ListContexts,
    /// Activate `entry`, then call [`CommandLine::on_switch_result`]
    Activate(BufferEntry),
    /// Call [`CommandLine::expire_message`] with `id` after `after_ms`
    ExpireMessage { id: NotificationId, after_ms: u64 },
    /// Hide the command line after `after_ms`
    CloseAfter { after_ms: u64 },
}

/// Display delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLineTimings {
    pub close_delay_ms: u64,
    pub error_ttl_ms: u64,
    pub info_ttl_ms: u64,
}

impl Default for CommandLineTimings {
    fn default() -> Self {
        Self {
            close_delay_ms: 1500,
            error_ttl_ms: 3000,
            info_ttl_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Awaiting {
    Contexts { query: String },
    Switch { entry: BufferEntry, direct: bool },
}

/// Single-line editor plus the `:buffer` flow
#[derive(Debug, Clone)]
pub struct CommandLine {
    input: String,
    phase: Phase,
    entries: Vec<BufferEntry>,
    output: Vec<String>,
    status: StatusLine,
    awaiting: Option<Awaiting>,
    timings: CommandLineTimings,
}

impl CommandLine {
    pub fn new(timings: CommandLineTimings) -> Self {
        Self {
            input: String::new(),
            phase: Phase::Command,
            entries: Vec::new(),
            output: Vec::new(),
            status: StatusLine::new(),
            awaiting: None,
            timings,
        }
    }

    pub fn set_timings(&mut self, timings: CommandLineTimings) {
        self.timings = timings;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Listed entries while selecting
    pub fn entries(&self) -> &[BufferEntry] {
        &self.entries
    }

    /// Lines shown above the input
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Current feedback message
    pub fn message(&self) -> Option<&str> {
        self.status.text()
    }

    /// True while a host reply is outstanding
    pub fn is_waiting(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Forgets everything; used when the command line is hidden
    pub fn reset(&mut self) {
        self.input.clear();
        self.phase = Phase::Command;
        self.entries.clear();
        self.output.clear();
        self.status.clear();
        self.awaiting = None;
    }

    /// Applies one key press
    pub fn handle_key(&mut self, event: &KeyEvent, now_ms: u64) -> Vec<Effect> {
        match event.key {
            Key::Escape => {
                self.reset();
                vec![Effect::Close]
            }
            Key::Enter => self.submit(now_ms),
            Key::Backspace => {
                self.input.pop();
                Vec::new()
            }
            Key::Char(c) if !event.modifiers.is_ctrl() && !event.modifiers.is_meta() => {
                self.input.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Submits the current input according to the phase
    pub fn submit(&mut self, now_ms: u64) -> Vec<Effect> {
        let raw = self.input.clone();
        match self.phase {
            Phase::Command => self.submit_command(&raw, now_ms),
            Phase::Selection => self.submit_selection(&raw, now_ms),
        }
    }

    /// Parses and runs a command
    pub fn submit_command(&mut self, raw: &str, now_ms: u64) -> Vec<Effect> {
        match CommandParser::parse(raw) {
            Ok(None) => {
                self.reset();
                vec![Effect::Close]
            }
            Err(CommandError::UnknownCommand(name)) => {
                vec![self.error(format!("Error: Unknown command: {}", name), now_ms)]
            }
            Ok(Some(Command::Buffer { filter })) => {
                self.output.clear();
                self.entries.clear();
                self.status
                    .show(Notification::info("Searching contexts...", now_ms));
                self.awaiting = Some(Awaiting::Contexts { query: filter });
                vec![Effect::ListContexts]
            }
        }
    }

    /// Picks a listed entry by its number
    pub fn submit_selection(&mut self, raw: &str, now_ms: u64) -> Vec<Effect> {
        let picked = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| self.entries.iter().find(|e| e.display_index == n))
            .cloned();

        match picked {
            Some(entry) => {
                self.awaiting = Some(Awaiting::Switch {
                    entry: entry.clone(),
                    direct: false,
                });
                vec![Effect::Activate(entry)]
            }
            None => {
                self.input.clear();
                self.prompt("Invalid selection. Type number and Enter, or Esc.", now_ms);
                Vec::new()
            }
        }
    }

    /// Result of the context listing requested by [`Effect::ListContexts`]
    ///
    /// Ignored unless a listing is outstanding.
    pub fn on_contexts(
        &mut self,
        result: Result<Vec<ContextInfo>, HostError>,
        now_ms: u64,
    ) -> Vec<Effect> {
        let query = match &self.awaiting {
            Some(Awaiting::Contexts { query }) => query.clone(),
            _ => return Vec::new(),
        };
        self.awaiting = None;

        let contexts = match result {
            Ok(contexts) => contexts,
            Err(err) => return vec![self.error(format!("Error: {}", err), now_ms)],
        };

        let mut entries = filter_contexts(&contexts, &query);
        match entries.len() {
            0 => {
                self.input = format!("buffer {}", query);
                self.prompt(format!("No contexts found matching \"{}\".", query), now_ms);
                Vec::new()
            }
            1 => {
                let entry = entries.remove(0);
                self.awaiting = Some(Awaiting::Switch {
                    entry: entry.clone(),
                    direct: true,
                });
                vec![Effect::Activate(entry)]
            }
            _ => {
                self.output = list_lines(&query, &entries);
                self.entries = entries;
                self.phase = Phase::Selection;
                self.input.clear();
                self.status.clear();
                Vec::new()
            }
        }
    }

    /// Result of the activation requested by [`Effect::Activate`]
    ///
    /// A failed switch from the list keeps the list so the user can retry.
    pub fn on_switch_result(&mut self, result: Result<(), HostError>, now_ms: u64) -> Vec<Effect> {
        let (entry, direct) = match &self.awaiting {
            Some(Awaiting::Switch { entry, direct }) => (entry.clone(), *direct),
            _ => return Vec::new(),
        };
        self.awaiting = None;

        match (result, direct) {
            (Ok(()), true) => {
                let id = self.status.show(
                    Notification::info(
                        format!("Switched to: {}", truncate_title(&entry.title)),
                        now_ms,
                    )
                    .with_ttl(self.timings.info_ttl_ms),
                );
                vec![
                    Effect::ExpireMessage {
                        id,
                        after_ms: self.timings.info_ttl_ms,
                    },
                    Effect::CloseAfter {
                        after_ms: self.timings.close_delay_ms,
                    },
                ]
            }
            (Ok(()), false) => {
                self.reset();
                vec![Effect::Close]
            }
            (Err(err), true) => vec![self.error(format!("Error: {}", err), now_ms)],
            (Err(err), false) => vec![self.error(format!("Error switching: {}", err), now_ms)],
        }
    }

    /// Clears `id` if it is still the displayed message
    pub fn expire_message(&mut self, id: NotificationId) -> bool {
        self.status.expire(id)
    }

    /// Shows an error that stays until the next message replaces it
    fn prompt(&mut self, message: impl Into<String>, now_ms: u64) {
        self.status.show(Notification::error(message, now_ms));
    }

    fn error(&mut self, message: String, now_ms: u64) -> Effect {
        let ttl = self.timings.error_ttl_ms;
        let id = self
            .status
            .show(Notification::error(message, now_ms).with_ttl(ttl));
        Effect::ExpireMessage { id, after_ms: ttl }
    }
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new(CommandLineTimings::default())
    }
}

fn list_lines(query: &str, entries: &[BufferEntry]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() + 2);
    lines.push(format!("Matching contexts for \"{}\":", query));
    for entry in entries {
        lines.push(format!(
            "[{}] {} ({})",
            entry.display_index,
            entry.title,
            truncate_url(&entry.url)
        ));
    }
    lines.push("Type number and Enter to switch, or Esc to cancel.".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ContextId;
    use input_types::Modifiers;

    fn seeded() -> Vec<ContextInfo> {
        vec![
            ContextInfo::new(ContextId::new(1), "Alpha", "https://alpha.test/", 0),
            ContextInfo::new(ContextId::new(2), "Beta", "https://beta.test/", 1),
            ContextInfo::new(ContextId::new(3), "Alphabet", "https://letters.test/", 2),
        ]
    }

    fn type_line(line: &mut CommandLine, text: &str) -> Vec<Effect> {
        for c in text.chars() {
            line.handle_key(&KeyEvent::typed(c), 0);
        }
        line.handle_key(&KeyEvent::pressed(Key::Enter, Modifiers::NONE), 0)
    }

    #[test]
    fn test_single_match_switches_directly_then_closes() {
        let mut line = CommandLine::default();
        assert_eq!(type_line(&mut line, "buffer beta"), vec![Effect::ListContexts]);
        assert_eq!(line.message(), Some("Searching contexts..."));

        let effects = line.on_contexts(Ok(seeded()), 5);
        let entry = match effects.as_slice() {
            [Effect::Activate(entry)] => entry.clone(),
            other => panic!("expected activation, got {:?}", other),
        };
        assert_eq!(entry.id, ContextId::new(2));

        let effects = line.on_switch_result(Ok(()), 6);
        assert_eq!(line.message(), Some("Switched to: Beta"));
        assert!(effects.contains(&Effect::CloseAfter { after_ms: 1500 }));
    }

    #[test]
    fn test_multiple_matches_enter_selection() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b alpha");
        assert!(line.on_contexts(Ok(seeded()), 0).is_empty());

        assert_eq!(line.phase(), Phase::Selection);
        assert_eq!(line.input(), "");
        assert_eq!(
            line.output(),
            &[
                "Matching contexts for \"alpha\":".to_string(),
                "[1] Alpha (https://alpha.test/)".to_string(),
                "[2] Alphabet (https://letters.test/)".to_string(),
                "Type number and Enter to switch, or Esc to cancel.".to_string(),
            ]
        );

        let effects = type_line(&mut line, "2");
        match effects.as_slice() {
            [Effect::Activate(entry)] => assert_eq!(entry.title, "Alphabet"),
            other => panic!("expected activation, got {:?}", other),
        }
        assert_eq!(line.on_switch_result(Ok(()), 0), vec![Effect::Close]);
        assert_eq!(line.phase(), Phase::Command);
    }

    #[test]
    fn test_selection_uses_display_index() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b alpha");
        line.on_contexts(Ok(seeded()), 0);
        line.entries.reverse();

        match line.submit_selection("2", 0).as_slice() {
            [Effect::Activate(entry)] => assert_eq!(entry.display_index, 2),
            other => panic!("expected activation, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_selection_keeps_mode_and_clears_input() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b alpha");
        line.on_contexts(Ok(seeded()), 0);

        for bad in ["x", "0", "3"] {
            assert!(type_line(&mut line, bad).is_empty());
            assert_eq!(line.phase(), Phase::Selection);
            assert_eq!(line.input(), "");
            assert_eq!(
                line.message(),
                Some("Invalid selection. Type number and Enter, or Esc.")
            );
        }
    }

    #[test]
    fn test_failed_switch_from_list_allows_retry() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b alpha");
        line.on_contexts(Ok(seeded()), 0);
        type_line(&mut line, "1");

        line.on_switch_result(Err(HostError::Rejected("gone".into())), 0);
        assert_eq!(line.phase(), Phase::Selection);
        assert_eq!(line.message(), Some("Error switching: gone"));
        assert_eq!(line.entries().len(), 2);
    }

    #[test]
    fn test_no_match_restores_input() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b gamma");
        assert!(line.on_contexts(Ok(seeded()), 0).is_empty());

        assert_eq!(line.phase(), Phase::Command);
        assert_eq!(line.input(), "buffer gamma");
        assert_eq!(line.message(), Some("No contexts found matching \"gamma\"."));
    }

    #[test]
    fn test_unknown_command_keeps_input() {
        let mut line = CommandLine::default();
        type_line(&mut line, "open x");
        assert_eq!(line.input(), "open x");
        assert_eq!(line.message(), Some("Error: Unknown command: open"));
    }

    #[test]
    fn test_listing_error_is_displayed() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b a");
        line.on_contexts(Err(HostError::Unavailable("tabs".into())), 0);
        assert_eq!(line.message(), Some("Error: Unavailable: tabs"));
    }

    #[test]
    fn test_replies_without_request_are_ignored() {
        let mut line = CommandLine::default();
        assert!(line.on_contexts(Ok(seeded()), 0).is_empty());
        assert!(line.on_switch_result(Ok(()), 0).is_empty());
        assert_eq!(line.phase(), Phase::Command);
    }

    #[test]
    fn test_escape_and_empty_submit_close() {
        let mut line = CommandLine::default();
        type_line(&mut line, "b alpha");
        line.on_contexts(Ok(seeded()), 0);
        assert_eq!(
            line.handle_key(&KeyEvent::pressed(Key::Escape, Modifiers::NONE), 0),
            vec![Effect::Close]
        );
        assert_eq!(line.phase(), Phase::Command);
        assert!(line.entries().is_empty());

        assert_eq!(type_line(&mut line, "  "), vec![Effect::Close]);
    }

    #[test]
    fn test_message_expiry_is_id_guarded() {
        let mut line = CommandLine::default();
        let first = match type_line(&mut line, "nope").as_slice() {
            [Effect::ExpireMessage { id, .. }] => *id,
            other => panic!("unexpected {:?}", other),
        };
        line.input.clear();
        type_line(&mut line, "still");
        assert!(!line.expire_message(first));
        assert!(line.message().is_some());
    }
}
