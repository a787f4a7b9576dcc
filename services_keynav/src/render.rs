//! Overlay snapshot and plain-text rendering

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use services_follow::{Marker, MarkerColor};

/// The open search bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchView {
    pub input: String,
    /// The prefilled text is selected and replaced by the next character
    pub selected: bool,
    pub status: Option<String>,
}

/// The open command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLineView {
    pub input: String,
    /// Lines above the input (the numbered context list)
    pub output: Vec<String>,
    pub message: Option<String>,
}

/// Everything the engine draws over the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub mode: Mode,
    pub enabled: bool,
    /// Pending key sequence
    pub prefix: String,
    pub markers: Vec<Marker>,
    pub search: Option<SearchView>,
    pub command_line: Option<CommandLineView>,
    pub status: Option<String>,
}

impl Overlay {
    /// Renders markers, then the search bar or command line, then a status
    /// line
    pub fn render_text(&self) -> String {
        let mut output = String::new();

        for marker in &self.markers {
            output.push_str(&render_marker(marker));
            output.push('\n');
        }

        if let Some(search) = &self.search {
            output.push('/');
            if search.selected && !search.input.is_empty() {
                output.push_str(&format!("[{}]", search.input));
            } else {
                output.push_str(&search.input);
            }
            if let Some(status) = &search.status {
                output.push_str("  ");
                output.push_str(status);
            }
            output.push('\n');
        }

        if let Some(command_line) = &self.command_line {
            for line in &command_line.output {
                output.push_str(line);
                output.push('\n');
            }
            output.push(':');
            output.push_str(&command_line.input);
            output.push('\n');
            if let Some(message) = &command_line.message {
                output.push_str(message);
                output.push('\n');
            }
        }

        output.push_str(&self.render_status_line());
        output
    }

    /// Mode, pending keys and status message on one line
    pub fn render_status_line(&self) -> String {
        let mut status = String::new();

        if self.enabled {
            status.push_str(self.mode.as_str());
        } else {
            status.push_str("DISABLED");
        }

        if !self.prefix.is_empty() {
            status.push(' ');
            status.push_str(&self.prefix);
        }

        if let Some(message) = &self.status {
            status.push_str(" | ");
            status.push_str(message);
        }

        status
    }
}

fn render_marker(marker: &Marker) -> String {
    let (typed, rest) = marker.label.split_at(marker.typed.min(marker.label.len()));
    let suffix = match marker.color {
        MarkerColor::NewContext => " +",
        MarkerColor::InPlace => "",
    };
    if typed.is_empty() {
        format!("{} @ ({}, {}){}", rest, marker.left, marker.top, suffix)
    } else {
        format!("({}){} @ ({}, {}){}", typed, rest, marker.left, marker.top, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> Overlay {
        Overlay {
            mode: Mode::Normal,
            enabled: true,
            prefix: String::new(),
            markers: Vec::new(),
            search: None,
            command_line: None,
            status: None,
        }
    }

    #[test]
    fn test_status_line() {
        let mut view = overlay();
        assert_eq!(view.render_text(), "NORMAL");

        view.prefix = "g".to_string();
        view.status = Some("Mark 'a' set".to_string());
        assert_eq!(view.render_status_line(), "NORMAL g | Mark 'a' set");

        view.enabled = false;
        assert!(view.render_status_line().starts_with("DISABLED"));
    }

    #[test]
    fn test_markers() {
        let mut view = overlay();
        view.mode = Mode::Follow;
        view.markers = vec![
            Marker {
                label: "sa".to_string(),
                typed: 1,
                left: 10.0,
                top: 20.0,
                color: MarkerColor::InPlace,
                emphasized: true,
            },
            Marker {
                label: "d".to_string(),
                typed: 0,
                left: 0.0,
                top: 5.0,
                color: MarkerColor::NewContext,
                emphasized: false,
            },
        ];
        let text = view.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "(s)a @ (10, 20)");
        assert_eq!(lines[1], "d @ (0, 5) +");
        assert_eq!(lines[2], "FOLLOW");
    }

    #[test]
    fn test_search_and_command_line() {
        let mut view = overlay();
        view.mode = Mode::SearchInput;
        view.search = Some(SearchView {
            input: "needle".to_string(),
            selected: true,
            status: Some("[Not found]".to_string()),
        });
        assert!(view.render_text().starts_with("/[needle]  [Not found]\n"));

        let mut view = overlay();
        view.mode = Mode::BufferSelection;
        view.command_line = Some(CommandLineView {
            input: "2".to_string(),
            output: vec!["[1] Alpha".to_string(), "[2] Alphabet".to_string()],
            message: None,
        });
        let text = view.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["[1] Alpha", "[2] Alphabet", ":2", "SELECT"]);
    }
}
