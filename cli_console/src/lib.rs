//! # Keynav Console (Demo)
//!
//! A line-driven harness around the engine and the simulated host.
//! It is NOT a browser and NOT a key recorder.
//!
//! Each input line is either key notation (`jj`, `<C-d>`, `:b alpha<CR>`)
//! or a console command starting with `.` (see [`commands`]).

pub mod commands;
pub mod interactive;

use core_types::Rect;
use host_api::LinkInfo;
use services_keynav::Engine;
use sim_host::{SimHost, SimPage};

/// URL of the demo document
pub const DEMO_URL: &str = "https://alpha.test/docs/guide";

/// Bootstrap function
///
/// Wires the engine to a simulated host showing a small document, with
/// "Beta" and "Alphabet" open beside it, and serves the engine's startup
/// requests.
pub fn bootstrap() -> SimHost<Engine> {
    let mut page = SimPage::new(DEMO_URL)
        .with_text("Alpha guide. Alpha is the first letter; beta follows alpha.")
        .with_links(vec![
            LinkInfo::anchor("https://alpha.test/docs/intro", "Previous"),
            LinkInfo::anchor("https://alpha.test/docs/reference", "Next"),
        ]);
    for (row, target) in ["intro", "reference", "faq"].iter().enumerate() {
        page.add_link(
            &format!("https://alpha.test/docs/{}", target),
            Rect::new(20.0, 40.0 + row as f64 * 24.0, 120.0, 16.0),
        );
    }

    let mut host = SimHost::new(Engine::new(), page);
    host.set_home_title("Alpha");
    host.open_context("Beta", "https://beta.test/");
    host.open_context("Alphabet", "https://letters.test/");
    host.start();
    host
}

/// Runs a short scripted session and returns what it printed
pub fn demo() -> Result<String, String> {
    let mut handler = commands::CommandHandler::new(bootstrap());
    let mut transcript = String::new();
    for line in ["jj", "f", ".overlay", "<Esc>", ":b alpha<CR>", ".overlay", "2<CR>", ".tabs"] {
        transcript.push_str(&handler.execute_line(line)?);
        transcript.push('\n');
    }
    Ok(transcript)
}
