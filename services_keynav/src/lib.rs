//! # Keynav Engine
//!
//! This crate implements the modal keyboard-navigation engine: the mode
//! state machine that turns key and focus events into scrolling, link
//! following, context control, marks, search and the `:` command line.
//!
//! ## Philosophy
//!
//! - **Modal input**: Exactly one [`Mode`] interprets each key
//! - **Tables, not grammars**: Single keys are looked up by modifier tier,
//!   two-key commands go through a bounded prefix buffer
//! - **Never blocks**: Collaborator calls are queued as host requests and
//!   resumed by continuations that re-check the mode they were issued in
//! - **Testable**: Fully testable with injected key notation under the
//!   simulated host
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A port of any particular browser extension API
//! - A text search engine (the host finds text)
//! - Configurable key bindings
//!
//! ## Design
//!
//! - [`Engine`] implements [`host_api::HostClient`]
//! - Routing is a pure function ([`mode::route`]) tested without a page
//! - Everything the user sees is available as an [`Overlay`] snapshot

pub mod bindings;
pub mod engine;
pub mod error;
pub mod focus;
pub mod history;
pub mod mode;
pub mod navigation;
pub mod pending;
pub mod prefix;
pub mod render;

pub use bindings::{Action, Binding, SEQUENCES};
pub use engine::Engine;
pub use error::EngineError;
pub use focus::FocusTracker;
pub use history::ContextHistory;
pub use mode::{route, Cancel, Mode, ModifierTier, Route, RouteContext};
pub use pending::{Continuation, PendingRequests, Resumed};
pub use prefix::{KeyPrefixBuffer, PrefixOutcome};
pub use render::{CommandLineView, Overlay, SearchView};

/// Log sources used by the engine
pub mod sources {
    pub const ENGINE: &str = "keynav.engine";
    pub const FOLLOW: &str = "keynav.follow";
    pub const MARKS: &str = "keynav.marks";
    pub const SEARCH: &str = "keynav.search";
    pub const CMDLINE: &str = "keynav.cmdline";
    pub const HOST: &str = "keynav.host";
}
