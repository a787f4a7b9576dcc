//! # Search Service
//!
//! In-page search driven from the keyboard.
//!
//! ## Philosophy
//!
//! - **Delegation**: Matching is the host's job ([`host_api::FindPrimitive`]);
//!   this crate only sequences queries and remembers the last one
//! - **Persistent state**: [`SearchState`] outlives the search bar so `n` and
//!   `N` keep working after the bar is closed
//! - **Testable**: Any `FindPrimitive` can stand in for the host
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A text search algorithm
//! - Regex or whole-word matching
//! - A match counter or highlighter

pub mod bar;
pub mod controller;

pub use bar::{BarInput, SearchBar};
pub use controller::{SearchController, SearchState, SearchStatus};
