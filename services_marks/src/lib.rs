//! # Marks Service
//!
//! Positional bookmarks of a document's scroll offset.
//!
//! ## Philosophy
//!
//! - **Two tiers, chosen by letter case**: lowercase keys are local marks
//!   (this document session only, gated on the recorded location); uppercase
//!   keys are global marks (persisted, resolved across contexts by location)
//! - **Stale, not deleted**: When a remembered context goes away its global
//!   marks keep working through location lookup
//! - **Decisions as values**: Resolution returns what to do; the engine
//!   talks to the tab service
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A history or jump list
//! - Cross-window coordination (context ids are opaque hints)

pub mod persistence;
pub mod registry;
pub mod resolve;

pub use persistence::GlobalMarksData;
pub use registry::{GlobalMark, LocalMark, MarkError, MarkKey, MarkRegistry, MarkScope};
pub use resolve::{resolve_global_target, GlobalTarget, PendingScrolls, ScrollOrder};
