//! # Follow Service
//!
//! Link following by typed labels.
//!
//! ## Philosophy
//!
//! - **Snapshot, then narrow**: Candidates are discovered once when follow
//!   mode starts; typing only narrows that fixed set
//! - **Recompute, never patch**: Visibility is derived from the typed prefix
//!   on every change, so backspace is the same operation as typing
//! - **Activation is a value**: The session says *what* to activate; the
//!   caller performs it against the page or the tab service
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A DOM walker (the host reports candidate elements)
//! - Persistent (hints never survive a reload)

pub mod discovery;
pub mod session;

pub use discovery::{discover, is_candidate};
pub use session::{Activation, FollowSession, FollowStatus, FollowTarget, Hint, Marker, MarkerColor};
