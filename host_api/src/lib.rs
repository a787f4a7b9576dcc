//! # Host API
//!
//! This crate defines the boundary between the keynav engine and the
//! document-viewing host it runs in.
//!
//! ## Philosophy
//!
//! The host provides **mechanisms**, the engine provides **policy**:
//! - The current document is a synchronous surface ([`Page`])
//! - Tabs, storage, clipboard and timers are asynchronous collaborators
//!   reached through correlated messages ([`HostRequest`] / [`HostReply`])
//! - Time is explicit ([`Instant`], [`Duration`]), never ambient
//!
//! ## Design Goals
//!
//! 1. **Testability**: Every collaborator can be simulated deterministically
//! 2. **Non-blocking**: The engine never waits; it queues requests and is
//!    called back with results
//! 3. **Explicit failure**: Collaborator failures arrive as [`HostError`]
//!    values, never as panics
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A browser extension API binding
//! - A text search implementation (the host owns [`FindPrimitive`])
//! - Multi-window coordination (context ids are opaque)

pub mod client;
pub mod error;
pub mod page;
pub mod protocol;
pub mod time;

pub use client::{Dispatch, HostClient};
pub use error::HostError;
pub use page::{DocumentExtent, ElementInfo, ElementStyle, FindPrimitive, FindQuery, LinkInfo, Page};
pub use protocol::{
    ClipboardRequest, ContextEvent, HostReply, HostRequest, HostResult, RelativeDirection,
    RequestKind, StorageRequest, TabRequest, TabTarget,
};
pub use time::{Duration, Instant};
