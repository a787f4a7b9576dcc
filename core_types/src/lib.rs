//! # Core Types
//!
//! This crate defines the fundamental types shared by every keynav crate.
//!
//! ## Philosophy
//!
//! - **Opaque identifiers**: Context and element ids belong to the host; the
//!   engine only stores and compares them.
//! - **Explicit geometry**: Scroll positions and element bounds are plain
//!   values, never live handles into a document.
//! - **Serializable**: Everything here may cross the host boundary.
//!
//! ## Key Types
//!
//! - [`ContextId`]: An open document-viewing context (a tab)
//! - [`ElementId`]: A host handle for an element in the current document
//! - [`RequestId`]: Correlates an asynchronous host request with its reply
//! - [`ContextInfo`]: One entry of a context listing
//! - [`UrlMatchPolicy`]: How two document locations are compared

pub mod context;
pub mod geometry;
pub mod ids;
pub mod url_match;

pub use context::{ContextInfo, ContextScope};
pub use geometry::{Rect, ScrollPosition, Viewport};
pub use ids::{ContextId, ElementId, RequestId};
pub use url_match::UrlMatchPolicy;
