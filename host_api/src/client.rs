//! The engine side of the host boundary

use crate::{ContextEvent, HostRequest, HostResult, Page};
use core_types::RequestId;
use input_types::InputEvent;

/// Result of dispatching one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// The host must suppress the event's default handling and propagation
    pub consumed: bool,
}

impl Dispatch {
    pub const CONSUMED: Dispatch = Dispatch { consumed: true };
    pub const PASSED: Dispatch = Dispatch { consumed: false };
}

/// Implemented by whatever interprets input on behalf of the host
///
/// All methods run to completion on the host's event thread. Requests issued
/// while handling are collected with [`HostClient::take_requests`].
pub trait HostClient {
    fn handle_event(&mut self, page: &mut dyn Page, event: &InputEvent) -> Dispatch;

    /// Drains queued collaborator requests
    fn take_requests(&mut self) -> Vec<HostRequest>;

    /// Delivers the reply for a previously taken request
    fn complete(&mut self, page: &mut dyn Page, id: RequestId, result: HostResult);

    fn context_event(&mut self, event: ContextEvent);

    /// The page replaced its document (navigation or reload)
    fn document_replaced(&mut self, page: &mut dyn Page);
}
