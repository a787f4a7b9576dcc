//! # Simulated Host
//!
//! This crate provides a simulated implementation of every host
//! collaborator the keynav engine talks to.
//!
//! ## Purpose
//!
//! The simulated host allows testing engine behavior without a browser:
//! - Runs under `cargo test`
//! - Deterministic (time only moves through [`SimHost::advance`])
//! - Inspectable (tabs, storage, clipboard and the page are all readable)
//! - Faulty on demand ([`fault_injection::FaultPlan`])
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! Requests are answered synchronously while pumping unless they are timers
//! or held by the fault plan, so a test reads as a script of key presses
//! and explicit time steps.

pub mod fault_injection;
pub mod page;

pub use fault_injection::{FaultPlan, RequestFault};
pub use page::SimPage;

use core_types::{ContextId, ContextInfo, ScrollPosition};
use fault_injection::{FaultInjector, Verdict};
use host_api::{
    ClipboardRequest, ContextEvent, Dispatch, HostClient, HostError, HostReply, HostRequest,
    HostResult, Instant, RequestKind, StorageRequest, TabRequest, TabTarget,
};
use input_types::{parse_keys, FocusEvent, InputEvent, NotationError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Simulation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    #[error("Bad key notation: {0}")]
    Notation(String),

    #[error("No such context: {0}")]
    NoSuchContext(ContextId),
}

impl From<NotationError> for SimError {
    fn from(err: NotationError) -> Self {
        SimError::Notation(err.to_string())
    }
}

/// One simulated open context
#[derive(Debug, Clone)]
struct SimContext {
    info: ContextInfo,
    scroll: ScrollPosition,
    loading: bool,
}

/// The host: one page driving `client`, plus tabs, storage, clipboard and
/// timers
pub struct SimHost<C: HostClient> {
    client: C,
    page: SimPage,
    now: Instant,
    /// Context whose document is `page`
    home: ContextId,
    contexts: Vec<SimContext>,
    active: ContextId,
    closed: Vec<ContextInfo>,
    next_context: u64,
    storage: BTreeMap<String, String>,
    clipboard: String,
    timers: Vec<(Instant, u64, HostRequest)>,
    timer_sequence: u64,
    held: Vec<HostRequest>,
    faults: FaultInjector,
    context_scrolls: Vec<(ContextId, ScrollPosition)>,
    served: Vec<&'static str>,
}

impl<C: HostClient> SimHost<C> {
    /// Creates a host whose only context shows `page`
    pub fn new(client: C, page: SimPage) -> Self {
        let url = page_url(&page);
        let home = ContextId::new(1);
        let mut host = Self {
            client,
            page,
            now: Instant::default(),
            home,
            contexts: vec![SimContext {
                info: ContextInfo::new(home, url.clone(), url, 0),
                scroll: ScrollPosition::ORIGIN,
                loading: false,
            }],
            active: home,
            closed: Vec::new(),
            next_context: 2,
            storage: BTreeMap::new(),
            clipboard: String::new(),
            timers: Vec::new(),
            timer_sequence: 0,
            held: Vec::new(),
            faults: FaultInjector::default(),
            context_scrolls: Vec::new(),
            served: Vec::new(),
        };
        host.client.context_event(ContextEvent::Activated(home));
        host
    }

    pub fn with_faults(mut self, plan: FaultPlan) -> Self {
        self.faults = FaultInjector::new(plan);
        self
    }

    /// Seeds storage before the client's startup loads are served
    pub fn with_storage(mut self, key: &str, value: &str) -> Self {
        self.storage.insert(key.to_string(), value.to_string());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn page(&self) -> &SimPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut SimPage {
        &mut self.page
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn home(&self) -> ContextId {
        self.home
    }

    pub fn active(&self) -> ContextId {
        self.active
    }

    /// Open contexts in strip order
    pub fn contexts(&self) -> Vec<ContextInfo> {
        self.contexts
            .iter()
            .map(|c| {
                let mut info = c.info.clone();
                info.active = info.id == self.active;
                info
            })
            .collect()
    }

    pub fn context(&self, id: ContextId) -> Option<ContextInfo> {
        self.contexts().into_iter().find(|c| c.id == id)
    }

    pub fn storage(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Scrolls issued against other contexts, in order
    pub fn context_scrolls(&self) -> &[(ContextId, ScrollPosition)] {
        &self.context_scrolls
    }

    /// Names of the requests answered so far, in order
    pub fn served(&self) -> &[&'static str] {
        &self.served
    }

    pub fn held(&self) -> usize {
        self.held.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn add_fault(&mut self, fault: RequestFault) {
        self.faults.add(fault);
    }

    /// Opens a context without activating it, as another window might
    pub fn open_context(&mut self, title: &str, url: &str) -> ContextId {
        let id = ContextId::new(self.next_context);
        self.next_context += 1;
        let index = self.contexts.len();
        self.contexts.push(SimContext {
            info: ContextInfo::new(id, title, url, index),
            scroll: ScrollPosition::ORIGIN,
            loading: false,
        });
        id
    }

    /// Renames the home context (its title is otherwise its URL)
    pub fn set_home_title(&mut self, title: &str) {
        let home = self.home;
        if let Some(context) = self.contexts.iter_mut().find(|c| c.info.id == home) {
            context.info.title = title.to_string();
        }
    }

    /// Answers the client's startup requests
    pub fn start(&mut self) {
        self.pump();
    }

    /// Types key notation, pumping after every key
    pub fn press(&mut self, notation: &str) -> Result<Vec<Dispatch>, SimError> {
        let events = parse_keys(notation)?;
        Ok(events
            .into_iter()
            .map(|event| self.send(InputEvent::Key(event)))
            .collect())
    }

    pub fn focus(&mut self, event: FocusEvent) -> Dispatch {
        self.send(InputEvent::Focus(event))
    }

    /// Delivers one event; a document replaced from outside is reported
    /// first
    pub fn send(&mut self, event: InputEvent) -> Dispatch {
        self.sync_page();
        let dispatch = self.client.handle_event(&mut self.page, &event);
        self.sync_page();
        self.pump();
        dispatch
    }

    /// Moves time forward, firing due timers in order
    pub fn advance(&mut self, millis: u64) {
        let target = Instant::from_millis(self.now.as_millis() + millis);
        loop {
            self.timers.sort_by_key(|(due, sequence, _)| (*due, *sequence));
            match self.timers.first() {
                Some((due, _, _)) if *due <= target => {
                    let (due, _, request) = self.timers.remove(0);
                    self.set_time(due);
                    self.served.push(request.kind.name());
                    self.deliver(request.id, Ok(HostReply::TimerFired));
                }
                _ => break,
            }
        }
        self.set_time(target);
    }

    /// The context finished loading
    pub fn finish_loading(&mut self, id: ContextId) -> Result<(), SimError> {
        let context = self
            .contexts
            .iter_mut()
            .find(|c| c.info.id == id)
            .ok_or(SimError::NoSuchContext(id))?;
        context.loading = false;
        self.client.context_event(ContextEvent::Loaded(id));
        self.pump();
        Ok(())
    }

    pub fn is_loading(&self, id: ContextId) -> bool {
        self.contexts
            .iter()
            .any(|c| c.info.id == id && c.loading)
    }

    /// Scroll position last applied to another context
    pub fn context_scroll(&self, id: ContextId) -> Option<ScrollPosition> {
        self.contexts
            .iter()
            .find(|c| c.info.id == id)
            .map(|c| c.scroll)
    }

    /// The user activated a context directly
    pub fn activate(&mut self, id: ContextId) -> Result<(), SimError> {
        if !self.contexts.iter().any(|c| c.info.id == id) {
            return Err(SimError::NoSuchContext(id));
        }
        self.set_active(id);
        self.pump();
        Ok(())
    }

    /// The user closed a context directly
    pub fn close(&mut self, id: ContextId) -> Result<(), SimError> {
        self.remove_context(id)
            .map(|_| ())
            .ok_or(SimError::NoSuchContext(id))?;
        self.pump();
        Ok(())
    }

    /// Drops holds and answers every held request
    pub fn release_held(&mut self) {
        self.faults.clear_holds();
        for request in std::mem::take(&mut self.held) {
            self.serve(request);
        }
        self.pump();
    }

    /// Serves queued requests until the client stops issuing new ones
    pub fn pump(&mut self) {
        loop {
            let requests = self.client.take_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                match self.faults.verdict(request.kind.name()) {
                    Verdict::Hold => self.held.push(request),
                    Verdict::Fail(err) => {
                        self.served.push(request.kind.name());
                        self.deliver(request.id, Err(err));
                    }
                    Verdict::Execute => self.serve(request),
                }
            }
        }
    }

    fn serve(&mut self, request: HostRequest) {
        if let RequestKind::Timer { delay } = request.kind {
            self.timer_sequence += 1;
            self.timers
                .push((self.now + delay, self.timer_sequence, request));
            return;
        }
        self.served.push(request.kind.name());
        let (result, events) = self.execute(&request.kind);
        self.deliver(request.id, result);
        for event in events {
            self.client.context_event(event);
        }
    }

    fn deliver(&mut self, id: core_types::RequestId, result: HostResult) {
        self.client.complete(&mut self.page, id, result);
        self.sync_page();
    }

    fn set_time(&mut self, now: Instant) {
        self.now = now;
        self.page.set_now(now);
    }

    /// Tells the client about a replaced document and keeps the home
    /// context's URL current
    fn sync_page(&mut self) {
        if self.page.take_replaced() {
            let url = page_url(&self.page);
            let home = self.home;
            if let Some(context) = self.contexts.iter_mut().find(|c| c.info.id == home) {
                context.info.url = url;
            }
            self.client.document_replaced(&mut self.page);
        }
    }

    fn execute(&mut self, kind: &RequestKind) -> (HostResult, Vec<ContextEvent>) {
        let mut events = Vec::new();
        let result = match kind {
            RequestKind::Tabs(tab) => self.execute_tab(tab, &mut events),
            RequestKind::Storage(StorageRequest::Get { key }) => {
                Ok(HostReply::Value(self.storage.get(key).cloned()))
            }
            RequestKind::Storage(StorageRequest::Set { key, value }) => {
                self.storage.insert(key.clone(), value.clone());
                Ok(HostReply::Done)
            }
            RequestKind::Clipboard(ClipboardRequest::ReadText) => {
                Ok(HostReply::Text(self.clipboard.clone()))
            }
            RequestKind::Clipboard(ClipboardRequest::WriteText(text)) => {
                self.clipboard = text.clone();
                Ok(HostReply::Done)
            }
            RequestKind::ScrollContext { context, position } => {
                match self.contexts.iter_mut().find(|c| c.info.id == *context) {
                    Some(found) => {
                        found.scroll = *position;
                        self.context_scrolls.push((*context, *position));
                        Ok(HostReply::Done)
                    }
                    None => Err(no_such(*context)),
                }
            }
            RequestKind::Timer { .. } => Ok(HostReply::TimerFired),
        };
        (result, events)
    }

    fn execute_tab(&mut self, request: &TabRequest, events: &mut Vec<ContextEvent>) -> HostResult {
        match request {
            TabRequest::Identify => Ok(HostReply::Hosted(self.home)),
            TabRequest::List { .. } => Ok(HostReply::Contexts(self.contexts())),
            TabRequest::Activate(id) => {
                self.require(*id)?;
                events.extend(self.set_active_event(*id));
                Ok(HostReply::Done)
            }
            TabRequest::Close(target) => {
                let id = self.resolve(*target);
                let removed = self.remove_context_events(id, events);
                if removed {
                    Ok(HostReply::Done)
                } else {
                    Err(no_such(id))
                }
            }
            TabRequest::Duplicate(target) => {
                let id = self.resolve(*target);
                let source = self.require(id)?;
                let copy = self.insert_after(id, &source.title, &source.url);
                events.extend(self.set_active_event(copy));
                Ok(HostReply::Done)
            }
            TabRequest::Reload { target, .. } => {
                let id = self.resolve(*target);
                self.require(id)?;
                if id == self.home {
                    self.page.reload();
                }
                Ok(HostReply::Done)
            }
            TabRequest::TogglePin(target) => {
                let id = self.resolve(*target);
                let context = self
                    .contexts
                    .iter_mut()
                    .find(|c| c.info.id == id)
                    .ok_or_else(|| no_such(id))?;
                context.info.pinned = !context.info.pinned;
                Ok(HostReply::Done)
            }
            TabRequest::OpenAndFocus { url } => {
                if !url.contains(':') {
                    return Err(HostError::InvalidUrl(url.clone()));
                }
                let id = self.insert_after(self.active, url, url);
                if let Some(context) = self.contexts.iter_mut().find(|c| c.info.id == id) {
                    context.loading = true;
                }
                events.extend(self.set_active_event(id));
                Ok(HostReply::Opened(id))
            }
            TabRequest::SwitchRelative { direction } => {
                if self.contexts.is_empty() {
                    return Err(HostError::Rejected("No open contexts".to_string()));
                }
                let count = self.contexts.len() as isize;
                let position = self
                    .contexts
                    .iter()
                    .position(|c| c.info.id == self.active)
                    .unwrap_or(0) as isize;
                let next = (position + direction.offset()).rem_euclid(count) as usize;
                let id = self.contexts[next].info.id;
                events.extend(self.set_active_event(id));
                Ok(HostReply::Done)
            }
            TabRequest::RestoreMostRecentlyClosed => {
                let info = self
                    .closed
                    .pop()
                    .ok_or_else(|| HostError::Rejected("No recently closed context".to_string()))?;
                let id = self.insert_after(self.active, &info.title, &info.url);
                events.extend(self.set_active_event(id));
                Ok(HostReply::Done)
            }
        }
    }

    fn resolve(&self, target: TabTarget) -> ContextId {
        match target {
            TabTarget::Current => self.home,
            TabTarget::Id(id) => id,
        }
    }

    fn require(&self, id: ContextId) -> Result<ContextInfo, HostError> {
        self.contexts
            .iter()
            .find(|c| c.info.id == id)
            .map(|c| c.info.clone())
            .ok_or_else(|| no_such(id))
    }

    fn insert_after(&mut self, after: ContextId, title: &str, url: &str) -> ContextId {
        let id = ContextId::new(self.next_context);
        self.next_context += 1;
        let position = self
            .contexts
            .iter()
            .position(|c| c.info.id == after)
            .map(|p| p + 1)
            .unwrap_or(self.contexts.len());
        self.contexts.insert(
            position,
            SimContext {
                info: ContextInfo::new(id, title, url, position),
                scroll: ScrollPosition::ORIGIN,
                loading: false,
            },
        );
        self.reindex();
        id
    }

    fn reindex(&mut self) {
        for (index, context) in self.contexts.iter_mut().enumerate() {
            context.info.index = index;
        }
    }

    fn set_active_event(&mut self, id: ContextId) -> Option<ContextEvent> {
        if self.active == id {
            return None;
        }
        self.active = id;
        Some(ContextEvent::Activated(id))
    }

    fn set_active(&mut self, id: ContextId) {
        if let Some(event) = self.set_active_event(id) {
            self.client.context_event(event);
        }
    }

    fn remove_context(&mut self, id: ContextId) -> Option<()> {
        let mut events = Vec::new();
        let removed = self.remove_context_events(id, &mut events);
        for event in events {
            self.client.context_event(event);
        }
        removed.then_some(())
    }

    fn remove_context_events(&mut self, id: ContextId, events: &mut Vec<ContextEvent>) -> bool {
        let Some(position) = self.contexts.iter().position(|c| c.info.id == id) else {
            return false;
        };
        let removed = self.contexts.remove(position);
        self.closed.push(removed.info);
        self.reindex();
        events.push(ContextEvent::Removed(id));

        if self.active == id && !self.contexts.is_empty() {
            let next = position.min(self.contexts.len() - 1);
            let next_id = self.contexts[next].info.id;
            events.extend(self.set_active_event(next_id));
        }
        true
    }
}

fn page_url(page: &SimPage) -> String {
    use host_api::Page;
    page.url()
}

fn no_such(id: ContextId) -> HostError {
    HostError::NoSuchTarget(format!("Invalid tab ID: {}", id.as_u64()))
}
