//! The mode state machine

mod actions;
mod continuations;

use crate::bindings::{self, Binding};
use crate::error::EngineResult;
use crate::focus::FocusTracker;
use crate::history::ContextHistory;
use crate::mode::{route, Cancel, Mode, ModifierTier, Route, RouteContext};
use crate::pending::{Continuation, PendingRequests, Resumed};
use crate::prefix::{KeyPrefixBuffer, PrefixOutcome};
use crate::render::{CommandLineView, Overlay, SearchView};
use crate::sources;
use core_types::{ContextId, ContextScope, ElementId, RequestId};
use hint_labels::HintAlphabet;
use host_api::{
    ContextEvent, Dispatch, Duration, HostClient, HostError, HostRequest, HostResult, Instant,
    Page, RequestKind, StorageRequest, TabRequest,
};
use input_types::{InputEvent, Key, KeyEvent};
use services_command_line::{CommandLine, CommandLineTimings, Effect, Phase};
use services_follow::{Activation, FollowSession, FollowStatus};
use services_logger::{LogEntry, LogLevel, Logger};
use services_marks::{GlobalMarksData, MarkError, MarkKey, MarkRegistry, MarkScope, PendingScrolls};
use services_notification::{Notification, NotificationLevel, StatusLine};
use services_search::{SearchController, SearchStatus};
use services_settings::persistence::{serialize_overrides, SettingsOverridesData};
use services_settings::{
    create_default_registry, storage_keys, EngineSettings, SettingValue, SettingsRegistry,
};

/// The keynav engine
///
/// One instance serves one document context. The host feeds it input and
/// collaborator replies through [`HostClient`] and drains the requests it
/// queues.
pub struct Engine {
    enabled: bool,
    /// Toggled since start; a late persisted flag is ignored
    enabled_touched: bool,
    mode: Mode,
    /// Bumped on every mode transition
    epoch: u64,
    prefix: KeyPrefixBuffer,
    focus: FocusTracker,
    follow: Option<FollowSession>,
    alphabet: HintAlphabet,
    marks: MarkRegistry,
    pending_scrolls: PendingScrolls,
    search: SearchController,
    command_line: CommandLine,
    status: StatusLine,
    history: ContextHistory,
    /// Context this engine runs in, once the host has said
    hosted: Option<ContextId>,
    registry: SettingsRegistry,
    config: EngineSettings,
    outbox: Vec<HostRequest>,
    pending: PendingRequests,
    logger: Logger,
}

impl Engine {
    /// Creates an engine with default settings
    ///
    /// Persisted state (enabled flag, global marks, settings overrides) and
    /// the hosting context are requested immediately and applied when they
    /// arrive.
    pub fn new() -> Self {
        Self::build(
            create_default_registry(),
            EngineSettings::default(),
            HintAlphabet::default(),
        )
    }

    /// Creates an engine from a prepared settings registry
    pub fn with_settings(registry: SettingsRegistry) -> EngineResult<Self> {
        let config = EngineSettings::from_registry(&registry)?;
        let alphabet = HintAlphabet::new(&config.hint_chars)?;
        Ok(Self::build(registry, config, alphabet))
    }

    fn build(registry: SettingsRegistry, config: EngineSettings, alphabet: HintAlphabet) -> Self {
        let mut engine = Self {
            enabled: true,
            enabled_touched: false,
            mode: Mode::Normal,
            epoch: 0,
            prefix: KeyPrefixBuffer::new(),
            focus: FocusTracker::new(),
            follow: None,
            alphabet,
            marks: MarkRegistry::new(config.local_url_policy),
            pending_scrolls: PendingScrolls::new(),
            search: SearchController::new(),
            command_line: CommandLine::new(timings(&config)),
            status: StatusLine::new(),
            history: ContextHistory::new(),
            hosted: None,
            registry,
            config,
            outbox: Vec::new(),
            pending: PendingRequests::new(),
            logger: Logger::new(),
        };

        for (key, continuation) in [
            (storage_keys::ENABLED, Continuation::LoadEnabled),
            (storage_keys::GLOBAL_MARKS, Continuation::LoadGlobalMarks),
            (storage_keys::SETTINGS, Continuation::LoadSettings),
        ] {
            engine.request(
                RequestKind::Storage(StorageRequest::Get {
                    key: key.to_string(),
                }),
                continuation,
                false,
            );
        }
        engine.request(
            RequestKind::Tabs(TabRequest::Identify),
            Continuation::Identify,
            false,
        );
        engine
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Mode epoch; changes whenever the mode does
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pending key sequence
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    pub fn follow(&self) -> Option<&FollowSession> {
        self.follow.as_ref()
    }

    pub fn marks(&self) -> &MarkRegistry {
        &self.marks
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// Displayed status message
    pub fn status(&self) -> Option<&str> {
        self.status.text()
    }

    pub fn history(&self) -> &ContextHistory {
        &self.history
    }

    /// Context hosting this engine, if the host has identified it
    pub fn hosted_context(&self) -> Option<ContextId> {
        self.hosted
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.config
    }

    pub fn is_suppressed(&self) -> bool {
        self.focus.is_suppressed()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Number of requests still waiting for a reply
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot of everything drawn over the page
    pub fn overlay(&self, page: &dyn Page) -> Overlay {
        Overlay {
            mode: self.mode,
            enabled: self.enabled,
            prefix: self.prefix.as_str().to_string(),
            markers: self
                .follow
                .as_ref()
                .map(|session| session.markers(page.scroll_position()))
                .unwrap_or_default(),
            search: self.search.bar().map(|bar| SearchView {
                input: bar.input().to_string(),
                selected: bar.is_selected(),
                status: bar.status().map(str::to_string),
            }),
            command_line: self.mode.is_command_line().then(|| CommandLineView {
                input: self.command_line.input().to_string(),
                output: self.command_line.output().to_vec(),
                message: self.command_line.message().map(str::to_string),
            }),
            status: self.status.text().map(str::to_string),
        }
    }

    /// Overrides one setting and persists the overrides
    ///
    /// The registry is only changed if the resulting configuration is valid.
    pub fn set_setting(&mut self, key: &str, value: SettingValue) -> EngineResult<()> {
        let mut registry = self.registry.clone();
        registry.set_override(key, value)?;
        self.apply_registry(registry)?;
        self.persist_settings();
        Ok(())
    }

    fn apply_registry(&mut self, registry: SettingsRegistry) -> EngineResult<()> {
        let config = EngineSettings::from_registry(&registry)?;
        let alphabet = HintAlphabet::new(&config.hint_chars)?;
        self.marks.set_policy(config.local_url_policy);
        self.command_line.set_timings(timings(&config));
        self.alphabet = alphabet;
        self.config = config;
        self.registry = registry;
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.epoch += 1;
        }
    }

    /// Drops every transient mode and returns to Normal
    fn reset_modes(&mut self) {
        self.follow = None;
        self.search.close();
        self.command_line.reset();
        self.prefix.clear();
        self.set_mode(Mode::Normal);
    }

    fn handle_key(&mut self, page: &mut dyn Page, event: &KeyEvent) -> Dispatch {
        let context = RouteContext {
            enabled: self.enabled,
            suppressed: self.focus.is_suppressed(),
            prefix_pending: !self.prefix.is_empty(),
        };

        let route = route(self.mode, event, context);
        let next = route.next_mode(self.mode);
        match route {
            Route::Pass => Dispatch::PASSED,
            Route::Toggle => {
                self.toggle(page.now());
                Dispatch::CONSUMED
            }
            Route::Cancel(cancel) => {
                let dispatch = self.cancel(page, cancel);
                self.set_mode(next);
                dispatch
            }
            Route::Follow => {
                self.follow_key(page, event);
                Dispatch::CONSUMED
            }
            Route::Mark => {
                if let Some(key) = event.char().and_then(MarkKey::new) {
                    self.mark_key(page, key);
                }
                Dispatch::CONSUMED
            }
            Route::AbandonMark => {
                self.set_mode(next);
                self.handle_key(page, event)
            }
            Route::Search => {
                if let Some(status) = self.search.handle_key(&mut *page, event) {
                    self.report_search(status, page.now());
                }
                Dispatch::CONSUMED
            }
            Route::CommandLine => {
                let effects = self
                    .command_line
                    .handle_key(event, page.now().as_millis());
                self.apply_effects(effects);
                Dispatch::CONSUMED
            }
            Route::Prefix => self.prefix_key(page, event),
            Route::Single(tier) => self.single_key(page, event, tier),
        }
    }

    fn toggle(&mut self, now: Instant) {
        self.enabled = !self.enabled;
        self.enabled_touched = true;
        if !self.enabled {
            self.reset_modes();
        }
        self.persist(storage_keys::ENABLED, self.enabled.to_string());

        let message = if self.enabled {
            "Keynav enabled"
        } else {
            "Keynav disabled"
        };
        self.logger.info(sources::ENGINE, message);
        self.show_status(NotificationLevel::Info, message, now);
    }

    fn cancel(&mut self, page: &mut dyn Page, cancel: Cancel) -> Dispatch {
        match cancel {
            Cancel::Follow => self.follow = None,
            Cancel::Search => self.search.close(),
            Cancel::Mark => {}
            Cancel::Suppression => {
                page.blur_active_element();
                self.focus.clear();
            }
            Cancel::Prefix => {
                self.prefix.clear();
                return Dispatch::PASSED;
            }
        }
        Dispatch::CONSUMED
    }

    fn prefix_key(&mut self, page: &mut dyn Page, event: &KeyEvent) -> Dispatch {
        let outcome = match event.char() {
            Some(c) => self.prefix.push(c),
            None => {
                self.prefix.clear();
                PrefixOutcome::Invalid
            }
        };

        match outcome {
            PrefixOutcome::Complete(action) => {
                self.run_action(page, action);
                Dispatch::CONSUMED
            }
            PrefixOutcome::Pending => Dispatch::CONSUMED,
            // The buffer is empty again, so this lands in the single-key tables
            PrefixOutcome::Invalid => self.handle_key(page, event),
        }
    }

    fn single_key(&mut self, page: &mut dyn Page, event: &KeyEvent, tier: ModifierTier) -> Dispatch {
        let Some(c) = event.char() else {
            return Dispatch::PASSED;
        };

        match bindings::lookup(tier, c) {
            Some(Binding::Run(action)) => {
                self.run_action(page, action);
                Dispatch::CONSUMED
            }
            Some(Binding::StartSequence) => {
                self.prefix.push(c);
                Dispatch::CONSUMED
            }
            None => Dispatch::PASSED,
        }
    }

    fn follow_key(&mut self, page: &mut dyn Page, event: &KeyEvent) {
        let Some(session) = self.follow.as_mut() else {
            self.set_mode(Mode::Normal);
            return;
        };

        let status = match event.key {
            Key::Backspace => {
                session.backspace();
                return;
            }
            Key::Char(c) => {
                let c = c.to_ascii_lowercase();
                if !self.alphabet.contains(c) {
                    return;
                }
                session.consume_key(c)
            }
            _ => return,
        };

        match status {
            FollowStatus::Pending => {}
            FollowStatus::Exhausted => {
                self.follow = None;
                self.set_mode(Mode::Normal);
                self.logger.debug(sources::FOLLOW, "No hint matches");
            }
            FollowStatus::Matched(activation) => {
                self.follow = None;
                self.set_mode(Mode::Normal);
                self.activate(page, activation);
            }
        }
    }

    fn activate(&mut self, page: &mut dyn Page, activation: Activation) {
        match activation {
            Activation::OpenInNewContext { url } => {
                self.fire(RequestKind::Tabs(TabRequest::OpenAndFocus { url }));
            }
            Activation::FallbackInPlace { element } => {
                self.logger.record(
                    LogEntry::new(LogLevel::Warn, "Target is not a link; activating in place")
                        .with_source(sources::FOLLOW)
                        .with_field("element", element.as_u64()),
                );
                self.focus_and_activate(page, element);
            }
            Activation::FocusAndActivate { element } => self.focus_and_activate(page, element),
            Activation::Navigate { url } => {
                if let Err(err) = page.navigate(&url) {
                    self.log_failure("page.navigate", &err);
                }
            }
        }
    }

    fn focus_and_activate(&mut self, page: &mut dyn Page, element: ElementId) {
        if let Err(err) = page.focus_element(element) {
            self.log_failure("page.focus", &err);
        }
        if let Err(err) = page.activate_element(element) {
            self.log_failure("page.activate", &err);
        }
    }

    fn mark_key(&mut self, page: &mut dyn Page, key: MarkKey) {
        let setting = self.mode == Mode::MarkSet;
        self.set_mode(Mode::Normal);
        let now = page.now();

        match (setting, key.scope()) {
            (true, MarkScope::Local) => {
                self.marks.set_local(key, page.url(), page.scroll_position());
                self.show_status(NotificationLevel::Info, format!("Mark '{}' set", key), now);
            }
            (true, MarkScope::Global) => {
                let owner = self.hosted.or_else(|| self.history.current());
                self.marks
                    .set_global(key, page.url(), page.scroll_position(), owner, now.as_millis());
                self.persist_global_marks();
                self.show_status(NotificationLevel::Info, format!("Mark '{}' set", key), now);
            }
            (false, MarkScope::Local) => match self.marks.goto_local(key, &page.url()) {
                Ok(position) => page.scroll_to(position),
                Err(err) => {
                    if let MarkError::UrlMismatch { .. } = err {
                        self.logger.record(
                            LogEntry::new(LogLevel::Warn, err.to_string())
                                .with_source(sources::MARKS)
                                .with_field("current", page.url()),
                        );
                    }
                    self.show_status(NotificationLevel::Warning, err.to_string(), now);
                }
            },
            (false, MarkScope::Global) => match self.marks.global(key) {
                Ok(_) => self.request(
                    RequestKind::Tabs(TabRequest::List {
                        scope: ContextScope::AllWindows,
                    }),
                    Continuation::GlobalMarkList { key },
                    false,
                ),
                Err(err) => self.show_status(NotificationLevel::Warning, err.to_string(), now),
            },
        }
    }

    fn report_search(&mut self, status: SearchStatus, now: Instant) {
        if let SearchStatus::Error(err) = &status {
            self.logger.record(
                LogEntry::new(LogLevel::Error, format!("Find failed: {}", err))
                    .with_source(sources::SEARCH),
            );
        }
        if !self.search.is_open() {
            if let Some(message) = status.message() {
                self.show_status(NotificationLevel::Warning, message, now);
            }
        }
    }

    /// Carries out what the command line asked for
    fn apply_effects(&mut self, effects: Vec<Effect>) {
        if self.mode.is_command_line() {
            let mode = match self.command_line.phase() {
                Phase::Command => Mode::CommandLine,
                Phase::Selection => Mode::BufferSelection,
            };
            self.set_mode(mode);
        }

        for effect in effects {
            match effect {
                Effect::Close => self.close_command_line(),
                Effect::ListContexts => self.request(
                    RequestKind::Tabs(TabRequest::List {
                        scope: self.config.tab_scope,
                    }),
                    Continuation::CommandLineContexts,
                    true,
                ),
                Effect::Activate(entry) => self.request(
                    RequestKind::Tabs(TabRequest::Activate(entry.id)),
                    Continuation::CommandLineSwitch { context: entry.id },
                    true,
                ),
                Effect::ExpireMessage { id, after_ms } => self.request(
                    RequestKind::Timer {
                        delay: Duration::from_millis(after_ms),
                    },
                    Continuation::CommandLineMessage(id),
                    false,
                ),
                Effect::CloseAfter { after_ms } => self.request(
                    RequestKind::Timer {
                        delay: Duration::from_millis(after_ms),
                    },
                    Continuation::CommandLineClose,
                    true,
                ),
            }
        }
    }

    fn close_command_line(&mut self) {
        self.command_line.reset();
        if self.mode.is_command_line() {
            self.set_mode(Mode::Normal);
        }
    }

    /// Queues a request; `bound` ties its reply to the current mode epoch
    fn request(&mut self, kind: RequestKind, continuation: Continuation, bound: bool) {
        let request = HostRequest::new(kind);
        self.pending
            .register(request.id, continuation, bound.then_some(self.epoch));
        self.outbox.push(request);
    }

    /// Queues a request whose reply only matters if it failed
    fn fire(&mut self, kind: RequestKind) {
        let name = kind.name();
        self.request(kind, Continuation::FireAndForget { request: name }, false);
    }

    fn persist(&mut self, key: &str, value: String) {
        self.fire(RequestKind::Storage(StorageRequest::Set {
            key: key.to_string(),
            value,
        }));
    }

    fn persist_global_marks(&mut self) {
        match GlobalMarksData::from_marks(self.marks.global_marks()).to_json() {
            Ok(json) => self.persist(storage_keys::GLOBAL_MARKS, json),
            Err(err) => self.logger.error(sources::MARKS, err.to_string()),
        }
    }

    fn persist_settings(&mut self) {
        let data = SettingsOverridesData::from_overrides(&self.registry.export_overrides());
        match serialize_overrides(&data) {
            Ok(json) => self.persist(storage_keys::SETTINGS, json),
            Err(err) => self.logger.error(sources::ENGINE, err.to_string()),
        }
    }

    /// Shows a timed status message
    fn show_status(&mut self, level: NotificationLevel, message: impl Into<String>, now: Instant) {
        let ttl = match level {
            NotificationLevel::Info => self.config.info_ttl_ms,
            NotificationLevel::Warning | NotificationLevel::Error => self.config.error_ttl_ms,
        };
        let id = self
            .status
            .show(Notification::new(level, message, now.as_millis()).with_ttl(ttl));
        self.request(
            RequestKind::Timer {
                delay: Duration::from_millis(ttl),
            },
            Continuation::StatusExpiry(id),
            false,
        );
    }

    fn log_failure(&mut self, request: &str, err: &HostError) {
        self.logger.record(
            LogEntry::new(LogLevel::Error, format!("Request failed: {}", err))
                .with_source(sources::HOST)
                .with_field("request", request),
        );
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClient for Engine {
    fn handle_event(&mut self, page: &mut dyn Page, event: &InputEvent) -> Dispatch {
        match event {
            InputEvent::Key(key) => self.handle_key(page, key),
            InputEvent::Focus(focus) => {
                if self.enabled && self.focus.apply(focus) {
                    let state = if self.focus.is_suppressed() {
                        "Page input focused; keys pass through"
                    } else {
                        "Page input blurred"
                    };
                    self.logger.debug(sources::ENGINE, state);
                }
                Dispatch::PASSED
            }
        }
    }

    fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.outbox)
    }

    fn complete(&mut self, page: &mut dyn Page, id: RequestId, result: HostResult) {
        match self.pending.take(id, self.epoch) {
            Resumed::Run(continuation) => self.resume(page, continuation, result),
            Resumed::Stale(continuation) => self.logger.record(
                LogEntry::new(LogLevel::Debug, "Dropped stale reply")
                    .with_source(sources::ENGINE)
                    .with_field("continuation", format!("{:?}", continuation)),
            ),
            Resumed::Unknown => self
                .logger
                .debug(sources::ENGINE, "Reply for unknown request"),
        }
    }

    fn context_event(&mut self, event: ContextEvent) {
        match event {
            ContextEvent::Activated(context) => self.history.on_activated(context),
            ContextEvent::Loaded(context) => {
                for order in self.pending_scrolls.on_loaded(context) {
                    self.scroll_context(order);
                }
            }
            ContextEvent::Removed(context) => {
                self.history.on_removed(context);
                self.pending_scrolls.cancel(context);
                if self.marks.context_destroyed(context) > 0 {
                    self.persist_global_marks();
                }
            }
        }
    }

    fn document_replaced(&mut self, _page: &mut dyn Page) {
        self.reset_modes();
        self.focus.clear();
        self.marks.clear_local();
        // Replies issued against the old document must not land on the new one
        self.epoch += 1;
    }
}

fn timings(config: &EngineSettings) -> CommandLineTimings {
    CommandLineTimings {
        close_delay_ms: config.cmdline_close_delay_ms,
        error_ttl_ms: config.error_ttl_ms,
        info_ttl_ms: config.info_ttl_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Rect;
    use input_types::{ElementKind, FocusEvent, FocusTarget};
    use services_settings::keys;
    use sim_host::{SimHost, SimPage};

    fn host() -> SimHost<Engine> {
        let mut host = SimHost::new(Engine::new(), SimPage::new("https://docs.test/guide/intro"));
        host.start();
        host
    }

    fn scroll_y(host: &SimHost<Engine>) -> f64 {
        host.page().scroll_position().y
    }

    #[test]
    fn test_startup_requests_persisted_state() {
        let mut engine = Engine::new();
        let requests = engine.take_requests();
        let names: Vec<_> = requests.iter().map(|r| r.kind.name()).collect();
        assert_eq!(
            names,
            vec!["storage.get", "storage.get", "storage.get", "tabs.identify"]
        );
        assert_eq!(engine.pending_requests(), 4);
    }

    #[test]
    fn test_disabled_engine_passes_keys() {
        let mut host = host();
        host.press("<S-Esc>").unwrap();
        assert!(!host.client().is_enabled());
        assert_eq!(host.storage(storage_keys::ENABLED), Some("false"));
        assert_eq!(host.client().status(), Some("Keynav disabled"));

        let dispatch = host.press("j").unwrap();
        assert_eq!(dispatch, vec![Dispatch::PASSED]);
        assert_eq!(scroll_y(&host), 0.0);

        host.press("<S-Esc>").unwrap();
        host.press("j").unwrap();
        assert_eq!(scroll_y(&host), 75.0);
    }

    #[test]
    fn test_toggle_clears_transient_modes() {
        let mut host = host();
        host.press("/").unwrap();
        assert_eq!(host.client().mode(), Mode::SearchInput);
        host.press("<S-Esc>").unwrap();
        assert_eq!(host.client().mode(), Mode::Normal);
        assert!(!host.client().search().is_open());
    }

    #[test]
    fn test_page_input_focus_suppresses_until_escape() {
        let mut host = host();
        host.focus(FocusEvent::In(FocusTarget::page(ElementKind::Input)));
        assert!(host.client().is_suppressed());
        assert_eq!(host.press("j").unwrap(), vec![Dispatch::PASSED]);
        assert_eq!(scroll_y(&host), 0.0);

        assert_eq!(host.press("<Esc>").unwrap(), vec![Dispatch::CONSUMED]);
        assert_eq!(host.page().blur_count(), 1);
        host.press("j").unwrap();
        assert_eq!(scroll_y(&host), 75.0);
    }

    #[test]
    fn test_engine_inputs_do_not_suppress() {
        let mut host = host();
        host.focus(FocusEvent::In(FocusTarget::engine(ElementKind::Input)));
        host.focus(FocusEvent::In(FocusTarget::page(ElementKind::Other)));
        assert!(!host.client().is_suppressed());
    }

    #[test]
    fn test_escape_in_normal_mode_is_not_consumed() {
        let mut host = host();
        host.press("g").unwrap();
        assert_eq!(host.client().prefix(), "g");
        assert_eq!(host.press("<Esc>").unwrap(), vec![Dispatch::PASSED]);
        assert_eq!(host.client().prefix(), "");
    }

    #[test]
    fn test_unbound_keys_pass() {
        let mut host = host();
        assert_eq!(host.press("q<A-j>").unwrap(), vec![Dispatch::PASSED; 2]);
    }

    #[test]
    fn test_mark_mode_abandoned_by_non_letter() {
        let mut host = host();
        host.press("m").unwrap();
        assert_eq!(host.client().mode(), Mode::MarkSet);
        host.press("$").unwrap();
        assert_eq!(host.client().mode(), Mode::Normal);
        assert_eq!(host.page().scroll_position().x, 2000.0);
        assert!(host.client().marks().global_marks().is_empty());
    }

    #[test]
    fn test_escape_leaves_mark_modes() {
        let mut host = host();
        for keys in ["m", "'"] {
            host.press(keys).unwrap();
            let epoch = host.client().epoch();
            assert_eq!(host.press("<Esc>").unwrap(), vec![Dispatch::CONSUMED]);
            assert_eq!(host.client().mode(), Mode::Normal);
            assert_eq!(host.client().epoch(), epoch + 1);
        }
    }

    #[test]
    fn test_document_replacement_resets_and_bumps_epoch() {
        let mut host = host();
        host.page_mut()
            .add_link("https://docs.test/next", Rect::new(10.0, 10.0, 50.0, 12.0));
        host.press("f").unwrap();
        assert_eq!(host.client().mode(), Mode::Follow);
        let epoch = host.client().epoch();

        host.press("<Esc>gu").unwrap();
        assert_eq!(
            host.page().history().last().map(String::as_str),
            Some("https://docs.test/guide/")
        );
        assert_eq!(host.client().mode(), Mode::Normal);
        // One bump for leaving follow mode, one for the new document
        assert_eq!(host.client().epoch(), epoch + 2);
    }

    #[test]
    fn test_set_setting_validates_before_applying() {
        let mut host = host();
        let result = host
            .client_mut()
            .set_setting(keys::HINTS_CHARS, SettingValue::String("aa".into()));
        assert!(matches!(result, Err(crate::EngineError::Alphabet(_))));
        assert_eq!(host.client().settings().hint_chars, EngineSettings::default().hint_chars);

        host.client_mut()
            .set_setting(keys::SCROLL_STEP, SettingValue::Float(40.0))
            .unwrap();
        host.pump();
        assert!(host
            .storage(storage_keys::SETTINGS)
            .is_some_and(|json| json.contains("scroll.step")));
        host.press("j").unwrap();
        assert_eq!(scroll_y(&host), 40.0);
    }

    #[test]
    fn test_stored_settings_apply_at_startup() {
        let mut registry = create_default_registry();
        registry
            .set_override(keys::SCROLL_STEP, SettingValue::Float(10.0))
            .unwrap();
        let json = serialize_overrides(&SettingsOverridesData::from_overrides(
            &registry.export_overrides(),
        ))
        .unwrap();

        let mut host = SimHost::new(Engine::new(), SimPage::new("https://docs.test/"))
            .with_storage(storage_keys::SETTINGS, &json);
        host.start();
        assert_eq!(host.client().settings().scroll_step, 10.0);
    }

    #[test]
    fn test_corrupt_stored_state_is_logged_and_ignored() {
        let mut host = SimHost::new(Engine::new(), SimPage::new("https://docs.test/"))
            .with_storage(storage_keys::GLOBAL_MARKS, "{ not json")
            .with_storage(storage_keys::ENABLED, "maybe");
        host.start();
        assert!(host.client().is_enabled());
        let logger = host.client().logger();
        assert!(logger.contains(LogLevel::Warn, "Ignoring corrupt stored global marks"));
        assert!(logger.contains(LogLevel::Warn, "Ignoring corrupt stored enabled flag"));
    }

    #[test]
    fn test_status_expires_after_ttl() {
        let mut host = host();
        host.press("y").unwrap();
        assert_eq!(host.clipboard(), "https://docs.test/guide/intro");
        assert_eq!(host.client().status(), Some("Copied URL"));
        host.advance(1499);
        assert!(host.client().status().is_some());
        host.advance(1);
        assert_eq!(host.client().status(), None);
    }

    #[test]
    fn test_overlay_reports_mode_and_prefix() {
        let mut host = host();
        host.press("z").unwrap();
        let overlay = host.client().overlay(host.page());
        assert_eq!(overlay.mode, Mode::Normal);
        assert_eq!(overlay.prefix, "z");
        assert!(overlay.render_status_line().contains("NORMAL z"));
    }
}
