//! Resuming work when a host reply arrives
//!
//! Replies are matched to their continuation by request id. Anything a
//! reply touches is looked up again here rather than trusted from the time
//! of the request.

use super::Engine;
use crate::navigation;
use crate::pending::Continuation;
use crate::sources;
use core_types::ContextId;
use host_api::{HostReply, HostResult, Page, RequestKind, TabRequest};
use services_logger::{LogEntry, LogLevel};
use services_marks::{resolve_global_target, GlobalMarksData, GlobalTarget, MarkKey, ScrollOrder};
use services_notification::NotificationLevel;
use services_settings::persistence::load_overrides_safe;

impl Engine {
    pub(super) fn resume(&mut self, page: &mut dyn Page, continuation: Continuation, result: HostResult) {
        match continuation {
            Continuation::LoadEnabled => self.load_enabled(result),
            Continuation::LoadGlobalMarks => self.load_global_marks(result),
            Continuation::LoadSettings => self.load_settings(result),
            Continuation::Identify => match result {
                Ok(HostReply::Hosted(context)) => self.hosted = Some(context),
                other => self.unexpected("tabs.identify", other),
            },
            Continuation::FireAndForget { request } => {
                if let Err(err) = result {
                    self.log_failure(request, &err);
                }
            }
            Continuation::ActivatePrevious { context } => {
                if let Err(err) = result {
                    self.history.forget_previous(context);
                    self.log_failure("tabs.activate", &err);
                }
            }
            Continuation::SwitchToEdge { last } => match result {
                Ok(HostReply::Contexts(contexts)) => {
                    let edge = if last {
                        contexts.iter().max_by_key(|c| c.index)
                    } else {
                        contexts.iter().min_by_key(|c| c.index)
                    };
                    if let Some(context) = edge {
                        let id = context.id;
                        self.fire(RequestKind::Tabs(TabRequest::Activate(id)));
                    }
                }
                other => self.unexpected("tabs.list", other),
            },
            Continuation::ClipboardOpen { new_context } => match result {
                Ok(HostReply::Text(text)) => match navigation::clipboard_url(&text) {
                    Some(url) if new_context => {
                        self.fire(RequestKind::Tabs(TabRequest::OpenAndFocus { url }))
                    }
                    Some(url) => self.navigate(page, &url),
                    None => self.logger.warn(sources::ENGINE, "Clipboard does not hold a URL"),
                },
                other => self.unexpected("clipboard.read", other),
            },

            Continuation::GlobalMarkList { key } => match result {
                Ok(HostReply::Contexts(contexts)) => {
                    let Ok(mark) = self.marks.global(key) else {
                        return;
                    };
                    match resolve_global_target(mark, &contexts) {
                        GlobalTarget::Existing(context) => self.request(
                            RequestKind::Tabs(TabRequest::Activate(context)),
                            Continuation::GlobalMarkActivate { key, context },
                            false,
                        ),
                        GlobalTarget::OpenNew(url) => self.request(
                            RequestKind::Tabs(TabRequest::OpenAndFocus { url }),
                            Continuation::GlobalMarkOpened { key },
                            false,
                        ),
                    }
                }
                other => self.mark_failure(page, key, "tabs.list", other),
            },
            Continuation::GlobalMarkActivate { key, context } => match result {
                Ok(_) => {
                    if let Ok(mark) = self.marks.global(key) {
                        let position = mark.position;
                        self.scroll_context(ScrollOrder { context, position });
                    }
                }
                Err(err) => self.mark_failure(page, key, "tabs.activate", Err(err)),
            },
            Continuation::GlobalMarkOpened { key } => match result {
                Ok(HostReply::Opened(context)) => self.defer_mark_scroll(key, context),
                other => self.mark_failure(page, key, "tabs.open", other),
            },
            Continuation::MarkScrollTimeout { token } => {
                if let Some(order) = self.pending_scrolls.on_timeout(token) {
                    self.logger.record(
                        LogEntry::new(LogLevel::Debug, "No load signal; scrolling on timeout")
                            .with_source(sources::MARKS)
                            .with_field("context", order.context.as_u64()),
                    );
                    self.scroll_context(order);
                }
            }

            Continuation::CommandLineContexts => {
                let listing = match result {
                    Ok(HostReply::Contexts(contexts)) => {
                        self.logger.record(
                            LogEntry::new(LogLevel::Debug, "Listed contexts for :buffer")
                                .with_source(sources::CMDLINE)
                                .with_field("count", contexts.len()),
                        );
                        Ok(contexts)
                    }
                    Ok(other) => {
                        self.unexpected("tabs.list", Ok(other));
                        return;
                    }
                    Err(err) => {
                        self.log_command_line_failure("tabs.list", &err);
                        Err(err)
                    }
                };
                let effects = self
                    .command_line
                    .on_contexts(listing, page.now().as_millis());
                self.apply_effects(effects);
            }
            Continuation::CommandLineSwitch { context } => {
                match &result {
                    Ok(_) => self.logger.record(
                        LogEntry::new(LogLevel::Info, "Switched context from :buffer")
                            .with_source(sources::CMDLINE)
                            .with_field("context", context.as_u64()),
                    ),
                    Err(err) => self.log_command_line_failure("tabs.activate", err),
                }
                let effects = self
                    .command_line
                    .on_switch_result(result.map(|_| ()), page.now().as_millis());
                self.apply_effects(effects);
            }
            Continuation::CommandLineClose => self.close_command_line(),
            Continuation::CommandLineMessage(id) => {
                self.command_line.expire_message(id);
            }
            Continuation::StatusExpiry(id) => {
                self.status.expire(id);
            }
        }
    }

    fn load_enabled(&mut self, result: HostResult) {
        if self.enabled_touched {
            self.logger
                .debug(sources::ENGINE, "Toggled before the stored flag loaded; ignoring it");
            return;
        }
        match result {
            Ok(HostReply::Value(Some(text))) => match serde_json::from_str::<bool>(&text) {
                Ok(enabled) => {
                    self.enabled = enabled;
                    if !enabled {
                        self.reset_modes();
                    }
                }
                Err(err) => self.corrupt("enabled flag", err),
            },
            Ok(HostReply::Value(None)) => {}
            other => self.unexpected("storage.get", other),
        }
    }

    fn load_global_marks(&mut self, result: HostResult) {
        match result {
            Ok(HostReply::Value(Some(text))) => match GlobalMarksData::from_json(&text) {
                Ok(data) => self.marks.load_global(data.into_marks()),
                Err(err) => self.corrupt("global marks", err),
            },
            Ok(HostReply::Value(None)) => {}
            other => self.unexpected("storage.get", other),
        }
    }

    fn load_settings(&mut self, result: HostResult) {
        let text = match result {
            Ok(HostReply::Value(Some(text))) => text,
            Ok(HostReply::Value(None)) => return,
            other => return self.unexpected("storage.get", other),
        };

        let (data, err) = load_overrides_safe(&text);
        if let Some(err) = err {
            self.corrupt("settings", err);
            return;
        }

        let mut registry = self.registry.clone();
        for rejected in registry.apply_overrides(data.to_overrides()) {
            self.logger.warn(sources::ENGINE, format!("Ignoring stored setting: {}", rejected));
        }
        if let Err(err) = self.apply_registry(registry) {
            self.corrupt("settings", err);
        }
    }

    fn defer_mark_scroll(&mut self, key: MarkKey, context: ContextId) {
        let Ok(mark) = self.marks.global(key) else {
            return;
        };
        let token = self.pending_scrolls.add(context, mark.position);
        let delay = host_api::Duration::from_millis(self.config.mark_load_timeout_ms);
        self.request(
            RequestKind::Timer { delay },
            Continuation::MarkScrollTimeout { token },
            false,
        );
    }

    pub(super) fn scroll_context(&mut self, order: ScrollOrder) {
        self.fire(RequestKind::ScrollContext {
            context: order.context,
            position: order.position,
        });
    }

    fn mark_failure(&mut self, page: &dyn Page, key: MarkKey, request: &str, result: HostResult) {
        match result {
            Err(err) => {
                self.log_failure(request, &err);
                self.show_status(
                    NotificationLevel::Error,
                    format!("Mark '{}': {}", key, err),
                    page.now(),
                );
            }
            Ok(reply) => self.unexpected(request, Ok(reply)),
        }
    }

    fn log_command_line_failure(&mut self, request: &str, err: &host_api::HostError) {
        self.logger.record(
            LogEntry::new(LogLevel::Error, format!(":buffer failed: {}", err))
                .with_source(sources::CMDLINE)
                .with_field("request", request),
        );
    }

    fn unexpected(&mut self, request: &str, result: HostResult) {
        match result {
            Err(err) => self.log_failure(request, &err),
            Ok(reply) => self.logger.record(
                LogEntry::new(LogLevel::Warn, "Unexpected reply")
                    .with_source(sources::HOST)
                    .with_field("request", request)
                    .with_field("reply", reply_name(&reply)),
            ),
        }
    }

    fn corrupt(&mut self, what: &str, err: impl ToString) {
        self.logger.record(
            LogEntry::new(LogLevel::Warn, format!("Ignoring corrupt stored {}", what))
                .with_source(sources::ENGINE)
                .with_field("error", err.to_string()),
        );
    }
}

fn reply_name(reply: &HostReply) -> &'static str {
    match reply {
        HostReply::Done => "done",
        HostReply::Contexts(_) => "contexts",
        HostReply::Opened(_) => "opened",
        HostReply::Hosted(_) => "hosted",
        HostReply::Value(_) => "value",
        HostReply::Text(_) => "text",
        HostReply::TimerFired => "timer",
    }
}
