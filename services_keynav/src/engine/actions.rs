//! Single-key and two-key commands

use super::Engine;
use crate::bindings::Action;
use crate::mode::Mode;
use crate::navigation;
use crate::pending::Continuation;
use crate::sources;
use core_types::{ContextScope, ScrollPosition};
use host_api::{ClipboardRequest, Page, RelativeDirection, RequestKind, TabRequest, TabTarget};
use services_follow::{FollowSession, FollowTarget};
use services_logger::{LogEntry, LogLevel};
use services_notification::NotificationLevel;

impl Engine {
    pub(super) fn run_action(&mut self, page: &mut dyn Page, action: Action) {
        let step = self.config.scroll_step;
        let viewport_height = page.viewport().height;

        match action {
            Action::ScrollDown => page.scroll_by(0.0, step),
            Action::ScrollUp => page.scroll_by(0.0, -step),
            Action::ScrollLeft => page.scroll_by(-step, 0.0),
            Action::ScrollRight => page.scroll_by(step, 0.0),
            Action::ScrollLeftmost => {
                let y = page.scroll_position().y;
                page.scroll_to(ScrollPosition::new(0.0, y));
            }
            Action::ScrollRightmost => {
                let y = page.scroll_position().y;
                let width = page.document_extent().width;
                page.scroll_to(ScrollPosition::new(width, y));
            }
            Action::HalfPageDown => {
                page.scroll_by(0.0, viewport_height * self.config.half_page_ratio)
            }
            Action::HalfPageUp => {
                page.scroll_by(0.0, -viewport_height * self.config.half_page_ratio)
            }
            Action::PageDown => page.scroll_by(0.0, viewport_height * self.config.page_ratio),
            Action::PageUp => page.scroll_by(0.0, -viewport_height * self.config.page_ratio),
            Action::ScrollTop => page.scroll_to(ScrollPosition::ORIGIN),
            Action::ScrollBottom => {
                let height = page.document_extent().height;
                page.scroll_to(ScrollPosition::new(0.0, height));
            }

            Action::CloseContext | Action::ClosePinnedContext => {
                self.fire(RequestKind::Tabs(TabRequest::Close(TabTarget::Current)))
            }
            Action::RestoreContext => {
                self.fire(RequestKind::Tabs(TabRequest::RestoreMostRecentlyClosed))
            }
            Action::Reload | Action::HardReload => {
                self.fire(RequestKind::Tabs(TabRequest::Reload {
                    target: TabTarget::Current,
                    bypass_cache: action == Action::HardReload,
                }))
            }
            Action::PreviousContext => self.fire(RequestKind::Tabs(TabRequest::SwitchRelative {
                direction: RelativeDirection::Previous,
            })),
            Action::NextContext => self.fire(RequestKind::Tabs(TabRequest::SwitchRelative {
                direction: RelativeDirection::Next,
            })),
            Action::FirstContext | Action::LastContext => self.request(
                RequestKind::Tabs(TabRequest::List {
                    scope: ContextScope::CurrentWindow,
                }),
                Continuation::SwitchToEdge {
                    last: action == Action::LastContext,
                },
                false,
            ),
            Action::LastActiveContext => match self.history.previous() {
                Some(context) => self.request(
                    RequestKind::Tabs(TabRequest::Activate(context)),
                    Continuation::ActivatePrevious { context },
                    false,
                ),
                None => self.logger.debug(sources::ENGINE, "No previous context"),
            },
            Action::TogglePin => self.fire(RequestKind::Tabs(TabRequest::TogglePin(TabTarget::Current))),
            Action::Duplicate => self.fire(RequestKind::Tabs(TabRequest::Duplicate(TabTarget::Current))),

            Action::HistoryBack => page.history_back(),
            Action::HistoryForward => page.history_forward(),
            Action::CopyUrl => {
                let url = page.url();
                self.fire(RequestKind::Clipboard(ClipboardRequest::WriteText(url)));
                self.show_status(NotificationLevel::Info, "Copied URL", page.now());
            }
            Action::OpenClipboard | Action::OpenClipboardInNewContext => self.request(
                RequestKind::Clipboard(ClipboardRequest::ReadText),
                Continuation::ClipboardOpen {
                    new_context: action == Action::OpenClipboardInNewContext,
                },
                false,
            ),
            Action::ParentDirectory => match navigation::parent_directory(&page.url()) {
                Some(url) => self.navigate(page, &url),
                None => self.logger.debug(sources::ENGINE, "Already at the top directory"),
            },
            Action::SiteRoot => match navigation::site_root(&page.url()) {
                Some(url) => self.navigate(page, &url),
                None => self.logger.debug(sources::ENGINE, "Already at the site root"),
            },
            Action::ViewSource => match navigation::view_source_url(&page.url()) {
                Ok(url) => self.fire(RequestKind::Tabs(TabRequest::OpenAndFocus { url })),
                Err(err) => self.logger.warn(sources::ENGINE, format!("View source: {}", err)),
            },
            Action::PreviousPage | Action::NextPage => {
                let direction = if action == Action::NextPage {
                    RelativeDirection::Next
                } else {
                    RelativeDirection::Previous
                };
                match navigation::rel_link(&page.links(), direction) {
                    Some(url) => self.navigate(page, &url),
                    None => self.logger.record(
                        LogEntry::new(LogLevel::Warn, "No page link found")
                            .with_source(sources::ENGINE)
                            .with_field("direction", format!("{:?}", direction)),
                    ),
                }
            }
            Action::FocusInput => {
                if !page.focus_first_input() {
                    self.logger.debug(sources::ENGINE, "No visible input to focus");
                }
            }

            Action::Follow | Action::FollowInNewContext => {
                let target = if action == Action::FollowInNewContext {
                    FollowTarget::NewContext
                } else {
                    FollowTarget::InPlace
                };
                match FollowSession::start(&page.elements(), page.viewport(), &self.alphabet, target) {
                    Some(session) => {
                        self.logger.record(
                            LogEntry::new(LogLevel::Debug, "Follow started")
                                .with_source(sources::FOLLOW)
                                .with_field("hints", session.hints().len()),
                        );
                        self.follow = Some(session);
                        self.set_mode(Mode::Follow);
                    }
                    None => self.logger.debug(sources::FOLLOW, "No visible targets"),
                }
            }
            Action::SearchStart => self.open_search(),
            Action::SearchNext | Action::SearchPrevious => {
                let reverse = action == Action::SearchPrevious;
                match self.search.repeat(&mut *page, reverse) {
                    Some(status) => self.report_search(status, page.now()),
                    None => self.open_search(),
                }
            }
            Action::MarkSet => self.set_mode(Mode::MarkSet),
            Action::MarkGoto => self.set_mode(Mode::MarkGoto),
            Action::CommandLine => {
                self.command_line.reset();
                self.set_mode(Mode::CommandLine);
            }
        }
    }

    pub(super) fn open_search(&mut self) {
        self.search.open();
        self.set_mode(Mode::SearchInput);
    }

    pub(super) fn navigate(&mut self, page: &mut dyn Page, url: &str) {
        if let Err(err) = page.navigate(url) {
            self.log_failure("page.navigate", &err);
        }
    }
}
