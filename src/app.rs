use std::time::SystemTime;

use iced::widget::{column, operation, scrollable};
use iced::{event, window, Element, Size, Subscription, Task};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::ViewerError;
use crate::events::WatchEvent;
use crate::follow::Follow;
use crate::streams;
use crate::tail::{LogLine, TailSnapshot};
use crate::theme::{self, ThemeColors, ThemeMode};
use crate::watcher::{self, WatchTarget};

const LOG_PANE: &str = "log-pane";

pub(crate) fn log_pane_id() -> iced::widget::Id {
    iced::widget::Id::new(LOG_PANE)
}

fn snap_to_end() -> Task<Message> {
    operation::snap_to(log_pane_id(), scrollable::RelativeOffset::END)
}

// --- Viewer State ---

pub(crate) struct Viewer {
    pub(crate) settings: Settings,
    pub(crate) lines: Vec<LogLine>,
    /// Shown after the last line, e.g. `Error reading file: ...`.
    pub(crate) error_line: Option<String>,
    /// OS notifications unavailable; changes are picked up by polling.
    pub(crate) watch_error: Option<String>,
    pub(crate) last_update: Option<SystemTime>,
    pub(crate) follow: Follow,
    pub(crate) wrap: bool,
    pub(crate) theme_mode: ThemeMode,
    pub(crate) colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub(crate) enum Message {
    Watch(WatchEvent),
    Scrolled(scrollable::Viewport),
    JumpToEnd,
    JumpToStart,
    ThemeToggle,
    WrapToggle,
    ThemeRefresh,
    CloseRequested,
}

pub(crate) fn run(settings: Settings) -> Result<(), ViewerError> {
    info!(
        "v{} ({}) tailing last {} lines of {}",
        env!("OSSEC_LOG_VIEWER_VERSION"),
        env!("OSSEC_LOG_VIEWER_COMMIT"),
        settings.lines,
        settings.path.display()
    );

    let window = window_settings(&settings);
    iced::application(
        move || Viewer::new(settings.clone()),
        Viewer::update,
        Viewer::view,
    )
    .title(Viewer::title)
    .style(Viewer::style)
    .subscription(Viewer::subscription)
    .window(window)
    .exit_on_close_request(false)
    .run()?;

    Ok(())
}

fn window_settings(settings: &Settings) -> window::Settings {
    let icon = settings
        .icon
        .as_ref()
        .and_then(|path| match window::icon::from_file(path) {
            Ok(icon) => Some(icon),
            Err(e) => {
                warn!("ignoring window icon {}: {e}", path.display());
                None
            }
        });
    let (width, height) = settings.window_size;
    window::Settings {
        size: Size::new(width, height),
        icon,
        ..Default::default()
    }
}

impl Viewer {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        (Self::load(settings), snap_to_end())
    }

    /// Build the initial state and read the file's current tail.
    pub(crate) fn load(settings: Settings) -> Self {
        let theme_mode = settings.theme;
        let mut viewer = Self {
            lines: Vec::new(),
            error_line: None,
            watch_error: None,
            last_update: None,
            follow: Follow::default(),
            wrap: settings.wrap,
            theme_mode,
            colors: theme::resolve(theme_mode),
            settings,
        };

        match TailSnapshot::load(&viewer.settings.path, viewer.settings.lines) {
            Ok(snapshot) => viewer.apply_snapshot(snapshot),
            Err(e) => {
                error!("Error loading initial content: {e}");
                viewer.error_line = Some(format!("Error loading file: {e}"));
            }
        }
        viewer
    }

    fn apply_snapshot(&mut self, snapshot: TailSnapshot) {
        self.lines = snapshot.lines;
        self.last_update = Some(snapshot.read_at);
        self.error_line = None;
    }

    fn follow_task(&self) -> Task<Message> {
        if self.follow.enabled() {
            snap_to_end()
        } else {
            Task::none()
        }
    }

    fn title(&self) -> String {
        format!("{} - {}", self.settings.title, self.settings.path.display())
    }

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Watch(WatchEvent::Reloaded(snapshot)) => {
                self.apply_snapshot(snapshot);
                self.follow_task()
            }
            Message::Watch(WatchEvent::ReadFailed(e)) => {
                self.error_line = Some(format!("Error reading file: {e}"));
                self.follow_task()
            }
            Message::Watch(WatchEvent::WatchFailed(e)) => {
                self.watch_error = Some(e);
                Task::none()
            }
            Message::Scrolled(viewport) => {
                if self.follow.observe(viewport.relative_offset().y) {
                    info!(
                        "autoscroll {}",
                        if self.follow.enabled() { "resumed" } else { "paused" }
                    );
                }
                Task::none()
            }
            Message::JumpToEnd => {
                self.follow.resume();
                snap_to_end()
            }
            Message::JumpToStart => {
                operation::snap_to(log_pane_id(), scrollable::RelativeOffset::START)
            }
            Message::ThemeToggle => {
                // Flip appearance; Auto re-evaluates on the next refresh.
                self.colors = if self.colors.is_dark {
                    ThemeColors::light()
                } else {
                    ThemeColors::dark()
                };
                info!(
                    "theme toggle -> {} (mode stays {:?})",
                    if self.colors.is_dark { "dark" } else { "light" },
                    self.theme_mode
                );
                Task::none()
            }
            Message::WrapToggle => {
                self.wrap = !self.wrap;
                info!("wrap -> {}", self.wrap);
                self.follow_task()
            }
            Message::ThemeRefresh => {
                if self.theme_mode == ThemeMode::Auto {
                    let dark = theme::detect_system_dark();
                    if dark != self.colors.is_dark {
                        self.colors = if dark {
                            ThemeColors::dark()
                        } else {
                            ThemeColors::light()
                        };
                        info!("auto: switched to {}", if dark { "dark" } else { "light" });
                    }
                }
                Task::none()
            }
            Message::CloseRequested => {
                info!("window closed, stopping watcher");
                iced::exit()
            }
        }
    }

    pub(crate) fn view(&self) -> Element<'_, Message> {
        column![self.view_log(), self.view_status()].into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let target = WatchTarget {
            path: self.settings.path.clone(),
            max_lines: self.settings.lines,
        };

        let mut subs = vec![
            Subscription::run_with(target, watcher::watch_stream).map(Message::Watch),
            event::listen_with(streams::on_event),
        ];

        if self.theme_mode == ThemeMode::Auto {
            subs.push(Subscription::run(streams::theme_refresh_stream));
        }

        Subscription::batch(subs)
    }

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: self.colors.background,
            text_color: self.colors.text,
        }
    }
}
