use iced::widget::{container, row, space, text};
use iced::{Element, Length};

use crate::app::{Message, Viewer};
use crate::severity::Severity;
use crate::util::{format_clock, truncate_start};

const PATH_MAX_CHARS: usize = 60;

impl Viewer {
    pub(crate) fn view_status(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let size = (self.settings.text_size - 2.0).max(8.0);
        let label = |s: String| text(s).size(size).color(colors.muted);

        let path = self.settings.path.display().to_string();
        let follow = if self.follow.enabled() {
            "following".to_string()
        } else {
            "paused (End to follow)".to_string()
        };
        let updated = self
            .last_update
            .map_or_else(|| "never".to_string(), format_clock);

        let mut bar = row![
            label(truncate_start(&path, PATH_MAX_CHARS)),
            space::horizontal(),
        ]
        .spacing(16);

        if let Some(err) = &self.watch_error {
            bar = bar.push(
                text(format!("polling only: {}", truncate_start(err, 40)))
                    .size(size)
                    .color(colors.warning),
            );
        }

        for severity in [Severity::Error, Severity::Warning] {
            let count = self.lines.iter().filter(|l| l.severity == severity).count();
            if count > 0 {
                bar = bar.push(
                    text(format!("{}: {count}", severity.label()))
                        .size(size)
                        .color(colors.for_severity(severity)),
                );
            }
        }

        bar = bar
            .push(label(format!("{} lines", self.lines.len())))
            .push(label(follow))
            .push(label(format!("updated {updated}")));

        container(bar)
            .padding([4, 10])
            .width(Length::Fill)
            .style(colors.status_bg_style())
            .into()
    }
}
