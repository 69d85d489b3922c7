use iced::widget::text::{Shaping, Wrapping};
use iced::widget::{column, scrollable, text};
use iced::{Color, Element, Font, Length};

use crate::app::{log_pane_id, Message, Viewer};

const PANE_PADDING: u16 = 8;

impl Viewer {
    pub(crate) fn view_log(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let size = self.settings.text_size;
        let wrapping = if self.wrap {
            Wrapping::Word
        } else {
            Wrapping::None
        };

        let line = |content: &str, color: Color| {
            text(content.to_string())
                .size(size)
                .font(Font::MONOSPACE)
                .shaping(Shaping::Advanced)
                .wrapping(wrapping)
                .color(color)
        };

        let mut rows: Vec<Element<'_, Message>> = self
            .lines
            .iter()
            .map(|l| line(&l.text, colors.for_severity(l.severity)).into())
            .collect();

        if let Some(err) = &self.error_line {
            rows.push(line(err, colors.error).into());
        } else if rows.is_empty() {
            rows.push(line("(file is empty)", colors.muted).into());
        }

        let content = column(rows).padding(PANE_PADDING);
        let content = if self.wrap {
            content.width(Length::Fill)
        } else {
            content
        };

        let direction = if self.wrap {
            scrollable::Direction::Vertical(scrollable::Scrollbar::default())
        } else {
            scrollable::Direction::Both {
                vertical: scrollable::Scrollbar::default(),
                horizontal: scrollable::Scrollbar::default(),
            }
        };

        scrollable(content)
            .id(log_pane_id())
            .direction(direction)
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
