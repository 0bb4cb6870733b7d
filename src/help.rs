use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous day"),
    ("l, RIGHT", "Next day"),
    ("k, UP", "Previous week"),
    ("j, DOWN", "Next week"),
    ("ENTER, SPACE", "Select day"),
    ("p, PAGE UP", "Previous month"),
    ("n, PAGE DOWN", "Next month"),
    ("0, HOME", "Go to today"),
    ("g", "Input date to jump to"),
    ("r", "Reload configuration"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEY_WIDTH: usize = 16;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Help<'a>(pub(crate) &'a Theme);

impl Help<'_> {
    fn text(&self) -> Text<'static> {
        let mut lines = KEYS
            .iter()
            .map(|&(key, action)| {
                Line::from_iter([
                    Span::styled(format!("{key:KEY_WIDTH$}"), self.0.title),
                    Span::styled(action, self.0.base),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::styled("Press any key to dismiss.", self.0.disabled));
        Text::from(lines)
    }
}

impl Widget for Help<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Keys ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0.base);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // One column of padding either side keeps the popup off the day cells
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(self.0.base).render(outer_area, buf);
        para.render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_render_centered() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        Help(&theme).render(area, &mut buffer);
        // 12 keys, a blank line, the footer, and two borders
        let top = (0..area.height)
            .find(|&y| row_text(&buffer, y).contains(" Keys "))
            .unwrap();
        assert_eq!(top, 2);
        assert!(row_text(&buffer, 3).contains("│h, LEFT         Previous day"));
        assert!(row_text(&buffer, 16).contains("│Press any key to dismiss."));
        assert!(row_text(&buffer, 17).trim().starts_with('└'));
        assert_eq!(row_text(&buffer, 0).trim(), "");
        assert!(buffer[(15, 3)]
            .style()
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_render_cramped() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 6);
        let mut buffer = Buffer::empty(area);
        Help(&theme).render(area, &mut buffer);
        assert_eq!(buffer.area, area);
    }
}
