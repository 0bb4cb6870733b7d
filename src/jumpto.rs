use crate::calendar::CalendarDate;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 16;
const OUTER_HEIGHT: u16 = 8;

/// Digits in a full `YYYYMMDD` entry
const DIGITS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub(crate) struct JumpTo<'a>(pub(crate) &'a Theme);

impl StatefulWidget for JumpTo<'_> {
    type State = JumpToState;

    /*
     * ................
     * .┌─ Jump To… ─┐.
     * .│            │.
     * .│ YYYY-MM-DD │.
     * .│            │.
     * .│  [ENTER]   │.
     * .└────────────┘.
     * ................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let theme = self.0;
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(theme.base).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Jump To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text(theme).render(text_area, buf);
    }
}

/// Date typed so far, one digit at a time
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    digits: [u8; DIGITS],
    len: usize,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    fn complete(&self) -> bool {
        self.len == DIGITS
    }

    fn to_text(self, theme: &Theme) -> Text<'static> {
        Text::from_iter([
            Line::styled("", theme.base),
            self.to_line(theme),
            Line::styled("", theme.base),
            // Only the "[ENTER]" text itself is underlined, not its padding
            Line::from(Span::styled(
                "[ENTER]",
                if self.complete() {
                    theme.popup_ready
                } else {
                    theme.base
                },
            )),
        ])
        .centered()
    }

    fn to_line(self, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, fallback) in "YYYYMMDD".chars().enumerate() {
            if i == 4 || i == 6 {
                spans.push(Span::styled("-", theme.base));
            }
            spans.push(if i < self.len {
                Span::styled(self.digits[i].to_string(), theme.base)
            } else {
                Span::styled(fallback.to_string(), theme.popup_unfilled)
            });
        }
        Line::from_iter(spans)
    }

    /// `YYYY-MM-DD` for the digits entered, if all are present
    fn date_string(&self) -> Option<String> {
        if !self.complete() {
            return None;
        }
        let d = self.digits.map(|d| char::from(b'0' + d));
        Some(format!(
            "{}{}{}{}-{}{}-{}{}",
            d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        ))
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        match input {
            JumpToInput::Digit(d) if d < 10 && self.len < DIGITS => {
                self.digits[self.len] = d;
                self.len += 1;
                JumpToOutput::Ok
            }
            JumpToInput::Backspace if self.len > 0 => {
                self.len -= 1;
                JumpToOutput::Ok
            }
            JumpToInput::Enter => match self.date_string().map(|s| CalendarDate::parse(&s)) {
                Some(Ok(date)) => JumpToOutput::Jump(date),
                Some(Err(e)) => {
                    tracing::debug!(input = e.input(), "Rejected jump target");
                    JumpToOutput::Invalid
                }
                None => JumpToOutput::Invalid,
            },
            _ => JumpToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    Jump(CalendarDate),
}
