use crate::calendar::{CalendarConfig, CalendarDate, GridCell, MonthGrid};
use crate::calendar::grid::{Placeholder, DAYS_IN_WEEK};
use crate::day::{fit, ArrowDirection, ArrowRenderer, DefaultArrow};
use ratatui::{prelude::*, widgets::*};

static DAY_NAMES: [&str; DAYS_IN_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Number of columns per day of week
pub const DAY_WIDTH: u16 = 10;

/// Columns taken up by the week number, when shown
const WEEK_NUMBER_WIDTH: u16 = 4;

/// Number of lines taken up by the title, day names, and rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

const LOADING_INDICATOR: &str = " …";

const ACS_HLINE: char = '─';

/// One month page together with the host's cursor and selection
#[derive(Clone, Copy, Debug)]
pub struct MonthView<'a> {
    grid: &'a MonthGrid,
    config: &'a CalendarConfig,
    loading: bool,
    cursor: Option<CalendarDate>,
    selected: Option<CalendarDate>,
}

impl<'a> MonthView<'a> {
    pub fn new(grid: &'a MonthGrid, config: &'a CalendarConfig) -> MonthView<'a> {
        MonthView {
            grid,
            config,
            loading: false,
            cursor: None,
            selected: None,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn cursor(mut self, cursor: Option<CalendarDate>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn selected(mut self, selected: Option<CalendarDate>) -> Self {
        self.selected = selected;
        self
    }

    fn left_margin(&self) -> u16 {
        if self.config.show_week_numbers {
            WEEK_NUMBER_WIDTH
        } else {
            0
        }
    }

    /// Width of the calendar in columns
    pub fn width(&self) -> u16 {
        self.left_margin() + DAY_WIDTH * 7
    }

    /// Number of lines needed to draw every week of the page
    pub fn height(&self) -> u16 {
        let weeks = u16::try_from(self.grid.rows.len()).unwrap_or(u16::MAX);
        HEADER_LINES.saturating_add(weeks.saturating_mul(WEEK_LINES))
    }

    fn title(&self) -> Line<'static> {
        let theme = &self.config.theme;
        let arrows: &dyn ArrowRenderer = self.config.render_arrow.as_deref().unwrap_or(&DefaultArrow);
        let mut spans = Vec::new();
        if !self.config.hide_arrows {
            spans.push(arrows.render_arrow(ArrowDirection::Left, theme));
        }
        spans.push(Span::styled(
            format!(" {} ", self.config.month_title(self.grid.month)),
            theme.title,
        ));
        if !self.config.hide_arrows {
            spans.push(arrows.render_arrow(ArrowDirection::Right, theme));
        }
        if self.loading {
            spans.push(Span::styled(LOADING_INDICATOR, theme.indicator));
        }
        Line::from(spans).centered()
    }
}

impl Widget for MonthView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.config.theme;
        let width = self.width();
        let left = area.width.saturating_sub(width) / 2;
        let area = Rect {
            x: area.x + left,
            width: width.min(area.width),
            ..area
        };
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_line(0, 0, self.title());
        if !self.config.hide_day_names {
            for i in 0..7 {
                let wd = self.config.first_day.nth_next(i);
                let name = DAY_NAMES[usize::from(wd.number_days_from_sunday())];
                canvas.mvprint(
                    1,
                    self.left_margin() + DAY_WIDTH * u16::from(i),
                    fit(name, usize::from(DAY_WIDTH - 1)),
                    Some(theme.weekday),
                );
            }
        }
        canvas.hline(2, 0, ACS_HLINE, width);
        for (i, row) in std::iter::zip(0u16.., &self.grid.rows) {
            let y = HEADER_LINES + i * WEEK_LINES;
            if let Some(wn) = row.week_number {
                canvas.mvprint(y, 0, format!("{:>2}", wn.week), Some(theme.disabled));
            }
            for (j, cell) in std::iter::zip(0u16.., &row.cells) {
                let x = self.left_margin() + DAY_WIDTH * j;
                match cell {
                    GridCell::Day(day) => {
                        let mut line = self.grid.component.renderer().render(day, theme, DAY_WIDTH);
                        if self.selected == Some(day.date) {
                            highlight(&mut line, theme.selected);
                        }
                        if self.cursor == Some(day.date) {
                            highlight(&mut line, theme.cursor);
                        }
                        canvas.draw_line(y, x, line);
                    }
                    GridCell::Placeholder(p) => {
                        let blank = match p {
                            Placeholder::Fill => DAY_WIDTH,
                            Placeholder::Fixed => DAY_WIDTH - 1,
                        };
                        canvas.mvprint(y, x, " ".repeat(blank.into()), Some(theme.base));
                    }
                }
            }
        }
    }
}

fn highlight(line: &mut Line<'_>, style: Style) {
    for span in &mut line.spans {
        span.style = span.style.patch(style);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_line(&mut self, y: u16, x: u16, line: Line<'_>) {
        if y < self.area.height && x < self.area.width {
            let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
            let width = if line.alignment.is_some() {
                self.area.width - x
            } else {
                (self.area.width - x).min(width)
            };
            line.render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width,
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
