use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.fg(Color::Gray).add_modifier(Modifier::BOLD);

pub(crate) const ARROW_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightRed)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = Style::new().fg(Color::White).bg(Color::Red);

pub(crate) const CURSOR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

/// Styles handed through the calendar untouched to whatever draws it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Theme {
    pub base: Style,
    pub title: Style,
    pub arrow: Style,
    pub indicator: Style,
    pub weekday: Style,
    pub day: Style,
    pub today: Style,
    pub disabled: Style,
    pub selected: Style,
    pub dot: Style,
    pub period: Style,
    pub cursor: Style,
    pub popup_unfilled: Style,
    pub popup_ready: Style,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            base: BASE_STYLE,
            title: TITLE_STYLE,
            arrow: ARROW_STYLE,
            indicator: BASE_STYLE.fg(Color::Yellow),
            weekday: WEEKDAY_STYLE,
            day: BASE_STYLE,
            today: TODAY_STYLE,
            disabled: DISABLED_STYLE,
            selected: SELECTED_STYLE,
            dot: BASE_STYLE.fg(Color::LightRed),
            period: Style::new().fg(Color::Black).bg(Color::LightGreen),
            cursor: CURSOR_STYLE,
            popup_unfilled: BASE_STYLE.fg(Color::DarkGray),
            popup_ready: BASE_STYLE.add_modifier(Modifier::UNDERLINED),
        }
    }
}
