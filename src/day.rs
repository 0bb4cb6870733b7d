use crate::calendar::config::MarkingType;
use crate::calendar::grid::DayCell;
use crate::calendar::marking::Marking;
use crate::calendar::state::DayState;
use crate::theme::Theme;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::fmt;
use std::sync::Arc;

/// Maximum number of dots drawn for a multi-dot marking
const MAX_DOTS: usize = 3;

const DOT: &str = "•";

/// Draws one day cell, `width` columns wide
pub trait DayRenderer: fmt::Debug {
    fn render(&self, cell: &DayCell, theme: &Theme, width: u16) -> Line<'static>;
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ArrowDirection {
    Left,
    Right,
}

pub trait ArrowRenderer: fmt::Debug {
    fn render_arrow(&self, direction: ArrowDirection, theme: &Theme) -> Span<'static>;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DefaultArrow;

impl ArrowRenderer for DefaultArrow {
    fn render_arrow(&self, direction: ArrowDirection, theme: &Theme) -> Span<'static> {
        match direction {
            ArrowDirection::Left => Span::styled(" < ", theme.arrow),
            ArrowDirection::Right => Span::styled(" > ", theme.arrow),
        }
    }
}

/// The renderer used for every day of a page, chosen once per page
#[derive(Clone, Debug)]
pub enum DayComponent {
    Simple,
    Period,
    MultiDot,
    Custom(Arc<dyn DayRenderer>),
}

impl DayComponent {
    /// A custom renderer, if given, overrides the one for the marking type.
    pub fn resolve(
        marking_type: MarkingType,
        custom: Option<&Arc<dyn DayRenderer>>,
    ) -> DayComponent {
        match (custom, marking_type) {
            (Some(r), _) => DayComponent::Custom(Arc::clone(r)),
            (None, MarkingType::Simple) => DayComponent::Simple,
            (None, MarkingType::Period) => DayComponent::Period,
            (None, MarkingType::MultiDot) => DayComponent::MultiDot,
        }
    }

    pub fn renderer(&self) -> &dyn DayRenderer {
        match self {
            DayComponent::Simple => &SimpleDay,
            DayComponent::Period => &PeriodDay,
            DayComponent::MultiDot => &MultiDotDay,
            DayComponent::Custom(r) => r.as_ref(),
        }
    }
}

impl PartialEq for DayComponent {
    fn eq(&self, other: &DayComponent) -> bool {
        match (self, other) {
            (DayComponent::Simple, DayComponent::Simple)
            | (DayComponent::Period, DayComponent::Period)
            | (DayComponent::MultiDot, DayComponent::MultiDot) => true,
            (DayComponent::Custom(a), DayComponent::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Day number with an optional dot.  Understands `selected`, `marked`,
/// `disabled`, and `dotColor` in an object marking.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SimpleDay;

impl DayRenderer for SimpleDay {
    fn render(&self, cell: &DayCell, theme: &Theme, width: u16) -> Line<'static> {
        let marking = cell.marking.as_ref();
        let mut style = text_style(cell, theme);
        if flag(marking, "selected") {
            style = style.patch(theme.selected);
        }
        let width = usize::from(width);
        let label = Span::styled(fit(&cell.label.to_string(), width.saturating_sub(1)), style);
        let dot = if flag(marking, "marked") {
            let dot_style = color(marking, "dotColor").map_or(theme.dot, |c| theme.dot.fg(c));
            Span::styled(DOT, dot_style)
        } else {
            Span::styled(" ", theme.base)
        };
        Line::from(vec![label, dot])
    }
}

/// Fills the whole cell for days inside a marked period.  The marking is a
/// period object (`startingDay`, `endingDay`, `color`, `textColor`) or a list
/// of them, of which the first is drawn.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PeriodDay;

impl DayRenderer for PeriodDay {
    fn render(&self, cell: &DayCell, theme: &Theme, width: u16) -> Line<'static> {
        let width = usize::from(width);
        let period = match cell.marking.as_ref() {
            Some(Marking::Array(periods)) => periods.first(),
            other => other,
        };
        let Some(period) = period else {
            let label = fit(&cell.label.to_string(), width);
            return Line::from(Span::styled(label, text_style(cell, theme)));
        };
        let mut style = theme.period;
        if let Some(bg) = color(Some(period), "color") {
            style = style.bg(bg);
        }
        if let Some(fg) = color(Some(period), "textColor") {
            style = style.fg(fg);
        }
        if cell.state == DayState::Disabled {
            style = style.fg(theme.disabled.fg.unwrap_or(Color::DarkGray));
        }
        let open = if flag(Some(period), "startingDay") { "[" } else { " " };
        let close = if flag(Some(period), "endingDay") { "]" } else { " " };
        let label = fit(&cell.label.to_string(), width.saturating_sub(2));
        Line::from(Span::styled(format!("{open}{label}{close}"), style))
    }
}

/// Day number followed by up to three colored dots.  The marking is an
/// object with `dots: [{color}]` and an optional `selected` flag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MultiDotDay;

impl DayRenderer for MultiDotDay {
    fn render(&self, cell: &DayCell, theme: &Theme, width: u16) -> Line<'static> {
        let marking = cell.marking.as_ref();
        let mut style = text_style(cell, theme);
        if flag(marking, "selected") {
            style = style.patch(theme.selected);
        }
        let dots = marking
            .and_then(|m| m.get("dots"))
            .and_then(Marking::as_array)
            .map(|dots| {
                dots.iter()
                    .take(MAX_DOTS)
                    .map(|d| {
                        let c = color(Some(d), "color");
                        Span::styled(DOT, c.map_or(theme.dot, |c| theme.dot.fg(c)))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let width = usize::from(width);
        let label = fit(&cell.label.to_string(), width.saturating_sub(MAX_DOTS));
        let mut spans = Vec::with_capacity(MAX_DOTS + 2);
        spans.push(Span::styled(label, style));
        let pad = MAX_DOTS - dots.len();
        spans.extend(dots);
        spans.push(Span::styled(" ".repeat(pad), theme.base));
        Line::from(spans)
    }
}

fn text_style(cell: &DayCell, theme: &Theme) -> Style {
    if flag(cell.marking.as_ref(), "disabled") {
        return theme.disabled;
    }
    match cell.state {
        DayState::Normal => theme.day,
        DayState::Disabled => theme.disabled,
        DayState::Today => theme.today,
    }
}

fn flag(marking: Option<&Marking>, key: &str) -> bool {
    marking
        .and_then(|m| m.get(key))
        .and_then(Marking::as_bool)
        .unwrap_or(false)
}

fn color(marking: Option<&Marking>, key: &str) -> Option<Color> {
    marking?.get(key)?.as_str()?.parse().ok()
}

/// Center `text` in `width` columns, cutting it short if it doesn't fit
pub(crate) fn fit(text: &str, width: usize) -> String {
    let text = text.chars().take(width).collect::<String>();
    format!("{text:^width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::date::CalendarDate;
    use crate::calendar::label::DayLabel;
    use serde_json::json;
    use time::macros::date;

    fn cell(state: DayState, marking: Option<Marking>, label: DayLabel) -> DayCell {
        DayCell {
            date: CalendarDate::from(date!(2024 - 03 - 15)),
            state,
            marking,
            label,
        }
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_simple_plain() {
        let theme = Theme::default();
        let line = SimpleDay.render(&cell(DayState::Normal, None, DayLabel::Day(15)), &theme, 10);
        assert_eq!(text(&line), "   15     ");
        assert_eq!(line.spans[0].style, theme.day);
    }

    #[test]
    fn test_simple_marked_selected() {
        let theme = Theme::default();
        let c = cell(
            DayState::Today,
            Some(json!({"selected": true, "marked": true, "dotColor": "blue"})),
            DayLabel::Today,
        );
        let line = SimpleDay.render(&c, &theme, 10);
        assert_eq!(text(&line), "  Today  •");
        assert_eq!(line.spans[0].style, theme.today.patch(theme.selected));
        assert_eq!(line.spans[1].style, theme.dot.fg(Color::Blue));
    }

    #[test]
    fn test_simple_truncates_long_labels() {
        let theme = Theme::default();
        let c = cell(
            DayState::Normal,
            None,
            DayLabel::Holiday(String::from("Independence")),
        );
        assert_eq!(text(&SimpleDay.render(&c, &theme, 10)), "Independe ");
    }

    #[test]
    fn test_period_edges() {
        let theme = Theme::default();
        let c = cell(
            DayState::Normal,
            Some(json!([{"startingDay": true, "color": "green"}])),
            DayLabel::Day(1),
        );
        let line = PeriodDay.render(&c, &theme, 10);
        assert_eq!(text(&line), "[   1     ");
        assert_eq!(line.spans[0].style, theme.period.bg(Color::Green));
        let c = cell(
            DayState::Normal,
            Some(json!({"endingDay": true})),
            DayLabel::Day(3),
        );
        assert_eq!(text(&PeriodDay.render(&c, &theme, 10)), "    3    ]");
    }

    #[test]
    fn test_period_unmarked_fills_width() {
        let theme = Theme::default();
        let c = cell(DayState::Disabled, None, DayLabel::Day(9));
        let line = PeriodDay.render(&c, &theme, 6);
        assert_eq!(text(&line), "  9   ");
        assert_eq!(line.spans[0].style, theme.disabled);
    }

    #[test]
    fn test_multi_dot() {
        let theme = Theme::default();
        let c = cell(
            DayState::Normal,
            Some(json!({"dots": [{"key": "a", "color": "red"}, {"key": "b"}]})),
            DayLabel::Day(20),
        );
        let line = MultiDotDay.render(&c, &theme, 10);
        assert_eq!(text(&line), "  20   •• ");
        assert_eq!(line.spans[1].style, theme.dot.fg(Color::Red));
        assert_eq!(line.spans[2].style, theme.dot);
    }

    #[test]
    fn test_multi_dot_caps_dots() {
        let theme = Theme::default();
        let c = cell(
            DayState::Normal,
            Some(json!({"dots": [{}, {}, {}, {}, {}]})),
            DayLabel::Day(2),
        );
        assert_eq!(text(&MultiDotDay.render(&c, &theme, 8)), "  2  •••");
    }

    #[derive(Debug)]
    struct Blank;

    impl DayRenderer for Blank {
        fn render(&self, _cell: &DayCell, _theme: &Theme, width: u16) -> Line<'static> {
            Line::raw(" ".repeat(width.into()))
        }
    }

    #[test]
    fn test_resolve_component() {
        assert_eq!(
            DayComponent::resolve(MarkingType::Simple, None),
            DayComponent::Simple
        );
        assert_eq!(
            DayComponent::resolve(MarkingType::Period, None),
            DayComponent::Period
        );
        assert_eq!(
            DayComponent::resolve(MarkingType::MultiDot, None),
            DayComponent::MultiDot
        );
        let custom: Arc<dyn DayRenderer> = Arc::new(Blank);
        let resolved = DayComponent::resolve(MarkingType::Period, Some(&custom));
        assert_eq!(resolved, DayComponent::Custom(Arc::clone(&custom)));
        let c = cell(DayState::Normal, None, DayLabel::Day(1));
        assert_eq!(
            text(&resolved.renderer().render(&c, &Theme::default(), 4)),
            "    "
        );
    }

    #[test]
    fn test_default_arrows() {
        let theme = Theme::default();
        assert_eq!(
            DefaultArrow.render_arrow(ArrowDirection::Left, &theme).content,
            " < "
        );
        assert_eq!(
            DefaultArrow.render_arrow(ArrowDirection::Right, &theme).content,
            " > "
        );
    }
}
