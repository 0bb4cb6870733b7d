use super::config::{CalendarConfig, MarkingType};
use super::date::{page, same_month, CalendarDate, OutOfTimeError};
use super::label::{DayLabel, LabelResolver};
use super::marking::{self, Marking};
use super::state::{DayState, DayStateClassifier};
use crate::day::DayComponent;

pub const DAYS_IN_WEEK: usize = 7;

/// One annotated day, built fresh for every page
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub date: CalendarDate,
    pub state: DayState,
    pub marking: Option<Marking>,
    pub label: DayLabel,
}

/// Space held for a hidden day of an adjacent month
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Placeholder {
    /// Stretches to fill the cell, so that period bands line up
    Fill,
    Fixed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GridCell {
    Day(DayCell),
    Placeholder(Placeholder),
}

impl GridCell {
    pub fn day(&self) -> Option<&DayCell> {
        match self {
            GridCell::Day(cell) => Some(cell),
            GridCell::Placeholder(_) => None,
        }
    }
}

/// ISO week number shown at the start of a row; never interactive
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekNumberCell {
    pub week: u8,
    pub state: DayState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeekRow {
    pub week_number: Option<WeekNumberCell>,
    pub cells: [GridCell; DAYS_IN_WEEK],
    /// Every date in the row, including those behind placeholders
    pub dates: [CalendarDate; DAYS_IN_WEEK],
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    pub month: CalendarDate,
    pub rows: Vec<WeekRow>,
    pub component: DayComponent,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().filter_map(GridCell::day))
    }

    /// Row and column at which `date` appears on this page
    pub fn position(&self, date: CalendarDate) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.dates.iter().position(|&d| d == date).map(|c| (r, c))
        })
    }
}

/// Lays out the page for a month from a configuration and a fixed "today"
#[derive(Clone, Copy, Debug)]
pub struct GridBuilder<'a> {
    config: &'a CalendarConfig,
    today: CalendarDate,
}

impl<'a> GridBuilder<'a> {
    pub fn new(config: &'a CalendarConfig, today: CalendarDate) -> GridBuilder<'a> {
        GridBuilder { config, today }
    }

    pub fn build(&self, month: CalendarDate) -> Result<MonthGrid, OutOfTimeError> {
        let days = page(month, self.config.first_day)?;
        let classifier = DayStateClassifier {
            visible_month: month,
            bounds: self.config.bounds,
            disabled_by_default: self.config.disabled_by_default,
            today: self.today,
        };
        let labels = LabelResolver {
            today: self.today,
            holidays: &self.config.holidays,
        };
        let placeholder = match self.config.marking_type {
            MarkingType::Period => Placeholder::Fill,
            MarkingType::Simple | MarkingType::MultiDot => Placeholder::Fixed,
        };
        let rows = days
            .chunks_exact(DAYS_IN_WEEK)
            .map(|week| {
                let dates: [CalendarDate; DAYS_IN_WEEK] =
                    std::array::from_fn(|i| week[i]);
                let cells = dates.map(|date| {
                    if self.config.hide_extra_days && !same_month(date, month) {
                        GridCell::Placeholder(placeholder)
                    } else {
                        GridCell::Day(DayCell {
                            date,
                            state: classifier.classify(date),
                            marking: marking::resolve(date, self.config.marked_dates.as_deref())
                                .cloned(),
                            label: labels.label(date),
                        })
                    }
                });
                let week_number = self.config.show_week_numbers.then(|| WeekNumberCell {
                    week: dates[DAYS_IN_WEEK - 1].iso_week(),
                    state: DayState::Disabled,
                });
                WeekRow {
                    week_number,
                    cells,
                    dates,
                }
            })
            .collect();
        Ok(MonthGrid {
            month,
            rows,
            component: DayComponent::resolve(
                self.config.marking_type,
                self.config.day_component.as_ref(),
            ),
        })
    }
}
