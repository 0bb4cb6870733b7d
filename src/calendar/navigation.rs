use super::config::CalendarConfig;
use super::date::{same_month, CalendarDate, DateData, OutOfTimeError};
use super::state::DateBounds;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarState {
    /// Any day in the visible month
    pub current_month: CalendarDate,
}

type DateListener = Box<dyn FnMut(DateData)>;

type MonthsListener = Box<dyn FnMut(Vec<DateData>)>;

/// Optional callbacks; a missing one is simply not called
#[derive(Default)]
pub struct Listeners {
    on_day_press: Option<DateListener>,
    on_month_change: Option<DateListener>,
    on_visible_months_change: Option<MonthsListener>,
}

impl Listeners {
    pub fn new() -> Listeners {
        Listeners::default()
    }

    pub fn on_day_press<F: FnMut(DateData) + 'static>(mut self, f: F) -> Listeners {
        self.on_day_press = Some(Box::new(f));
        self
    }

    pub fn on_month_change<F: FnMut(DateData) + 'static>(mut self, f: F) -> Listeners {
        self.on_month_change = Some(Box::new(f));
        self
    }

    pub fn on_visible_months_change<F: FnMut(Vec<DateData>) + 'static>(
        mut self,
        f: F,
    ) -> Listeners {
        self.on_visible_months_change = Some(Box::new(f));
        self
    }

    fn day_pressed(&mut self, day: CalendarDate) {
        if let Some(f) = self.on_day_press.as_mut() {
            f(day.to_data());
        }
    }

    fn month_changed(&mut self, month: CalendarDate) {
        if let Some(f) = self.on_month_change.as_mut() {
            f(month.to_data());
        }
        if let Some(f) = self.on_visible_months_change.as_mut() {
            f(vec![month.to_data()]);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("on_day_press", &self.on_day_press.is_some())
            .field("on_month_change", &self.on_month_change.is_some())
            .field(
                "on_visible_months_change",
                &self.on_visible_months_change.is_some(),
            )
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PressOutcome {
    /// Outside the selectable range; nothing happened
    Ignored,
    Selected,
    SelectedAndNavigated,
}

/// Sole owner of [`CalendarState`]
#[derive(Debug)]
pub struct MonthNavigator {
    state: CalendarState,
    bounds: DateBounds,
    disable_month_change: bool,
    listeners: Listeners,
}

impl MonthNavigator {
    /// Starts on the configured `current` month, or on `today`'s
    pub fn new(config: &CalendarConfig, today: CalendarDate) -> MonthNavigator {
        MonthNavigator {
            state: CalendarState {
                current_month: config.current.unwrap_or(today),
            },
            bounds: config.bounds,
            disable_month_change: config.disable_month_change,
            listeners: Listeners::default(),
        }
    }

    pub fn with_listeners(mut self, listeners: Listeners) -> MonthNavigator {
        self.listeners = listeners;
        self
    }

    pub fn state(&self) -> CalendarState {
        self.state
    }

    pub fn current_month(&self) -> CalendarDate {
        self.state.current_month
    }

    /// Returns `true` if the month changed.  Listeners are only told about
    /// the change when `silent` is false, and only after it has been made.
    pub fn set_month(&mut self, month: CalendarDate, silent: bool) -> bool {
        if same_month(month, self.state.current_month) {
            return false;
        }
        self.state.current_month = month;
        tracing::debug!(month = %month, silent, "Visible month changed");
        if !silent {
            self.listeners.month_changed(month);
        }
        true
    }

    pub fn shift_month(&mut self, delta: i32) -> Result<bool, OutOfTimeError> {
        let month = self.state.current_month.add_months(delta)?;
        Ok(self.set_month(month, false))
    }

    pub fn press_day(&mut self, day: CalendarDate) -> PressOutcome {
        if !self.bounds.contains(day) {
            tracing::debug!(day = %day, "Ignoring press on day outside of bounds");
            return PressOutcome::Ignored;
        }
        let navigated = !self.disable_month_change && self.set_month(day, false);
        self.listeners.day_pressed(day);
        if navigated {
            PressOutcome::SelectedAndNavigated
        } else {
            PressOutcome::Selected
        }
    }

    /// Take on a new configuration.  A `current` month different from the
    /// visible one is adopted without notifying anyone.
    pub fn sync(&mut self, config: &CalendarConfig) -> bool {
        self.bounds = config.bounds;
        self.disable_month_change = config.disable_month_change;
        match config.current {
            Some(current) => {
                let changed = self.set_month(current, true);
                if changed {
                    tracing::debug!(current = %current, "Adopted externally supplied month");
                }
                changed
            }
            None => false,
        }
    }
}
