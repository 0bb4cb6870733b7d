use super::date::{is_gte, is_lte, same_date, same_month, CalendarDate};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DayState {
    #[default]
    Normal,
    Disabled,
    Today,
}

/// Inclusive selectable range.  A missing side is unbounded.  Callers are
/// expected to keep `min <= max`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DateBounds {
    pub min: Option<CalendarDate>,
    pub max: Option<CalendarDate>,
}

impl DateBounds {
    pub fn new(min: Option<CalendarDate>, max: Option<CalendarDate>) -> DateBounds {
        DateBounds { min, max }
    }

    pub fn unbounded() -> DateBounds {
        DateBounds::default()
    }

    pub fn contains(&self, day: CalendarDate) -> bool {
        self.min.map_or(true, |min| is_gte(day, min))
            && self.max.map_or(true, |max| is_lte(day, max))
    }
}

/// Decides how a day on the page for `visible_month` is displayed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DayStateClassifier {
    pub visible_month: CalendarDate,
    pub bounds: DateBounds,
    pub disabled_by_default: bool,
    pub today: CalendarDate,
}

impl DayStateClassifier {
    // Out-of-range and out-of-month always win over "today".
    pub fn classify(&self, day: CalendarDate) -> DayState {
        if self.disabled_by_default
            || !self.bounds.contains(day)
            || !same_month(day, self.visible_month)
        {
            DayState::Disabled
        } else if same_date(day, self.today) {
            DayState::Today
        } else {
            DayState::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn march_2024(today: CalendarDate) -> DayStateClassifier {
        DayStateClassifier {
            visible_month: date!(2024 - 03 - 15).into(),
            bounds: DateBounds::new(
                Some(date!(2024 - 03 - 01).into()),
                Some(date!(2024 - 03 - 31).into()),
            ),
            disabled_by_default: false,
            today,
        }
    }

    #[test]
    fn test_in_month_in_bounds() {
        let c = march_2024(date!(2024 - 03 - 20).into());
        assert_eq!(c.classify(date!(2024 - 03 - 01).into()), DayState::Normal);
        assert_eq!(c.classify(date!(2024 - 03 - 31).into()), DayState::Normal);
        assert_eq!(c.classify(date!(2024 - 03 - 20).into()), DayState::Today);
    }

    #[test]
    fn test_outside_bounds_and_month() {
        let c = march_2024(date!(2024 - 02 - 29).into());
        assert_eq!(c.classify(date!(2024 - 02 - 29).into()), DayState::Disabled);
        assert_eq!(c.classify(date!(2024 - 04 - 01).into()), DayState::Disabled);
    }

    #[test]
    fn test_out_of_bounds_beats_today() {
        let mut c = march_2024(date!(2024 - 03 - 10).into());
        c.bounds.min = Some(date!(2024 - 03 - 11).into());
        assert_eq!(c.classify(date!(2024 - 03 - 10).into()), DayState::Disabled);
        c.bounds = DateBounds::new(None, Some(date!(2024 - 03 - 09).into()));
        assert_eq!(c.classify(date!(2024 - 03 - 10).into()), DayState::Disabled);
    }

    #[test]
    fn test_out_of_month_beats_today() {
        let mut c = march_2024(date!(2024 - 04 - 02).into());
        c.bounds = DateBounds::unbounded();
        assert_eq!(c.classify(date!(2024 - 04 - 02).into()), DayState::Disabled);
    }

    #[test]
    fn test_disabled_by_default() {
        let mut c = march_2024(date!(2024 - 03 - 10).into());
        c.disabled_by_default = true;
        assert_eq!(c.classify(date!(2024 - 03 - 10).into()), DayState::Disabled);
        assert_eq!(c.classify(date!(2024 - 03 - 11).into()), DayState::Disabled);
    }

    #[test]
    fn test_bounds_contains() {
        let b = DateBounds::new(Some(date!(2024 - 03 - 01).into()), None);
        assert!(b.contains(date!(2030 - 01 - 01).into()));
        assert!(b.contains(date!(2024 - 03 - 01).into()));
        assert!(!b.contains(date!(2024 - 02 - 29).into()));
        assert!(DateBounds::unbounded().contains(date!(1900 - 01 - 01).into()));
    }
}
