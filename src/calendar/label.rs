use super::date::CalendarDate;
use std::collections::BTreeMap;
use std::fmt;
use time::Month;

/// What to show in a day cell instead of, or as, its day number
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DayLabel {
    Today,
    Tomorrow,
    DayAfterTomorrow,
    Holiday(String),
    Day(u8),
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => write!(f, "Today"),
            DayLabel::Tomorrow => write!(f, "Tomorrow"),
            DayLabel::DayAfterTomorrow => write!(f, "In 2 days"),
            DayLabel::Holiday(name) => write!(f, "{name}"),
            DayLabel::Day(n) => write!(f, "{n}"),
        }
    }
}

/// Holidays that fall on the same month and day every year
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HolidayTable(BTreeMap<(u8, u8), String>);

impl HolidayTable {
    pub fn new() -> HolidayTable {
        HolidayTable::default()
    }

    pub fn fixed_date() -> HolidayTable {
        use Month::*;
        [
            (January, 1, "New Year"),
            (February, 14, "Valentine"),
            (April, 5, "Qingming"),
            (May, 1, "May Day"),
            (June, 1, "Kids' Day"),
            (September, 10, "Teachers'"),
            (October, 1, "Natl. Day"),
            (December, 25, "Christmas"),
        ]
        .into_iter()
        .fold(HolidayTable::new(), |table, (month, day, name)| {
            table.with(month, day, name)
        })
    }

    pub fn with<S: Into<String>>(mut self, month: Month, day: u8, name: S) -> HolidayTable {
        self.0.insert((u8::from(month), day), name.into());
        self
    }

    pub fn get(&self, month: Month, day: u8) -> Option<&str> {
        self.0.get(&(u8::from(month), day)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LabelResolver<'a> {
    pub today: CalendarDate,
    pub holidays: &'a HolidayTable,
}

impl LabelResolver<'_> {
    /// Relative labels win over holidays; a day that is neither shows its
    /// day of month.
    pub fn label(&self, day: CalendarDate) -> DayLabel {
        match self.today.days_until(day) {
            0 => DayLabel::Today,
            1 => DayLabel::Tomorrow,
            2 => DayLabel::DayAfterTomorrow,
            _ => match self.holidays.get(day.month(), day.day()) {
                Some(name) => DayLabel::Holiday(name.to_owned()),
                None => DayLabel::Day(day.day()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_relative_labels() {
        let holidays = HolidayTable::fixed_date();
        let r = LabelResolver {
            today: date!(2024 - 01 - 01).into(),
            holidays: &holidays,
        };
        assert_eq!(r.label(date!(2024 - 01 - 01).into()), DayLabel::Today);
        assert_eq!(r.label(date!(2024 - 01 - 02).into()), DayLabel::Tomorrow);
        assert_eq!(
            r.label(date!(2024 - 01 - 03).into()),
            DayLabel::DayAfterTomorrow
        );
        assert_eq!(r.label(date!(2024 - 01 - 04).into()), DayLabel::Day(4));
        assert_eq!(r.label(date!(2023 - 12 - 31).into()), DayLabel::Day(31));
    }

    #[test]
    fn test_holiday_next_year() {
        let holidays = HolidayTable::fixed_date();
        let r = LabelResolver {
            today: date!(2024 - 01 - 01).into(),
            holidays: &holidays,
        };
        assert_eq!(
            r.label(date!(2025 - 01 - 01).into()),
            DayLabel::Holiday(String::from("New Year"))
        );
        assert_eq!(
            r.label(date!(2024 - 12 - 25).into()),
            DayLabel::Holiday(String::from("Christmas"))
        );
    }

    #[test]
    fn test_relative_beats_holiday() {
        let holidays = HolidayTable::fixed_date();
        let r = LabelResolver {
            today: date!(2024 - 12 - 24).into(),
            holidays: &holidays,
        };
        assert_eq!(r.label(date!(2024 - 12 - 25).into()), DayLabel::Tomorrow);
    }

    #[test]
    fn test_month_day_keys_do_not_collide() {
        // "1" + "11" and "11" + "1" would be the same concatenated key
        let holidays = HolidayTable::new().with(Month::November, 1, "All Saints");
        let r = LabelResolver {
            today: date!(2000 - 01 - 01).into(),
            holidays: &holidays,
        };
        assert_eq!(r.label(date!(2024 - 01 - 11).into()), DayLabel::Day(11));
        assert_eq!(
            r.label(date!(2024 - 11 - 01).into()),
            DayLabel::Holiday(String::from("All Saints"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DayLabel::Today.to_string(), "Today");
        assert_eq!(DayLabel::DayAfterTomorrow.to_string(), "In 2 days");
        assert_eq!(DayLabel::Day(7).to_string(), "7");
        assert_eq!(HolidayTable::fixed_date().len(), 8);
    }
}
