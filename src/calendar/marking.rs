use super::date::CalendarDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// An opaque per-day annotation.  Only the day renderer looks inside it.
pub type Marking = Value;

/// Markings keyed by canonical `yyyy-MM-dd` date string
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MarkingMap(HashMap<String, Marking>);

impl MarkingMap {
    pub fn new() -> MarkingMap {
        MarkingMap::default()
    }

    pub fn from_json(s: &str) -> Result<MarkingMap, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn insert(&mut self, date: CalendarDate, marking: Marking) -> Option<Marking> {
        self.0.insert(date.key(), marking)
    }

    /// The raw entry for `date`, empty or not
    pub fn get(&self, date: CalendarDate) -> Option<&Marking> {
        self.0.get(&date.key())
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.0.contains_key(&date.key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CalendarDate, Marking)> for MarkingMap {
    fn from_iter<I: IntoIterator<Item = (CalendarDate, Marking)>>(iter: I) -> MarkingMap {
        MarkingMap(iter.into_iter().map(|(d, m)| (d.key(), m)).collect())
    }
}

/// Look up the marking for `day`.  A missing map, a missing entry, and an
/// entry that is present but empty all come out as `None`.
pub fn resolve(day: CalendarDate, marks: Option<&MarkingMap>) -> Option<&Marking> {
    marks?.get(day).filter(|m| !is_blank(m))
}

fn is_blank(marking: &Marking) -> bool {
    match marking {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
