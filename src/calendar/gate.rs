use super::config::CalendarConfig;
use super::navigation::CalendarState;
use std::sync::Arc;

/// What a page was (or would be) built from
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub config: &'a CalendarConfig,
    pub state: CalendarState,
}

/// Whether the page has to be rebuilt to go from `prev` to `next`.
///
/// This is a shallow comparison: shared values (`theme`, `marked_dates`,
/// `holidays`, renderers) are compared by identity, so changing one means
/// handing over a new `Arc`.
pub fn should_update(prev: Snapshot<'_>, next: Snapshot<'_>) -> bool {
    changed_field(prev, next).is_some()
}

/// Name of the first field found to differ, if any
pub fn changed_field(prev: Snapshot<'_>, next: Snapshot<'_>) -> Option<&'static str> {
    let (a, b) = (prev.config, next.config);
    if prev.state.current_month != next.state.current_month {
        Some("currentMonth")
    } else if a.current != b.current {
        Some("current")
    } else if a.bounds.min != b.bounds.min {
        Some("minDate")
    } else if a.bounds.max != b.bounds.max {
        Some("maxDate")
    } else if !same_arc(a.marked_dates.as_ref(), b.marked_dates.as_ref()) {
        Some("markedDates")
    } else if a.marking_type != b.marking_type {
        Some("markingType")
    } else if !Arc::ptr_eq(&a.theme, &b.theme) {
        Some("theme")
    } else if a.hide_extra_days != b.hide_extra_days {
        Some("hideExtraDays")
    } else if a.disabled_by_default != b.disabled_by_default {
        Some("disabledByDefault")
    } else if a.show_week_numbers != b.show_week_numbers {
        Some("showWeekNumbers")
    } else if a.first_day != b.first_day {
        Some("firstDay")
    } else if !same_arc(a.render_arrow.as_ref(), b.render_arrow.as_ref()) {
        Some("renderArrow")
    } else if !same_arc(a.day_component.as_ref(), b.day_component.as_ref()) {
        Some("dayComponent")
    } else if a.display_loading_indicator != b.display_loading_indicator {
        Some("displayLoadingIndicator")
    } else if !Arc::ptr_eq(&a.holidays, &b.holidays) {
        Some("holidays")
    } else {
        None
    }
}

fn same_arc<T: ?Sized>(a: Option<&Arc<T>>, b: Option<&Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
