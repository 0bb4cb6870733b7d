//! Month-page computation and the state behind it.  Nothing in here draws
//! anything or reads the clock; "today" is always passed in.
pub mod config;
pub mod date;
pub mod gate;
pub mod grid;
pub mod label;
pub mod marking;
pub mod navigation;
pub mod state;
pub use self::config::{CalendarConfig, CalendarOptions, ConfigError, ConfigSource, MarkingType};
pub use self::date::{CalendarDate, DateData, DateLike, InvalidDate, OutOfTimeError};
pub use self::gate::{should_update, Snapshot};
pub use self::grid::{GridBuilder, GridCell, MonthGrid, WeekRow};
pub use self::navigation::{CalendarState, Listeners, MonthNavigator, PressOutcome};
pub use self::state::{DateBounds, DayState};
