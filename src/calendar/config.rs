use super::date::{CalendarDate, DateLike, InvalidDate, OutOfTimeError};
use super::label::HolidayTable;
use super::marking::MarkingMap;
use super::state::DateBounds;
use crate::day::{ArrowRenderer, DayRenderer};
use crate::theme::Theme;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use time::{
    format_description::{self, BorrowedFormatItem, OwnedFormatItem},
    macros::format_description,
    Weekday,
};

static DEFAULT_MONTH_FMT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [year]");

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MarkingType {
    #[default]
    Simple,
    Period,
    MultiDot,
}

/// Every construction option that can be written down in a file.  Dates are
/// still unparsed here; see [`CalendarConfig::from_options`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarOptions {
    pub marked_dates: Option<MarkingMap>,
    pub current: Option<DateLike>,
    pub min_date: Option<DateLike>,
    pub max_date: Option<DateLike>,
    pub first_day: u8,
    pub marking_type: MarkingType,
    pub hide_arrows: bool,
    pub display_loading_indicator: bool,
    pub hide_extra_days: bool,
    pub month_format: Option<String>,
    pub disable_month_change: bool,
    pub hide_day_names: bool,
    pub disabled_by_default: bool,
    pub show_week_numbers: bool,
}

impl CalendarOptions {
    pub fn from_toml(s: &str) -> Result<CalendarOptions, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }
}

/// Validated calendar configuration.
///
/// Fields compared by [`should_update`](super::gate::should_update) by
/// identity (`theme`, `marked_dates`, `day_component`, `render_arrow`,
/// `holidays`) must be replaced with a new `Arc` rather than mutated in place
/// for a change to be noticed.
#[derive(Clone, Debug)]
pub struct CalendarConfig {
    pub theme: Arc<Theme>,
    pub marked_dates: Option<Arc<MarkingMap>>,
    pub current: Option<CalendarDate>,
    pub bounds: DateBounds,
    pub first_day: Weekday,
    pub marking_type: MarkingType,
    pub hide_arrows: bool,
    pub display_loading_indicator: bool,
    pub hide_extra_days: bool,
    pub day_component: Option<Arc<dyn DayRenderer>>,
    pub render_arrow: Option<Arc<dyn ArrowRenderer>>,
    pub month_format: Option<Arc<OwnedFormatItem>>,
    pub disable_month_change: bool,
    pub hide_day_names: bool,
    pub disabled_by_default: bool,
    pub show_week_numbers: bool,
    pub holidays: Arc<HolidayTable>,
}

impl Default for CalendarConfig {
    fn default() -> CalendarConfig {
        CalendarConfig {
            theme: Arc::new(Theme::default()),
            marked_dates: None,
            current: None,
            bounds: DateBounds::unbounded(),
            first_day: Weekday::Sunday,
            marking_type: MarkingType::Simple,
            hide_arrows: false,
            display_loading_indicator: false,
            hide_extra_days: false,
            day_component: None,
            render_arrow: None,
            month_format: None,
            disable_month_change: false,
            hide_day_names: false,
            disabled_by_default: false,
            show_week_numbers: false,
            holidays: Arc::new(HolidayTable::fixed_date()),
        }
    }
}

impl CalendarConfig {
    pub fn from_options(opts: CalendarOptions) -> Result<CalendarConfig, ConfigError> {
        let resolve = |d: Option<DateLike>| d.as_ref().map(DateLike::resolve).transpose();
        if opts.first_day > 6 {
            return Err(ConfigError::InvalidFirstDay(opts.first_day));
        }
        let month_format = opts
            .month_format
            .map(|format| match format_description::parse_owned::<1>(&format) {
                Ok(item) => Ok(Arc::new(item)),
                Err(source) => Err(ConfigError::InvalidMonthFormat { format, source }),
            })
            .transpose()?;
        Ok(CalendarConfig {
            marked_dates: opts.marked_dates.map(Arc::new),
            current: resolve(opts.current)?,
            bounds: DateBounds::new(resolve(opts.min_date)?, resolve(opts.max_date)?),
            first_day: Weekday::Sunday.nth_next(opts.first_day),
            marking_type: opts.marking_type,
            hide_arrows: opts.hide_arrows,
            display_loading_indicator: opts.display_loading_indicator,
            hide_extra_days: opts.hide_extra_days,
            month_format,
            disable_month_change: opts.disable_month_change,
            hide_day_names: opts.hide_day_names,
            disabled_by_default: opts.disabled_by_default,
            show_week_numbers: opts.show_week_numbers,
            ..CalendarConfig::default()
        })
    }

    pub fn with_theme(mut self, theme: Arc<Theme>) -> CalendarConfig {
        self.theme = theme;
        self
    }

    pub fn with_marked_dates(mut self, marks: Arc<MarkingMap>) -> CalendarConfig {
        self.marked_dates = Some(marks);
        self
    }

    pub fn with_day_component(mut self, renderer: Arc<dyn DayRenderer>) -> CalendarConfig {
        self.day_component = Some(renderer);
        self
    }

    pub fn with_render_arrow(mut self, renderer: Arc<dyn ArrowRenderer>) -> CalendarConfig {
        self.render_arrow = Some(renderer);
        self
    }

    pub fn with_holidays(mut self, holidays: Arc<HolidayTable>) -> CalendarConfig {
        self.holidays = holidays;
        self
    }

    /// Title for the page showing `month`
    pub fn month_title(&self, month: CalendarDate) -> String {
        let formatted = match &self.month_format {
            Some(item) => month.date().format(item.as_ref()),
            None => month.date().format(DEFAULT_MONTH_FMT),
        };
        formatted.unwrap_or_else(|_| month.key())
    }

    /// Whether to show the "data not yet loaded" indicator: the marked dates
    /// don't reach the last day of `current`'s month
    pub fn show_loading_indicator(&self) -> Result<bool, OutOfTimeError> {
        if !self.display_loading_indicator {
            return Ok(false);
        }
        let Some(current) = self.current else {
            return Ok(false);
        };
        let last = current.last_day_of_month()?;
        Ok(!self
            .marked_dates
            .as_ref()
            .is_some_and(|marks| marks.contains(last)))
    }
}

/// Where the binary rereads its configuration from
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigSource {
    pub config_file: Option<PathBuf>,
    pub marks_file: Option<PathBuf>,
}

impl ConfigSource {
    pub fn load(&self) -> Result<CalendarConfig, ConfigError> {
        let mut opts = match &self.config_file {
            Some(path) => CalendarOptions::from_toml(&read(path)?)?,
            None => CalendarOptions::default(),
        };
        if let Some(path) = &self.marks_file {
            opts.marked_dates = Some(MarkingMap::from_json(&read(path)?).map_err(ConfigError::Json)?);
        }
        CalendarConfig::from_options(opts)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
    #[error("first day of week must be from 0 to 6, got {0}")]
    InvalidFirstDay(u8),
    #[error("invalid month format {format:?}")]
    InvalidMonthFormat {
        format: String,
        source: time::error::InvalidFormatDescription,
    },
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse configuration")]
    Toml(#[source] toml::de::Error),
    #[error("failed to parse marked dates")]
    Json(#[source] serde_json::Error),
}
