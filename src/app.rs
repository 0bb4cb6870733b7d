use crate::calendar::date::same_month;
use crate::calendar::gate::changed_field;
use crate::calendar::{
    CalendarConfig, CalendarDate, CalendarState, ConfigSource, DateData, GridBuilder, Listeners,
    MonthGrid, MonthNavigator, OutOfTimeError, PressOutcome, Snapshot,
};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::widget::MonthView;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

/// Terminal host for a single calendar
#[derive(Debug)]
pub struct App {
    config: CalendarConfig,
    source: Option<ConfigSource>,
    navigator: MonthNavigator,
    today: CalendarDate,
    cursor: CalendarDate,
    selection: Rc<RefCell<Option<DateData>>>,
    page: Option<Page>,
    state: AppState,
}

impl App {
    pub fn new(config: CalendarConfig, today: CalendarDate) -> App {
        let selection = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&selection);
        let listeners = Listeners::new()
            .on_day_press(move |day: DateData| {
                tracing::info!(day = %day.date_string, "Day selected");
                *sink.borrow_mut() = Some(day);
            })
            .on_month_change(|month| {
                tracing::info!(month = %month.date_string, "Month changed");
            });
        let navigator = MonthNavigator::new(&config, today).with_listeners(listeners);
        App {
            cursor: navigator.current_month(),
            config,
            source: None,
            navigator,
            today,
            selection,
            page: None,
            state: AppState::Calendar,
        }
    }

    /// Where `r` rereads the configuration from
    pub fn with_source(mut self, source: ConfigSource) -> App {
        self.source = Some(source);
        self
    }

    /// Runs until the user quits, then returns the last day selected
    pub fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> Result<Option<DateData>, AppError> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(self.selection.borrow_mut().take())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        self.refresh()?;
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    /// Rebuild the month page if anything it depends on has changed
    fn refresh(&mut self) -> Result<(), OutOfTimeError> {
        let next = Snapshot {
            config: &self.config,
            state: self.navigator.state(),
        };
        if let Some(page) = &self.page {
            match changed_field(page.snapshot(), next) {
                Some(field) => tracing::trace!(field, "Rebuilding month page"),
                None => return Ok(()),
            }
        }
        let grid = GridBuilder::new(&self.config, self.today).build(self.navigator.current_month())?;
        self.page = Some(Page {
            grid,
            config: self.config.clone(),
            state: self.navigator.state(),
        });
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the key did nothing
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Enter | KeyCode::Char(' ') => self.press(),
                KeyCode::Char('p') | KeyCode::PageUp => self.shift_month(-1),
                KeyCode::Char('n') | KeyCode::PageDown => self.shift_month(1),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.jump_to(self.today);
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('r') => self.reload(),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let output = match key {
                    KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
                        Some(d) => state.handle_input(JumpToInput::Digit(d)),
                        None => JumpToOutput::Invalid,
                    },
                    KeyCode::Backspace | KeyCode::Delete => {
                        state.handle_input(JumpToInput::Backspace)
                    }
                    KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                    _ => JumpToOutput::Invalid,
                };
                match output {
                    JumpToOutput::Ok => true,
                    JumpToOutput::Invalid => false,
                    JumpToOutput::Jump(date) => {
                        self.state = AppState::Calendar;
                        self.jump_to(date);
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn selected(&self) -> Option<CalendarDate> {
        self.selection
            .borrow()
            .as_ref()
            .and_then(|data| CalendarDate::try_from(data).ok())
    }

    /// Moving the cursor off the visible month brings its month into view
    fn move_cursor(&mut self, days: i64) -> bool {
        let Ok(cursor) = self.cursor.add_days(days) else {
            return false;
        };
        if !same_month(cursor, self.navigator.current_month()) {
            if self.config.hide_arrows {
                return false;
            }
            self.navigator.set_month(cursor, false);
        }
        self.cursor = cursor;
        true
    }

    fn press(&mut self) -> bool {
        match self.navigator.press_day(self.cursor) {
            PressOutcome::Ignored => false,
            PressOutcome::Selected | PressOutcome::SelectedAndNavigated => true,
        }
    }

    fn shift_month(&mut self, delta: i32) -> bool {
        if self.config.hide_arrows {
            return false;
        }
        match self.navigator.shift_month(delta) {
            Ok(_) => {
                self.cursor = self.navigator.current_month();
                true
            }
            Err(_) => false,
        }
    }

    fn jump_to(&mut self, date: CalendarDate) {
        self.navigator.set_month(date, false);
        self.cursor = date;
    }

    fn reload(&mut self) -> bool {
        let Some(source) = &self.source else {
            return false;
        };
        match source.load() {
            Ok(mut config) => {
                // The theme can't come from a file, so don't let the reload
                // count as a theme change
                config.theme = Arc::clone(&self.config.theme);
                if self.navigator.sync(&config) {
                    self.cursor = self.navigator.current_month();
                }
                self.config = config;
                tracing::info!("Configuration reloaded");
                true
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to reload configuration");
                false
            }
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = Arc::clone(&self.config.theme);
        buf.set_style(area, theme.base);
        if let Some(page) = &self.page {
            // Can only fail at the end of time, where there's nothing to load
            let loading = self.config.show_loading_indicator().unwrap_or(false);
            let view = MonthView::new(&page.grid, &self.config)
                .loading(loading)
                .cursor(Some(self.cursor))
                .selected(self.selected());
            let [cal_area] = Layout::vertical([view.height()])
                .flex(Flex::Center)
                .areas(area);
            view.render(cal_area, buf);
        }
        match &mut self.state {
            AppState::Helping => Help(&theme).render(area, buf),
            AppState::Jumping(state) => JumpTo(&theme).render(area, buf, state),
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

/// A built month page and what it was built from
#[derive(Debug)]
struct Page {
    grid: MonthGrid,
    config: CalendarConfig,
    state: CalendarState,
}

impl Page {
    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            config: &self.config,
            state: self.state,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}
