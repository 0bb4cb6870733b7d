use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use monthcal::app::App;
use monthcal::calendar::{CalendarDate, ConfigSource};
use ratatui::DefaultTerminal;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    source: ConfigSource,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    date: Option<CalendarDate>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    opts.source.config_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('m') | Arg::Long("marks") => {
                    opts.source.marks_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Long("log-level") => opts.log_level = Some(parser.value()?.string()?),
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Value(value) if opts.date.is_none() => opts.date = Some(value.parse()?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    init_logging(path, opts.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;
                }
                let today = CalendarDate::from(
                    OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                );
                let mut config = opts
                    .source
                    .load()
                    .context("failed to load calendar configuration")?;
                if let Some(date) = opts.date {
                    config.current = Some(date);
                }
                tracing::info!(today = %today, current = ?config.current, "Starting calendar");
                let selected = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let app = App::new(config, today).with_source(opts.source);
                    Ok(app.run(terminal)?)
                })?;
                if let Some(day) = selected {
                    println!("{}", day.date_string);
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: monthcal [<options>] [YYYY-MM-DD]");
                println!();
                println!("Month-grid terminal calendar with marked dates");
                println!();
                println!("Options:");
                println!("  -c, --config <file>   Read calendar options from a TOML file");
                println!("  -m, --marks <file>    Read marked dates from a JSON file");
                println!("      --log-file <file> Append diagnostic logs to the given file");
                println!("      --log-level <lvl> Log filter directive [default: info]");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Send log events to a file; the terminal belongs to the calendar
fn init_logging(path: &Path, level: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
