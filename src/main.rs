use anyhow::Context;
use chronicle::{
    sample, CalendarGrid, Character, ChronicleCell, ChronicleDate, ChronicleView,
    InvalidCalendarInput, DAYS_IN_WEEK,
};
use lexopt::{Arg, Parser, ValueExt};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static HEADER: &str = " Su   Mo   Tu   We   Th   Fr   Sa ";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        month: Option<CalendarGrid>,
        character: Option<PathBuf>,
        stat: Option<String>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut month = None;
        let mut character = None;
        let mut stat = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("character") => {
                    character = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('s') | Arg::Long("stat") => stat = Some(parser.value()?.string()?),
                Arg::Value(value) if month.is_none() => {
                    month = Some(value.parse_with(parse_year_month)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            month,
            character,
            stat,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                month,
                character,
                stat,
            } => {
                let grid = match month {
                    Some(grid) => grid,
                    None => this_month()?,
                };
                let character = match character {
                    Some(path) => load_character(&path)?,
                    None => sample::napoleon(OffsetDateTime::now_utc())
                        .context("failed to construct sample character")?,
                };
                let stat = match stat {
                    Some(stat) => stat,
                    None => character
                        .stats()
                        .first()
                        .map(|s| s.name().to_owned())
                        .context("character has no stats to chronicle")?,
                };
                anyhow::ensure!(
                    character.stat(&stat).is_some(),
                    "{} has no stat named {stat:?}",
                    character.name()
                );
                print_chronicle(&ChronicleView::new(&character, &stat, grid));
                Ok(())
            }
            Command::Help => {
                println!("Usage: chronicle [<options>] [YYYY-MM]");
                println!();
                println!("Show a month of a character's talismans");
                println!();
                println!("Options:");
                println!("  -c, --character <FILE>  Read the character record from a JSON file");
                println!("  -s, --stat <NAME>       Show talismans for the given stat");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
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
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    Command::from_parser(Parser::from_env())?.run()
}

fn parse_year_month(s: &str) -> Result<CalendarGrid, YearMonthError> {
    let (year, month) = s.split_once('-').ok_or(YearMonthError::Format)?;
    let year = year.parse::<i32>().map_err(|_| YearMonthError::Format)?;
    let month = month.parse::<u8>().map_err(|_| YearMonthError::Format)?;
    Ok(CalendarGrid::new(month, year)?)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
enum YearMonthError {
    #[error("expected a month in the form YYYY-MM")]
    Format,
    #[error(transparent)]
    Calendar(#[from] InvalidCalendarInput),
}

fn this_month() -> anyhow::Result<CalendarGrid> {
    let today = OffsetDateTime::now_local()
        .context("failed to determine local date")?
        .date();
    let today =
        ChronicleDate::from_date(today).context("local date is outside the supported years")?;
    Ok(CalendarGrid::containing(today))
}

fn load_character(path: &Path) -> anyhow::Result<Character> {
    let fp = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(fp))
        .with_context(|| format!("failed to read character record from {}", path.display()))
}

fn print_chronicle(view: &ChronicleView<'_>) {
    let character = view.character();
    let rank = character.rank();
    let grid = view.grid();
    println!("Chronicle of {}", character.title());
    println!("Rank: {rank} ({}, {})", rank.rarity(), rank.color());
    println!("Journeyed since {}", character.journeyed_at().date());
    println!();
    println!(
        "{}: {} of the {}th Year",
        view.stat_name(),
        grid.month(),
        grid.year()
    );
    println!("{HEADER}");
    let cells = view.cells().collect::<Vec<_>>();
    for week in cells.chunks(DAYS_IN_WEEK) {
        println!("{}", week.iter().map(show_cell).collect::<Vec<_>>().join(" "));
    }
    println!();
    let mut talismans = view.talismans().peekable();
    if talismans.peek().is_none() {
        println!("No talismans this month");
    }
    for t in talismans {
        println!(
            "{}: level {} {} ({})",
            t.consumed_on(),
            t.level(),
            t.rarity(),
            t.rarity().color()
        );
    }
}

fn show_cell(cell: &ChronicleCell<'_>) -> String {
    match (cell.cell.date(), cell.talisman) {
        (Some(date), Some(_)) => format!("[{:2}]", date.day()),
        (Some(date), None) => format!(" {:2} ", date.day()),
        (None, _) => String::from("  · "),
    }
}
