use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use hadith_reader::core::chapters::filter_chapters;
use hadith_reader::core::config::{self, CliOverrides};
use hadith_reader::core::cursor::NavigationPolicy;
use hadith_reader::core::export::ExportStyle;
use hadith_reader::core::search::{SearchQuery, search};
use hadith_reader::core::settings::ReminderSettings;
use hadith_reader::core::store::HadithStore;
use hadith_reader::core::{Action, App, Hadith, Language};
use hadith_reader::platform::{DirectorySource, JsonFileStore, Platform};
use hadith_reader::runtime::Driver;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

const WRAP_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "hadith", about = "Read, search, and export hadith collections")]
struct Args {
    /// Book to open (see `hadith books`)
    #[arg(short, long, global = true)]
    book: Option<String>,

    /// Display language for this run
    #[arg(short, long, global = true, value_enum)]
    language: Option<Language>,

    /// Directory holding the book data files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Whether next/previous wrap at the ends of the list
    #[arg(long, global = true, value_enum)]
    navigation: Option<NavigationPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available books
    Books,
    /// Show the current hadith, or hadith N
    Show {
        #[arg(short, long)]
        number: Option<u32>,
    },
    /// Move to the next hadith
    Next,
    /// Move to the previous hadith
    Previous,
    /// Jump to a random hadith
    Random,
    /// Search the current book
    Search {
        query: String,
        /// Only search favorites
        #[arg(long)]
        favorites: bool,
        /// Only search one chapter
        #[arg(long)]
        chapter: Option<u32>,
    },
    /// List chapters
    Chapters {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Print a hadith in an export format
    Export {
        #[arg(short, long)]
        number: Option<u32>,
        #[arg(short, long, value_enum, default_value = "plain")]
        style: ExportStyle,
    },
    /// Toggle hadith N in favorites
    Favorite { number: u32 },
    /// List favorites in the current book
    Favorites,
    /// Show or change the daily reminder
    Reminder {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
        /// Time of day, HH:MM
        #[arg(long)]
        at: Option<String>,
    },
    /// Open the reader at login
    LoginItem { state: Switch },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Installed first so config loading is logged too.
    init_logging(&config::log_path());

    let file_config = config::load_config()?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            data_dir: args.data_dir.clone(),
            book: args.book.clone(),
            language: args.language,
            navigation: args.navigation,
        },
    );
    log::set_max_level(resolved.log_level);
    log::info!("Hadith reader starting, data dir {}", resolved.data_dir.display());

    let kv = Arc::new(JsonFileStore::open(&resolved.state_path)?);
    let store = HadithStore::new(Arc::new(DirectorySource::new(&resolved.data_dir)));
    let app = App::from_config(store, kv, &resolved);
    let mut driver = Driver::new(app, Platform::headless());

    match args.book {
        Some(book) => driver.dispatch(Action::SelectBook(book)),
        None => driver.dispatch(Action::Start),
    }
    driver.settle().await;
    if let Some(error) = driver.app.error.take() {
        return Err(error.into());
    }

    run(&mut driver, args.command)?;
    driver.settle().await;

    match driver.app.error.take() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// The logger accepts everything; `log::set_max_level` narrows it once the
/// configured level is known.
fn init_logging(path: &Path) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(log_file) = File::create(path) {
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
        log::set_max_level(LevelFilter::Info);
    }
}

fn run(driver: &mut Driver, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Books => {
            let active = driver.app.store.active_book();
            for book in driver.app.catalog.books() {
                let marker = if Some(book.id.as_str()) == active { '*' } else { ' ' };
                println!(
                    "{marker} {:<10} {} ({})",
                    book.id, book.display_name, book.native_name
                );
            }
        }
        Command::Show { number } => {
            if let Some(number) = number {
                jump(driver, number)?;
            }
            print_current(&driver.app);
        }
        Command::Next => {
            if driver.app.can_step_forward() {
                driver.dispatch(Action::Next);
            } else if driver.app.current().is_some() {
                println!("Already at the last hadith");
            }
            print_current(&driver.app);
        }
        Command::Previous => {
            if driver.app.can_step_back() {
                driver.dispatch(Action::Previous);
            } else if driver.app.current().is_some() {
                println!("Already at the first hadith");
            }
            print_current(&driver.app);
        }
        Command::Random => {
            driver.dispatch(Action::Random);
            print_current(&driver.app);
        }
        Command::Search {
            query,
            favorites,
            chapter,
        } => {
            let query = SearchQuery {
                text: query,
                language: driver.app.language(),
                favorites_only: favorites,
                chapter,
            };
            print_list(&driver.app, &query);
        }
        Command::Chapters { filter } => {
            let groups = filter_chapters(driver.app.chapters(), filter.as_deref().unwrap_or(""));
            if groups.is_empty() {
                println!("No chapters");
            }
            for group in groups {
                println!(
                    "{:>4}  {} ({} from {})",
                    group.id, group.title, group.hadith_count, group.first_hadith_number
                );
            }
        }
        Command::Export { number, style } => {
            if let Some(number) = number {
                jump(driver, number)?;
            }
            match driver.app.export_current(style) {
                Some(text) => println!("{text}"),
                None => return Err("Nothing to export".into()),
            }
        }
        Command::Favorite { number } => {
            driver.dispatch(Action::ToggleFavorite(Some(number)));
            println!("Hadith {number}: {}", driver.app.status_message);
        }
        Command::Favorites => {
            let query = SearchQuery {
                language: driver.app.language(),
                favorites_only: true,
                ..Default::default()
            };
            print_list(&driver.app, &query);
        }
        Command::Reminder {
            enable,
            disable,
            at,
        } => {
            let current = driver.app.settings.reminder;
            if !enable && !disable && at.is_none() {
                print_reminder(&current);
                return Ok(());
            }
            let (hour, minute) = match at.as_deref() {
                Some(text) => ReminderSettings::parse_time(text)
                    .ok_or_else(|| format!("Invalid time '{text}', expected HH:MM"))?,
                None => (current.hour, current.minute),
            };
            let enabled = enable || (!disable && current.enabled);
            driver.dispatch(Action::SetReminder {
                enabled,
                hour,
                minute,
            });
            println!("{}", driver.app.status_message);
        }
        Command::LoginItem { state } => {
            driver.dispatch(Action::SetLaunchAtLogin(matches!(state, Switch::On)));
            println!("{}", driver.app.status_message);
        }
    }
    Ok(())
}

fn jump(driver: &mut Driver, number: u32) -> Result<(), Box<dyn Error>> {
    driver.dispatch(Action::ClearFilters);
    driver.dispatch(Action::JumpToNumber(number));
    match driver.app.current() {
        Some(h) if h.number == number => Ok(()),
        _ => Err(format!("Hadith {number} is not in this book").into()),
    }
}

fn print_current(app: &App) {
    match app.current() {
        Some(hadith) => println!("{}", render(app, hadith)),
        None => println!("No hadith to show"),
    }
}

fn render(app: &App, hadith: &Hadith) -> String {
    let mut header = hadith.label();
    if let Some(book) = app.current_book() {
        header.push_str(&format!(
            " | {} {}",
            book.display_name,
            book.sunnah_reference(hadith.number)
        ));
    }
    if app.favorites.contains(hadith.number) {
        header.push_str(" | favorite");
    }

    let mut sections = vec![header];
    if let Some(title) = hadith.chapter_title() {
        sections.push(textwrap::fill(title, WRAP_WIDTH));
    }
    sections.push(textwrap::fill(&hadith.arabic_text, WRAP_WIDTH));
    let language = app.language();
    if language != Language::Arabic {
        sections.push(textwrap::fill(hadith.text_in(language), WRAP_WIDTH));
    }
    if !hadith.narrator.is_empty() {
        sections.push(format!("Narrated by {}", hadith.narrator));
    }
    sections.join("\n\n")
}

fn print_list(app: &App, query: &SearchQuery) {
    let results = search(app.store.current_hadiths(), query, &app.favorites);
    if results.is_empty() {
        println!("No results");
        return;
    }
    let preview_width = WRAP_WIDTH.saturating_sub(14);
    for hadith in &results {
        let text = hadith.text_in(query.language);
        let preview = textwrap::wrap(text, preview_width)
            .into_iter()
            .next()
            .unwrap_or_default();
        println!("{:>12}  {}", hadith.label(), preview);
    }
    println!("{} result(s)", results.len());
}

fn print_reminder(reminder: &ReminderSettings) {
    if !reminder.enabled {
        println!("Reminder off ({:02}:{:02})", reminder.hour, reminder.minute);
        return;
    }
    let now = chrono::Local::now().naive_local();
    println!(
        "Reminder on at {:02}:{:02}, next {}",
        reminder.hour,
        reminder.minute,
        reminder.next_fire_after(now).format("%Y-%m-%d %H:%M")
    );
}
