/// Main entry point for the HabitKit inspection binary
///
/// This file sets up logging, parses command line arguments, boots the app
/// core against the on-disk storage, and prints a snapshot report of habits,
/// notes and statistics to stdout.

use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use habitkit::{
    stats, AppError, CheckStatus, CompletionType, HabitApp, HabitKind, MemoryIdentityProvider,
    SessionState, SqliteStorage,
};

/// Get the default data directory with robust fallback strategy
fn default_data_dir() -> Result<PathBuf, AppError> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".habitkit");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("habitkit");
            p
        }),
        // 3. User's config directory
        dirs::config_dir().map(|mut p| {
            p.push("habitkit");
            p
        }),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habitkit");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        // Try to create the directory
        if let Ok(()) = std::fs::create_dir_all(potential_path) {
            // Test if we can write to this directory
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file); // Clean up test file
                return Ok(potential_path.clone());
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("habitkit");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary data directory: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the HabitKit binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the habits database
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

/// Render the booted app state as a plain-text report
fn print_report(app: &HabitApp) {
    let today = Local::now();
    println!("{}", today.format("%A, %B %-d"));

    match app.session().state() {
        SessionState::Authenticated(session) => println!("Signed in as {}", session.email),
        _ => println!("Not signed in"),
    }

    let progress = stats::daily_progress(app.habits().habits());
    println!(
        "Today: {} of {} completed ({}%)",
        progress.completed,
        progress.total,
        progress.percent()
    );

    for kind in HabitKind::all() {
        let group = app.habits().by_kind(kind);
        if group.is_empty() {
            continue;
        }

        println!();
        println!("{}", kind.label());
        for habit in group {
            match habit.completion_type {
                CompletionType::Checkmark => {
                    let mark = if habit.status == CheckStatus::Completed {
                        "x"
                    } else {
                        " "
                    };
                    println!("  [{}] {} (streak {})", mark, habit.name, habit.streak);
                }
                CompletionType::Count => match habit.target_count {
                    Some(target) => {
                        println!("  {}/{} {} (streak {})", habit.count, target, habit.name, habit.streak)
                    }
                    None => println!("  {} {} (streak {})", habit.count, habit.name, habit.streak),
                },
            }
        }
    }

    if !app.notes().is_empty() {
        println!();
        println!("Quick notes");
        for note in app.notes().notes() {
            println!("  - {}", note.text);
        }
    }

    let figures = stats::overview();
    let week = stats::summary(stats::SummaryPeriod::Week);
    println!();
    println!(
        "Overall {}%, streak {} (best {}), {} perfect days",
        figures.overall_completion,
        figures.current_streak,
        figures.longest_streak,
        figures.perfect_days
    );
    println!(
        "This week: {} check-ins, {} completed, {} missed",
        week.total, week.completed, week.missed
    );
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habitkit={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting HabitKit");

    // Determine the data directory
    let data_dir = match args.data_dir {
        Some(path) => {
            if !path.exists() {
                std::fs::create_dir_all(&path)?;
            }
            path
        }
        None => default_data_dir()?,
    };

    info!("Using data directory: {}", data_dir.display());

    let storage = SqliteStorage::open(data_dir.join("habits.db"))?;
    let provider = MemoryIdentityProvider::new();

    let mut app = HabitApp::new(Arc::new(storage), Arc::new(provider));
    app.bootstrap().await;

    print_report(&app);

    // Write through before exit so the report and the database agree
    app.flush().await;

    info!("HabitKit shutdown complete");
    Ok(())
}
