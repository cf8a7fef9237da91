//! supersets - Personal workout rotation tracker

use std::io::Read;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use supersets::db::Database;
use supersets::format::{format_date, format_last_trained};
use supersets::muscles::Muscle;
use supersets::session::{Pick, SupersetSelection};
use supersets::tracker::Tracker;
use supersets::tui::App;

#[derive(Parser)]
#[command(name = "supersets")]
#[command(author, version, about = "Workout rotation tracker with superset recommendations")]
struct Cli {
    /// Database file
    #[arg(long, global = true, env = "SUPERSETS_DB", default_value = "supersets.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Show the recommended workout
    Next,

    /// Log a workout
    Log {
        /// Main muscle group (chest, back, shoulders, legs)
        main: Muscle,

        /// Superset muscle groups, or "none"
        supersets: Vec<Pick>,
    },

    /// Show last trained dates
    History {
        /// Number of superset sessions to show
        #[arg(short, long, default_value = "5")]
        supersets: usize,
    },

    /// Print a backup code
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Restore from a backup code ("-" reads stdin)
    Import {
        file: String,
    },

    /// Start Telegram bot
    Bot {
        /// Telegram bot token (or set TELOXIDE_TOKEN env var)
        #[arg(short, long, env = "TELOXIDE_TOKEN")]
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Bot { token } => {
            println!("Starting Telegram bot...");
            println!("Database: {}", cli.db);
            supersets::bot::run_bot(token, &cli.db).await?;
        }
        command => {
            let tracker = Tracker::open(Database::open(&cli.db)?)?;
            run_local(command, tracker)?;
        }
    }

    Ok(())
}

fn run_local(command: Commands, mut tracker: Tracker) -> Result<()> {
    match command {
        Commands::Next => {
            let rec = tracker.recommendation();
            let supersets: Vec<_> = rec.supersets.iter().map(|(m, _)| m.name()).collect();
            println!("Recommended: {} (last trained: {})", rec.main, rec.main_days);
            println!("Suggested supersets: {}", supersets.join(", "));
        }

        Commands::Log { main, supersets } => {
            if !main.is_main() {
                bail!("{} is not a main muscle group (chest, back, shoulders, legs)", main);
            }
            if supersets.contains(&Pick::Muscle(main)) {
                bail!("{} is already the main muscle group", main);
            }

            let selection = SupersetSelection::from_picks(supersets);
            match tracker.log_workout(main, &selection)? {
                Some(record) => {
                    let names: Vec<_> = record.superset_muscles.iter().map(|m| m.name()).collect();
                    println!("Logged: {} + {}", main, names.join(", "));
                }
                None => println!("Logged: {}", main),
            }
        }

        Commands::History { supersets } => {
            println!("Workout History");
            println!("{:-<40}", "");
            for status in tracker.report() {
                println!(
                    "{:10} | {}",
                    status.muscle.name(),
                    format_last_trained(status.last_trained, status.days)
                );
            }

            let log = tracker.supersets();
            if !log.is_empty() && supersets > 0 {
                println!();
                println!("Recent supersets:");
                println!("{:-<40}", "");
                for record in log.iter().rev().take(supersets) {
                    let names: Vec<_> = record.superset_muscles.iter().map(|m| m.name()).collect();
                    println!(
                        "{} | {:10} | {}",
                        format_date(Some(record.timestamp)),
                        record.main_muscle.name(),
                        names.join(", ")
                    );
                }
            }
        }

        Commands::Export { output, pretty } => {
            let code = if pretty { tracker.export_pretty()? } else { tracker.export()? };
            match output {
                Some(path) => {
                    std::fs::write(&path, code)?;
                    println!("Backup written to {}", path);
                }
                None => println!("{}", code),
            }
        }

        Commands::Import { file } => {
            let raw = if file == "-" {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                raw
            } else {
                std::fs::read_to_string(&file)?
            };

            tracker.import(&raw)?;
            println!("Data imported successfully!");
        }

        Commands::Tui | Commands::Bot { .. } => {
            let mut app = App::new(tracker);
            app.run()?;
        }
    }

    Ok(())
}
