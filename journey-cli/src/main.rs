use anyhow::{Result, bail};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod onboard;
mod render;
mod state;
mod watch;

use onboard::DurationArg;

#[derive(Parser, Debug)]
#[command(
    name = "journey",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("JOURNEY_BUILD_SHA"), ")"),
    about = "Daily learning streak tracker"
)]
struct Cli {
    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new learning goal (resets any current streak)
    Start {
        /// What you want to learn
        topic: String,

        #[arg(long, value_enum, ignore_case = true, default_value = "week")]
        duration: DurationArg,
    },

    /// Change the topic and/or duration of the current goal (resets the streak)
    EditGoal {
        #[arg(long)]
        topic: Option<String>,

        #[arg(long, value_enum, ignore_case = true)]
        duration: Option<DurationArg>,
    },

    /// Log today as learned
    Learn,

    /// Spend a freeze on today
    Freeze,

    /// Give back today's freeze
    Unfreeze,

    /// Throw away the current streak and start again
    Reset,

    /// Show today's state and counters
    Status {
        /// Print machine-readable JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show one week (Sunday-first)
    Week {
        /// Weeks relative to this one (-1 = last week)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },

    /// Show a whole month
    Month {
        #[arg(long)]
        year: Option<i32>,

        /// 1-12
        #[arg(long)]
        month: Option<u32>,
    },

    /// Stay in the foreground and tick periodically
    Watch {
        /// Override watch.tick_seconds from config.toml
        #[arg(long)]
        tick_seconds: Option<u64>,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.journey/config.toml with defaults
    Init,

    /// Print the effective config
    Show,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config()?;

    let command = match cli.command {
        Command::Config { command } => {
            return match command {
                ConfigCommand::Init => config::init_config(),
                ConfigCommand::Show => config::show_config(&cfg),
            };
        }
        other => other,
    };

    let now = Utc::now();
    let mut engine = state::open_engine(&cfg, now)?;

    match command {
        // answered before the engine was opened
        Command::Config { .. } => {}

        Command::Start { topic, duration } => {
            let topic = onboard::validate_topic(&topic)?;
            engine.edit_goal(topic, duration.label());
            println!(
                "Started learning {} for a {}. Log your first day with: journey learn",
                engine.learning_topic(),
                engine.duration().label().to_lowercase()
            );
        }

        Command::EditGoal { topic, duration } => {
            let goal = onboard::resolve_goal_edit(engine.goal(), topic.as_deref(), duration)?;
            engine.edit_goal(goal.learning_topic, goal.duration.label());
            println!("Goal updated; streak restarted.");
            print!("{}", render::status_text(&engine.status(now)));
        }

        Command::Learn => {
            let before = engine.learned_dates().len();
            engine.mark_learned(now);
            if engine.learned_dates().len() == before {
                println!("Already logged today.");
            }
            print!("{}", render::status_text(&engine.status(now)));
        }

        Command::Freeze => {
            let before = engine.freezes_used();
            let was_learned = engine.record().is_learned(engine.today(now));
            engine.toggle_freeze(now);
            if engine.freezes_used() != before && was_learned {
                println!("Today's learned mark was replaced by a freeze.");
            }
            if engine.freezes_used() == before {
                println!(
                    "Freeze not available ({} of {} used{}).",
                    engine.freezes_used(),
                    engine.freeze_quota(),
                    if engine.record().is_frozen(engine.today(now)) {
                        ", today already frozen"
                    } else {
                        ""
                    }
                );
            }
            print!("{}", render::status_text(&engine.status(now)));
        }

        Command::Unfreeze => {
            let before = engine.freezes_used();
            engine.unfreeze_day(now);
            if engine.freezes_used() == before {
                println!("Today is not frozen.");
            }
            print!("{}", render::status_text(&engine.status(now)));
        }

        Command::Reset => {
            engine.reset_streak();
            println!("Streak reset. Start learning again with: journey learn");
        }

        Command::Status { json } => {
            let status = engine.status(now);
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                if let Some(hint) = onboard::needs_onboarding(engine.goal()) {
                    println!("{hint}");
                }
                print!("{}", render::status_text(&status));
            }
        }

        Command::Week { offset } => {
            let days = engine.week_view(now, offset);
            if days.is_empty() {
                bail!("week offset out of range: {offset}");
            }
            print!("{}", render::week_text(&days));
        }

        Command::Month { year, month } => {
            let today = engine.today(now);
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let days = engine.month_view(year, month, now);
            if days.is_empty() {
                bail!("invalid month: {year}-{month} (use --month 1-12)");
            }
            print!("{}", render::month_text(&days));
        }

        Command::Watch { tick_seconds } => {
            let secs = tick_seconds.unwrap_or(cfg.watch.tick_seconds).max(1);
            watch::run(&mut engine, std::time::Duration::from_secs(secs)).await?;
        }
    }

    Ok(())
}
