//! CLI frontend for the Wunschtopf reward lottery.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wt_core::DEFAULT_STATE_FILE;

#[derive(Parser)]
#[command(
    name = "wt",
    about = "Wunschtopf: a personal reward lottery",
    version,
    propagate_version = true
)]
struct Cli {
    /// State file holding prizes, settings and history
    #[arg(long, global = true, env = "WT_STATE", default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// RNG seed for reproducible draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add prizes given as name,value[,limit] (limit: a number or "unlimited")
    Add {
        /// One or more prize items, e.g. Coffee,20 Badminton,5,unlimited
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Remove prizes by id
    Remove {
        /// Prize ids, e.g. A1 B3
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Change a prize's name, value, fragment count or limit
    Modify {
        /// Prize id
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New total value
        #[arg(long)]
        value: Option<f64>,

        /// New number of fragments
        #[arg(long)]
        fragments: Option<u32>,

        /// New limit: a number or "unlimited"
        #[arg(long)]
        limit: Option<String>,
    },

    /// List the prize pool
    List,

    /// Draw from the pool
    Draw {
        /// Number of draws
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,
    },

    /// Show the current odds as a bar chart
    Odds,

    /// Show the draw history
    History {
        /// Only the most recent entries
        #[arg(short, long)]
        last: Option<usize>,

        /// Output format: text, markdown, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show collected fragments
    Fragments,

    /// Show totals and budget usage
    Stats,

    /// Manage consolation rewards
    Consolation {
        #[command(subcommand)]
        action: ConsolationAction,
    },

    /// Show or change budget and policies
    Config {
        /// Budget for one 30-day cycle
        #[arg(long, allow_hyphen_values = true)]
        budget: Option<f64>,

        /// Expected draws per day
        #[arg(long)]
        draws_per_day: Option<u32>,

        /// Probability formula: inverse, value-share, log-damped
        #[arg(long)]
        formula: Option<String>,

        /// No-win rule: "complement" or a gate threshold such as 0.618
        #[arg(long)]
        no_win: Option<String>,

        /// Consolation policy: "reward" or a voucher amount such as 2.5
        #[arg(long)]
        consolation: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConsolationAction {
    /// Add consolation rewards
    Add {
        /// Reward texts
        #[arg(required = true)]
        rewards: Vec<String>,
    },

    /// Replace the reward at a position (1-based)
    Edit {
        /// Position in the list
        index: usize,

        /// New reward text
        reward: String,
    },

    /// Remove the reward at a position (1-based)
    Remove {
        /// Position in the list
        index: usize,
    },

    /// List consolation rewards
    List,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let lottery = commands::open(&cli.state, cli.seed);

    let result = match cli.command {
        Commands::Add { items } => commands::add::run(lottery, &items),
        Commands::Remove { ids } => commands::remove::run(lottery, &ids),
        Commands::Modify {
            id,
            name,
            value,
            fragments,
            limit,
        } => commands::modify::run(lottery, &id, name, value, fragments, limit.as_deref()),
        Commands::List => commands::list::run(&lottery),
        Commands::Draw { times } => commands::draw::run(lottery, times),
        Commands::Odds => commands::odds::run(&lottery),
        Commands::History { last, format } => commands::history::run(&lottery, last, &format),
        Commands::Fragments => commands::fragments::run(&lottery),
        Commands::Stats => commands::stats::run(&lottery),
        Commands::Consolation { action } => match action {
            ConsolationAction::Add { rewards } => commands::consolation::add(lottery, &rewards),
            ConsolationAction::Edit { index, reward } => {
                commands::consolation::edit(lottery, index, &reward)
            }
            ConsolationAction::Remove { index } => commands::consolation::remove(lottery, index),
            ConsolationAction::List => commands::consolation::list(&lottery),
        },
        Commands::Config {
            budget,
            draws_per_day,
            formula,
            no_win,
            consolation,
        } => commands::config::run(
            lottery,
            commands::config::Changes {
                budget,
                draws_per_day,
                formula,
                no_win,
                consolation,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
