//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use shortlist_domain::Command;
use std::path::PathBuf;

/// Output format for session snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Everything, including each participant's suggestion and vote
    Full,
    /// Phase, finalists and tally
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for shortlist_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for shortlist
#[derive(Parser, Debug)]
#[command(name = "shortlist")]
#[command(author, version, about = "Suggest, shortlist three, vote")]
#[command(long_about = r#"
Shortlist runs a shared two-phase group decision.

1. Collecting: everyone suggests one candidate (later suggestions replace earlier ones)
2. Voting: three finalists are drawn at random from the distinct suggestions
   and everyone votes for one of them

Every participant works on the same session record, so the commands below
can be run concurrently from several terminals.

Configuration files are loaded from (in priority order):
1. SHORTLIST_* environment variables
2. --config <path>       Explicit config file
3. ./shortlist.toml      Project-level config
4. ~/.config/shortlist/config.toml   Global config

Example:
  shortlist open --date 2026-10-19
  shortlist submit alice "Kimbap Heaven"
  shortlist draw
  shortlist vote bob "Kimbap Heaven"
  shortlist -o full
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<SessionCommand>,

    /// Path of the session record (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Seed for the finalist draw (reproducible shortlists)
    #[arg(long, value_name = "N", global = true)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

/// Session operations; without one the current session is shown
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Show the current session
    Show,
    /// Open a new round, discarding the previous one
    Open {
        /// Informational date label for the round
        #[arg(long)]
        date: Option<String>,
    },
    /// Suggest a candidate (replaces your previous suggestion)
    Submit {
        /// Your nickname
        participant: String,
        /// The candidate you suggest
        candidate: String,
    },
    /// Draw three finalists and start the final vote
    Draw,
    /// Draw a new set of finalists (clears all votes)
    Reroll,
    /// Vote for one of the finalists (replaces your previous vote)
    Vote {
        /// Your nickname
        participant: String,
        /// One of the finalists
        choice: String,
    },
    /// Abandon the final vote and return to collecting suggestions
    Back,
    /// Destroy the session entirely
    Reset,
}

impl SessionCommand {
    /// The session command to run, or `None` for a read-only `show`
    pub fn to_command(&self) -> Option<Command> {
        match self {
            SessionCommand::Show => None,
            SessionCommand::Open { date } => Some(Command::open(date.clone())),
            SessionCommand::Submit {
                participant,
                candidate,
            } => Some(Command::submit(participant, candidate)),
            SessionCommand::Draw => Some(Command::DrawFinalists),
            SessionCommand::Reroll => Some(Command::RerollFinalists),
            SessionCommand::Vote {
                participant,
                choice,
            } => Some(Command::vote(participant, choice)),
            SessionCommand::Back => Some(Command::ReturnToCollecting),
            SessionCommand::Reset => Some(Command::ResetAll),
        }
    }
}
