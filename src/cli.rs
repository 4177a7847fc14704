//! Command-line interface for riddle_rally.

use clap::{Parser, Subcommand, ValueEnum};
use riddle_rally::Mode;

/// Riddle Rally - riddle-guessing sessions with LLM-backed generation and judging
#[derive(Parser, Debug)]
#[command(name = "riddle_rally")]
#[command(about = "Solo and duo riddle-guessing game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game session in the terminal
    Play {
        /// Session mode
        #[arg(short, long, value_enum, default_value = "solo")]
        mode: ModeArg,

        /// Path to a TOML config file (defaults apply if absent)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Use the bundled offline riddles instead of an LLM provider
        #[arg(long)]
        demo: bool,
    },
}

/// Session mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One player answers every riddle.
    Solo,
    /// Two players race to claim each riddle.
    Duo,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Solo => Mode::Solo,
            ModeArg::Duo => Mode::Duo,
        }
    }
}
