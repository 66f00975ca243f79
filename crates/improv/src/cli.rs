use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::time::Duration;

use crate::app::LaunchOptions;
use crate::config::{self, Config};

#[derive(Parser)]
#[command(name = "improv")]
#[command(author, version, about)]
#[command(long_about = "A timed improv slideshow game.\n\n\
    Draw a random style, then a topic in that style's color, then improvise\n\
    over a short deck of random slides that advance on their own.\n\n\
    Examples:\n  \
    improv                    Launch the game (fullscreen)\n  \
    improv --windowed         Launch in a window\n  \
    improv --dwell 30         Give each slide 30 seconds\n  \
    improv check              Draw one full round in the terminal")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Seconds each slide stays on screen (1-600)
    #[arg(long, global = false, value_parser = parse_dwell)]
    pub dwell: Option<u64>,

    /// Color theme
    #[arg(long, value_enum, global = false)]
    pub theme: Option<ThemeName>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw a style, a topic and a slide batch from the provider and print them
    Check,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. provider.url, defaults.theme, defaults.dwell_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// Interactively create a configuration file
    Init,
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }
}

fn parse_dwell(value: &str) -> Result<u64, String> {
    config::parse_dwell_secs(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Merge launch flags over the config file's defaults.
    pub fn launch_options(&self, config: &Config) -> LaunchOptions {
        LaunchOptions {
            windowed: self.windowed || config.windowed(),
            theme: self
                .theme
                .map(ThemeName::as_str)
                .unwrap_or_else(|| config.theme_name())
                .to_string(),
            dwell: self.dwell.map(Duration::from_secs).unwrap_or(config.dwell()),
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Check) => crate::commands::check::run(),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::banner::print_banner_with_version();
                Ok(())
            }
            None => {
                let options = self.launch_options(&Config::load_or_default());
                crate::app::run(options)
            }
        }
    }
}
