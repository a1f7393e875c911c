pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "craft-calc")]
#[command(about = "Crafting profit calculator backed by the wiki price API")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Price every crafting method the player has unlocked
    Profit {
        username: String,

        /// Also write the results to this CSV file
        #[arg(long)]
        csv: Option<String>,

        /// Skip the session log entry
        #[arg(long)]
        no_log: bool,
    },
    /// Show the player's crafting rank, level and experience
    Level { username: String },
    /// List configured methods the player has unlocked
    Unlocked { username: String },
    /// Show the materials needed to craft an item
    Materials { item: String },
    /// Show the latest price of an item (name or id)
    Price { item: String },
    /// Compare the instant-sell prices of two items (names or ids)
    Compare { first: String, second: String },
}
