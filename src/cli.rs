use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reelchi")]
#[command(author, version, about = "Telegram bot that fetches Instagram posts and reels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot
    Run,

    /// Apply database migrations and exit
    InitDb,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
