pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookmark-api")]
#[command(about = "Bookmark API - multi-user bookmarking REST backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, env = "API_HOST", help = "Interface to bind")]
        host: Option<String>,

        #[arg(long, env = "API_PORT", help = "Port to listen on")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => commands::serve::handle(host, port).await,
        Commands::Migrate => commands::migrate::handle().await,
    }
}
