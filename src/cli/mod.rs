pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "metis")]
#[command(about = "Metis CLI - run and inspect the course discussion API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides METIS_API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Issue a bearer token for a user")]
    Token {
        #[arg(help = "User id carried in the token")]
        user_id: i64,
        #[arg(help = "Login carried in the token (defaults to the demo login for the id)")]
        login: Option<String>,
    },

    #[command(about = "Show the effective configuration (secrets omitted)")]
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Token { user_id, login } => commands::token::handle(user_id, login, output_format),
        Commands::Config => commands::config::handle(output_format),
    }
}
