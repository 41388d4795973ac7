mod commands;

use anyhow::Result;
use banana::use_case::UseCase;
use clap::{Parser, Subcommand};
use std::str::FromStr;

use commands::{chat, run, use_cases, version};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/primitives/chatbot";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Relay endpoint (can also be set via BANANA_ENDPOINT environment variable)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one result and stream it to the terminal
    Run {
        /// Use case whose base prompt is prepended to the input
        #[arg(short, long, value_parser = parse_use_case)]
        use_case: Option<UseCase>,

        /// Text to send
        #[arg(required = true)]
        input: Vec<String>,
    },

    /// Pick a use case and keep asking interactively
    Chat,

    /// List the available use cases
    UseCases,

    /// Display the current version
    Version,
}

fn parse_use_case(value: &str) -> Result<UseCase, String> {
    UseCase::from_str(value).map_err(|_| {
        let known: Vec<String> = UseCase::catalog().into_iter().map(|u| u.id).collect();
        format!("unknown use case '{}', expected one of: {}", value, known.join(", "))
    })
}

fn endpoint(cli: &Cli) -> String {
    cli.endpoint
        .clone()
        .or_else(|| std::env::var("BANANA_ENDPOINT").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let endpoint = endpoint(&cli);

    match cli.command {
        Some(Command::Run { use_case, input }) => {
            run::execute(&endpoint, use_case, &input.join(" ")).await
        }
        Some(Command::Chat) | None => chat::execute(&endpoint).await,
        Some(Command::UseCases) => use_cases::execute(),
        Some(Command::Version) => version::execute(),
    }
}
