mod cmd;

use clap::{Parser, Subcommand};
use std::process;
use tokviz::core::Scheme;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tokviz")]
#[command(version)]
#[command(about = "Compare how different tokenizers segment text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Tokenize text with one or more schemes
    Tokenize {
        text: String,
        #[arg(short, long = "scheme")]
        schemes: Vec<Scheme>,
        #[arg(long)]
        seed: Option<u64>,
        /// Send the text to a running server instead of tokenizing locally
        #[arg(short, long)]
        remote: bool,
        #[arg(long)]
        json: bool,
    },
    /// List the available schemes
    Schemes {
        #[arg(short, long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { host, port } => cmd::serve(host, port).await,
        Commands::Tokenize { text, schemes, seed, remote, json } => {
            cmd::tokenize(&text, schemes, seed, remote, json).await
        }
        Commands::Schemes { remote } => cmd::schemes(remote).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
