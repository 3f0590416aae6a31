//! StreamSplit CLI
//!
//! Split long livestream recordings into bounded-length segments,
//! optionally stitching a fixed intro/outro onto every segment.
//!
//! # Usage
//!
//! ```bash
//! streamsplit split stream.mp4 -o segments/ -l 20m --intro intro.mp4 --outro outro.mp4
//! streamsplit inspect stream.mp4
//! streamsplit serve --port 8000
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamsplit_cli::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Split(args) => commands::split(args).await,
        Commands::Inspect(args) => commands::inspect(args).await,
        Commands::Check => commands::check().await,
        Commands::Serve(args) => commands::serve(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
