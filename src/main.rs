//! da-app-link - start a Veracode Dynamic Analysis linked to an application profile

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;

use cli::{Cli, CommandContext, GlobalOptions};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(&cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` is honored; `--debug` forces this crate to debug level.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: &Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(cli);
    let ctx = CommandContext::new(&opts)?;
    let outcome = cli::link::run(&ctx, &cli.link_request()).await?;
    log::debug!("Run finished: {:?}", outcome);
    Ok(())
}
