//! Runbot CLI - disposable application instances on an LXD fleet

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;

use runbot_cli::cli::Cli;
use runbot_cli::domain::error::ProvisionError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// Failed in-instance commands propagate their own exit code; everything
/// else exits 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::CommandFailed { code, .. }) if *code != 0 => *code,
        _ => 1,
    }
}
