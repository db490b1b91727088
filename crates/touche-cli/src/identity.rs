//! # Device Identity Subcommands
//!
//! - `touche register --base-uri <uri> --name <name>`: register this device
//!   with a tournament system and store the issued credential.
//! - `touche identity show`: print the registered device name.
//! - `touche identity clear`: forget the stored credential.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use touche_client::TournamentClient;

use crate::context::CliContext;

/// Arguments for `touche register`.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Root of the tournament API.
    #[arg(long)]
    pub base_uri: String,
    /// Name shown to tournament staff for this device.
    #[arg(long)]
    pub name: String,
}

/// Arguments for `touche identity`.
#[derive(Args, Debug)]
pub struct IdentityArgs {
    #[command(subcommand)]
    pub command: IdentityCommand,
}

#[derive(Subcommand, Debug)]
pub enum IdentityCommand {
    /// Show the registered device.
    Show,
    /// Forget the device credential.
    Clear {
        /// Also forget per-tournament credentials.
        #[arg(long)]
        all: bool,
    },
}

/// Execute `touche register`.
pub async fn run_register(args: &RegisterArgs, ctx: &CliContext) -> Result<u8> {
    let client = TournamentClient::new(&ctx.client)?;
    let response = client
        .register_device(&args.base_uri, &args.name)
        .await
        .context("device registration failed")?;
    ctx.credentials()
        .save_token(&response.device_token, Some(args.name.trim()))?;
    println!("OK: registered as {}", args.name.trim());
    Ok(0)
}

/// Execute `touche identity`.
pub fn run_identity(args: &IdentityArgs, ctx: &CliContext) -> Result<u8> {
    let credentials = ctx.credentials();
    match &args.command {
        IdentityCommand::Show => match credentials.display_name()? {
            Some(name) => {
                println!("registered as {name}");
                Ok(0)
            }
            None => {
                println!("not registered");
                Ok(1)
            }
        },
        IdentityCommand::Clear { all } => {
            if *all {
                credentials.clear_all()?;
            } else {
                credentials.remove_token()?;
            }
            println!("OK: credentials cleared");
            Ok(0)
        }
    }
}
