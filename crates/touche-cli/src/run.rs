//! # Run Subcommand
//!
//! Interactive scoreboard. Commands are read from stdin one per line (see
//! [`crate::command`]); the board is re-rendered to stdout after every state
//! change, including clock ticks. Logs go to stderr.
//!
//! ```text
//!   stdin ──parse──▶ dispatch ──▶ Session ──watch──▶ renderer task ──▶ stdout
//!                                    ▲
//!                               clock driver
//! ```
//!
//! `scan` without a payload opens a scanning session: following lines are
//! treated as QR payloads until one is valid or `cancel` is entered.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use touche_client::TournamentClient;
use touche_core::MatchFormat;
use touche_session::{LoadOutcome, MatchEvent, PayloadSource, ScanError, ScanSession, Session};

use crate::command::{parse_command, Command, HELP};
use crate::context::CliContext;
use crate::descriptor::read_payload;
use crate::render::render;

/// Arguments for `touche run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Initial match format.
    #[arg(long, default_value = "pool")]
    pub format: MatchFormat,

    /// Load a tournament match descriptor before starting.
    #[arg(long)]
    pub descriptor: Option<PathBuf>,
}

/// Payloads typed or pasted at the terminal, e.g. from a handheld scanner
/// acting as a keyboard.
#[derive(Debug, Default)]
pub struct TerminalScanner;

impl PayloadSource for TerminalScanner {
    fn has_camera(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn release(&mut self) {
        tracing::debug!("terminal scanner released");
    }
}

/// Execute the run subcommand.
pub async fn run_scoreboard(args: &RunArgs, ctx: &CliContext) -> Result<u8> {
    let client = TournamentClient::new(&ctx.client)?;
    let session = Session::new(client, ctx.credentials())?;
    tracing::info!(session = %session.id(), data_dir = %ctx.data_dir.display(), "scoreboard started");

    if args.format != MatchFormat::Pool {
        session.apply(MatchEvent::ChangeFormat(args.format));
    }
    let renderer = spawn_renderer(&session);

    if let Some(path) = &args.descriptor {
        let payload = read_payload(path)?;
        let mut scan = ScanSession::open(TerminalScanner)?;
        let descriptor = scan.submit_payload(&payload)?;
        report_load(session.offer_descriptor(descriptor)?);
    }

    let mut scanning: Option<ScanSession<TerminalScanner>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(scan) = scanning.as_mut() {
            if feed_scan(&session, scan, &line) {
                scanning = None;
            }
            continue;
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {e:#}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Scan(None) => {
                scanning = Some(ScanSession::open(TerminalScanner)?);
                println!("scanning: paste a match payload, or `cancel`");
            }
            other => {
                if let Err(e) = dispatch(&session, other).await {
                    println!("error: {e:#}");
                }
            }
        }
    }

    renderer.abort();
    Ok(0)
}

/// Feed one line to an open scan. Returns whether the scan is over.
fn feed_scan(session: &Session, scan: &mut ScanSession<TerminalScanner>, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    if line.eq_ignore_ascii_case("cancel") {
        scan.close();
        println!("scan cancelled");
        return true;
    }
    match scan.submit_payload(line) {
        Ok(descriptor) => {
            match session.offer_descriptor(descriptor) {
                Ok(outcome) => report_load(outcome),
                Err(e) => println!("error: {e}"),
            }
            true
        }
        Err(ScanError::Malformed(e)) => {
            println!("invalid match payload: {e}; still scanning");
            false
        }
        Err(e) => {
            println!("error: {e}");
            true
        }
    }
}

async fn dispatch(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Event(event) => {
            session.apply(event);
        }
        Command::Scan(Some(payload)) => {
            let mut scan = ScanSession::open(TerminalScanner)?;
            let descriptor = scan.submit_payload(&payload)?;
            report_load(session.offer_descriptor(descriptor)?);
        }
        Command::LoadFile(path) => {
            let payload = read_payload(&path)?;
            let mut scan = ScanSession::open(TerminalScanner)?;
            let descriptor = scan.submit_payload(&payload)?;
            report_load(session.offer_descriptor(descriptor)?);
        }
        Command::Register(name) => {
            session.register_device(&name).await?;
            println!("OK: registered as {}", name.trim());
        }
        Command::CancelRegistration => session.cancel_registration(),
        Command::Submit => session.submit_result().await?,
        Command::Help => println!("{HELP}"),
        Command::Scan(None) | Command::Quit => {}
    }
    Ok(())
}

fn report_load(outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded => println!("OK: tournament match loaded"),
        LoadOutcome::RegistrationRequired => {
            println!("this tournament requires a registered device: `register <device name>`")
        }
    }
}

fn spawn_renderer(session: &Session) -> JoinHandle<()> {
    let mut states = session.subscribe();
    let mut statuses = session.submission_status();
    tokio::spawn(async move {
        loop {
            let board = render(&states.borrow_and_update(), &statuses.borrow_and_update());
            println!("{board}");
            tokio::select! {
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = statuses.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}
