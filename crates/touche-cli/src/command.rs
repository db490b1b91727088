//! # Scoreboard Line Commands
//!
//! `touche run` reads one command per line from stdin. Most commands map to
//! a [`MatchEvent`]; the rest drive the tournament flows.
//!
//! ```text
//! start                       start / pause the clock
//! score <left|right> <+|-|N>  step or set a score
//! card <left|right> <yellow|red>
//! passivity <yellow|red>
//! format <pool|elimination|team|freeform>
//! time <M:SS|seconds>         set the clock
//! minutes <+|->   seconds <+|->
//! reset <time|score|cards|all>
//! swap
//! priority <left|right|request|dismiss>
//! next-bout
//! scan [json]                 feed a decoded QR payload, or open a scan
//!                             session that reads payloads line by line
//! load-file <path>            scan a payload stored in a file
//! register <device name>      register for the pending tournament match
//! cancel-registration
//! submit                      submit the tournament match result
//! clear-match                 forget the tournament match
//! help | quit
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use touche_core::{MatchFormat, Side};
use touche_session::MatchEvent;
use touche_state::{Card, PassivityCard};

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  start | pause                  toggle the clock
  score <left|right> <+|-|N>     step or set a score
  card <left|right> <yellow|red> toggle yellow / add red
  passivity <yellow|red>         toggle a passivity card
  format <pool|elimination|team|freeform>
  time <M:SS|seconds>            set the clock
  minutes <+|->  seconds <+|->   step the clock digits
  reset <time|score|cards|all>
  swap                           competitors change ends
  priority <left|right|request|dismiss>
  next-bout                      team relay: next bout
  scan [json]                    load a QR payload, or scan until one is valid
  load-file <path>               load a QR payload from a file
  register <device name>         register this device
  cancel-registration
  submit                         submit the tournament result
  clear-match                    forget the tournament match
  help | quit";

/// One parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(MatchEvent),
    /// A payload given inline, or `None` to open a scanning session.
    Scan(Option<String>),
    LoadFile(PathBuf),
    Register(String),
    CancelRegistration,
    Submit,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let command = match verb.to_ascii_lowercase().as_str() {
        "start" | "pause" | "s" => Command::Event(MatchEvent::StartPause),
        "score" => {
            let side = parse_side(args.next())?;
            let event = match args.next() {
                Some("+") => MatchEvent::IncrementScore(side),
                Some("-") => MatchEvent::DecrementScore(side),
                Some(n) => MatchEvent::ChangeScore {
                    side,
                    score: n.parse().with_context(|| format!("invalid score: {n:?}"))?,
                },
                None => bail!("usage: score <left|right> <+|-|N>"),
            };
            Command::Event(event)
        }
        "card" => {
            let side = parse_side(args.next())?;
            let card = match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("yellow" | "y") => Card::Yellow,
                Some("red" | "r") => Card::Red,
                _ => bail!("usage: card <left|right> <yellow|red>"),
            };
            Command::Event(MatchEvent::AddCard { side, card })
        }
        "passivity" => {
            let card = match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("yellow" | "y") => PassivityCard::PassivityYellow,
                Some("red" | "r") => PassivityCard::PassivityRed,
                _ => bail!("usage: passivity <yellow|red>"),
            };
            Command::Event(MatchEvent::SetPassivityCard(card))
        }
        "format" => {
            let raw = args
                .next()
                .ok_or_else(|| anyhow!("usage: format <pool|elimination|team|freeform>"))?;
            let format: MatchFormat = raw.parse()?;
            Command::Event(MatchEvent::ChangeFormat(format))
        }
        "time" => {
            let raw = args.next().ok_or_else(|| anyhow!("usage: time <M:SS|seconds>"))?;
            Command::Event(MatchEvent::ChangeTime(parse_clock(raw)?))
        }
        "minutes" => Command::Event(MatchEvent::AdjustMinutes {
            increment: parse_step(args.next())?,
        }),
        "seconds" => Command::Event(MatchEvent::AdjustSeconds {
            increment: parse_step(args.next())?,
        }),
        "reset" => {
            let event = match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("time") => MatchEvent::ResetTime,
                Some("score") => MatchEvent::ResetScore,
                Some("cards") => MatchEvent::ResetCards,
                Some("all") => MatchEvent::ResetAll,
                _ => bail!("usage: reset <time|score|cards|all>"),
            };
            Command::Event(event)
        }
        "swap" => Command::Event(MatchEvent::SwapSides),
        "priority" => {
            let event = match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("request") => MatchEvent::RequestPriorityAssignment,
                Some("dismiss") => MatchEvent::DismissPriorityAssignment,
                other => MatchEvent::AssignPriority(parse_side(other)?),
            };
            Command::Event(event)
        }
        "next-bout" => Command::Event(MatchEvent::AdvanceBout),
        "clear-match" => Command::Event(MatchEvent::ClearExternalMatch),
        "scan" if rest.is_empty() => Command::Scan(None),
        "scan" => Command::Scan(Some(rest.to_string())),
        "load-file" => {
            if rest.is_empty() {
                bail!("usage: load-file <path>");
            }
            Command::LoadFile(PathBuf::from(rest))
        }
        "register" => {
            if rest.is_empty() {
                bail!("usage: register <device name>");
            }
            Command::Register(rest.to_string())
        }
        "cancel-registration" => Command::CancelRegistration,
        "submit" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command: {other:?} (try `help`)"),
    };
    Ok(Some(command))
}

fn parse_side(raw: Option<&str>) -> Result<Side> {
    let raw = raw.ok_or_else(|| anyhow!("missing side (left|right)"))?;
    Ok(raw.parse()?)
}

fn parse_step(raw: Option<&str>) -> Result<bool> {
    match raw {
        Some("+") => Ok(true),
        Some("-") => Ok(false),
        _ => bail!("expected + or -"),
    }
}

/// `M:SS` or plain seconds.
fn parse_clock(raw: &str) -> Result<u32> {
    match raw.split_once(':') {
        Some((m, s)) => {
            let minutes: u32 = m.parse().with_context(|| format!("invalid minutes: {m:?}"))?;
            let seconds: u32 = s.parse().with_context(|| format!("invalid seconds: {s:?}"))?;
            if seconds >= 60 {
                bail!("seconds must be below 60: {raw:?}");
            }
            Ok(minutes * 60 + seconds)
        }
        None => raw
            .parse()
            .with_context(|| format!("invalid time: {raw:?}")),
    }
}
