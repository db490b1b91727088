//! # touche-cli - Terminal Scoreboard
//!
//! Subcommand handlers for the `touche` binary. Each handler takes its
//! parsed arguments plus the shared [`context::CliContext`] and returns an
//! exit code.
//!
//! ## Subcommands
//!
//! | Command | Handler |
//! |---------|---------|
//! | `touche run` | [`run::run_scoreboard`] |
//! | `touche register` | [`identity::run_register`] |
//! | `touche identity show\|clear` | [`identity::run_identity`] |
//! | `touche descriptor <file>` | [`descriptor::run_descriptor`] |

pub mod command;
pub mod context;
pub mod descriptor;
pub mod identity;
pub mod render;
pub mod run;
