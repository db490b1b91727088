//! # touche-core - Foundational Types for the Scoreboard
//!
//! Leaf crate of the workspace. Defines the vocabulary every other crate
//! speaks: which side of the piste a competitor stands on, which match format
//! is being fenced, the static timing/score catalog for each format, and the
//! match descriptor delivered by a tournament system through a QR code.
//!
//! ## Key Design Principles
//!
//! 1. **Single `MatchFormat` enum.** Format-dependent behaviour is expressed as
//!    exhaustive `match`es over one enum. Adding a format forces every
//!    consumer to handle it.
//!
//! 2. **Total catalog.** [`MatchFormat::config`] is defined for every format
//!    and every segment number; it never fails.
//!
//! 3. **Validated descriptors.** A [`MatchDescriptor`] can only be obtained
//!    through [`MatchDescriptor::from_json`] or the validated constructor, so
//!    downstream crates never see a descriptor with a missing match id or
//!    competitor name.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `touche-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod format;
pub mod side;

pub use descriptor::MatchDescriptor;
pub use error::{DescriptorError, ParseError};
pub use format::{
    max_score_for_bout, FormatConfig, MatchFormat, BREAK_SECONDS, ELIMINATION_PERIODS,
    FREEFORM_SCORE_CAP, OVERTIME_SECONDS, REGULATION_SECONDS, TEAM_BOUTS,
};
pub use side::Side;
