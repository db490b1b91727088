//! # touche-client - Tournament System Client
//!
//! Everything the scoreboard needs to talk to a tournament system:
//!
//! - [`TournamentClient`]: registers this device
//!   (`POST {baseUri}/api/submitter/register`) and submits results
//!   (`POST {submitUrl}`).
//! - [`CredentialStore`]: persists the bearer credential issued at
//!   registration, globally or per tournament.
//!
//! ## Crate Policy
//!
//! - No scoreboard logic: this crate knows wire shapes, not match rules.
//! - No automatic retry. Failures are surfaced for the operator to retry.
//! - Credentials leave the store wrapped in `zeroize::Zeroizing`.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::{registration_url, TournamentClient, REGISTER_PATH};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
pub use credentials::{
    CredentialStore, FileStore, KeyValueStore, MemoryStore, CREDENTIALS_FILE, UNNAMED_DEVICE,
};
pub use error::{ClientError, CredentialStoreError};
pub use types::{RegistrationRequest, RegistrationResponse, ResultSubmission};
