//! Session error types.

use thiserror::Error;

use touche_client::{ClientError, CredentialStoreError};
use touche_core::DescriptorError;

/// Errors from session-level flows. None of them affect the match state.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session was created outside a Tokio runtime.
    #[error("no async runtime available for the clock driver")]
    NoRuntime,

    /// Registration was requested with no tournament match waiting for it.
    #[error("invalid tournament configuration: no match is waiting for device registration")]
    NoPendingRegistration,

    /// Submission was requested with no tournament match loaded.
    #[error("no tournament match loaded")]
    NoExternalMatch,

    /// A submission is already in flight.
    #[error("a result submission is already in progress")]
    SubmissionInProgress,

    /// The tournament system rejected or did not answer a request.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The local credential store failed.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
}

/// Errors from a QR scanning session.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The device has no camera. Scanning is disabled.
    #[error("no camera found")]
    CameraUnavailable,

    /// The camera exists but could not be started.
    #[error("failed to initialize camera: {0}")]
    CameraFailed(String),

    /// The payload is not a usable match descriptor. The session stays open.
    #[error(transparent)]
    Malformed(#[from] DescriptorError),

    /// The session already produced a descriptor or was closed.
    #[error("scanning session is closed")]
    Closed,
}

/// Errors from the platform wake-lock.
#[derive(Error, Debug)]
#[error("wake lock unavailable: {0}")]
pub struct WakeLockError(pub String);
