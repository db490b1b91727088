//! # Tournament Flows
//!
//! Loading a scanned match, registering this device, and submitting results.
//!
//! ## Loading
//!
//! ```text
//!   descriptor ─┬─ identity not required ─────────────▶ load
//!               ├─ required, credential stored ───────▶ load
//!               └─ required, no credential ──▶ pending ──register──▶ save credential, load
//!                                                  └─────cancel────▶ dropped
//! ```
//!
//! ## Submitting
//!
//! The result is assembled from a snapshot, so the match keeps running
//! normally while the request is in flight. Success flashes
//! [`SubmissionStatus::Submitted`] and clears the tournament match after
//! [`SUBMITTED_FLASH`]. Failure keeps the match intact and records the
//! message for the operator, who may retry. There is no automatic retry.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use touche_client::ResultSubmission;
use touche_core::MatchDescriptor;
use touche_state::MatchResult;

use crate::error::SessionError;
use crate::event::MatchEvent;
use crate::session::{Core, Session, Shared};

/// How long a successful submission is shown before the match is cleared.
pub const SUBMITTED_FLASH: Duration = Duration::from_secs(3);

/// Where the result submission stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    /// Accepted by the tournament system.
    Submitted { match_id: String },
    /// Rejected or unreachable. The match is left as it was.
    Failed { message: String },
}

/// What happened to an offered descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The match is loaded.
    Loaded,
    /// The tournament requires a registered device first.
    RegistrationRequired,
}

/// Wire body for a [`MatchResult`].
pub fn submission_body(result: &MatchResult) -> ResultSubmission {
    ResultSubmission {
        match_id: result.match_id.clone(),
        player1_hits: result.player1_hits,
        player2_hits: result.player2_hits,
        winner: result.winner.clone(),
        device_token: result.credential.clone(),
    }
}

impl Shared {
    fn clear_submitted(&self, match_id: &str) {
        {
            let mut core = self.core.lock();
            let still_loaded = core
                .state
                .external_match()
                .is_some_and(|d| d.match_id == match_id);
            if still_loaded {
                core.state.clear_external_match();
                self.settle(&mut core);
                tracing::info!(%match_id, "submitted match cleared");
            }
            core.flash = None;
        }
        self.submission.send_if_modified(|status| match status {
            SubmissionStatus::Submitted { match_id: id } if id.as_str() == match_id => {
                *status = SubmissionStatus::Idle;
                true
            }
            _ => false,
        });
    }
}

impl Session {
    // ── Loading ──────────────────────────────────────────────────────

    /// Offer a scanned descriptor.
    ///
    /// Loads it unless the tournament requires submitter identity and no
    /// device credential is stored, in which case it waits for
    /// [`Session::register_device`].
    pub fn offer_descriptor(
        &self,
        descriptor: MatchDescriptor,
    ) -> Result<LoadOutcome, SessionError> {
        let _entered = self.span.enter();
        if descriptor.require_submitter_identity && self.credentials.get_token()?.is_none() {
            tracing::info!(
                match_id = %descriptor.match_id,
                "tournament requires a registered device"
            );
            self.shared.core.lock().pending = Some(descriptor);
            return Ok(LoadOutcome::RegistrationRequired);
        }
        let mut core = self.shared.core.lock();
        self.load_locked(&mut core, descriptor);
        Ok(LoadOutcome::Loaded)
    }

    fn load_locked(&self, core: &mut Core, descriptor: MatchDescriptor) {
        core.pending = None;
        if let Some(flash) = core.flash.take() {
            flash.abort();
        }
        self.shared.submission.send_replace(SubmissionStatus::Idle);
        self.apply_locked(core, MatchEvent::LoadExternalMatch(Box::new(descriptor)));
    }

    /// Register this device with the pending tournament, store the issued
    /// credential and load the pending match.
    ///
    /// On failure nothing is stored and the match stays pending.
    pub async fn register_device(&self, name: &str) -> Result<(), SessionError> {
        let pending = self
            .shared
            .core
            .lock()
            .pending
            .clone()
            .ok_or(SessionError::NoPendingRegistration)?;

        let response = self
            .client
            .register_device(&pending.base_uri, name)
            .instrument(self.span.clone())
            .await?;

        let _entered = self.span.enter();
        self.credentials
            .save_token(&response.device_token, Some(name.trim()))?;
        tracing::info!(name = name.trim(), "device registered");

        let mut core = self.shared.core.lock();
        let still_pending = core
            .pending
            .as_ref()
            .is_some_and(|d| d.match_id == pending.match_id);
        if still_pending {
            self.load_locked(&mut core, pending);
        }
        Ok(())
    }

    /// Drop the match waiting for registration.
    pub fn cancel_registration(&self) {
        if let Some(descriptor) = self.shared.core.lock().pending.take() {
            let _entered = self.span.enter();
            tracing::info!(match_id = %descriptor.match_id, "registration cancelled");
        }
    }

    // ── Submitting ───────────────────────────────────────────────────

    /// Submit the loaded tournament match's result.
    pub async fn submit_result(&self) -> Result<(), SessionError> {
        let snapshot = self.snapshot();
        let descriptor = snapshot
            .external_match()
            .cloned()
            .ok_or(SessionError::NoExternalMatch)?;

        let token = if descriptor.require_submitter_identity {
            self.credentials.get_token()?
        } else {
            None
        };
        let result = MatchResult::assemble(&snapshot, token.as_deref().map(String::as_str))
            .ok_or(SessionError::NoExternalMatch)?;
        let submission = submission_body(&result);

        let mut busy = false;
        self.shared.submission.send_if_modified(|status| {
            if *status == SubmissionStatus::Submitting {
                busy = true;
                return false;
            }
            *status = SubmissionStatus::Submitting;
            true
        });
        if busy {
            return Err(SessionError::SubmissionInProgress);
        }

        let outcome = self
            .client
            .submit_result(&descriptor.submit_url, &submission)
            .instrument(self.span.clone())
            .await;

        let _entered = self.span.enter();
        match outcome {
            Ok(()) => {
                tracing::info!(
                    match_id = %result.match_id,
                    winner = %result.winner,
                    "result submitted"
                );
                self.shared.submission.send_replace(SubmissionStatus::Submitted {
                    match_id: result.match_id.clone(),
                });
                self.schedule_clear(result.match_id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(match_id = %result.match_id, error = %e, "result submission failed");
                self.shared.submission.send_replace(SubmissionStatus::Failed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    fn schedule_clear(&self, match_id: String) {
        let shared = Arc::clone(&self.shared);
        let delay = self.config.submitted_flash;
        let task = self.spawn_task(
            async move {
                tokio::time::sleep(delay).await;
                shared.clear_submitted(&match_id);
            }
            .instrument(self.span.clone()),
        );
        if let Some(previous) = self.shared.core.lock().flash.replace(task) {
            previous.abort();
        }
    }
}
