//! Booking Wizard Controller
//!
//! Platform-agnostic state machine for one booking session. Step forms
//! report [`DraftPatch`] mutations; renderers read the step and draft and
//! draw themselves. The controller never touches the database; the manager
//! wraps it with persistence.

use serde::{Deserialize, Serialize};

use crate::core::gateway::{BookingConfirmation, SubmissionGateway};

use super::types::{BookingDraft, BookingStep, DraftPatch, WizardError};

/// Result of a forward transition.
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// Moved to the given step.
    MovedTo(BookingStep),
    /// Final step completed: the draft was submitted exactly once.
    Submitted(BookingConfirmation),
}

/// Result of a backward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Moved back to the given step.
    MovedTo(BookingStep),
    /// Retreated from step 1: the caller should close the wizard.
    Exited,
}

/// One booking wizard session: current step plus the draft it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWizard {
    /// Unique identifier for this wizard session
    pub id: String,
    /// Current step
    pub step: BookingStep,
    /// Accumulated booking draft
    pub draft: BookingDraft,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl BookingWizard {
    /// Create a fresh wizard at step 1 with an empty draft.
    pub fn new(id: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            step: BookingStep::Routing,
            draft: BookingDraft::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether this wizard has reached the terminal state.
    pub fn is_submitted(&self) -> bool {
        self.step == BookingStep::Submitted
    }

    /// Apply a single field mutation to the draft.
    ///
    /// Rejected after submission; otherwise always succeeds; cross-field
    /// validation is deferred to [`advance`](Self::advance).
    pub fn apply(&mut self, patch: DraftPatch) -> Result<(), WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        self.draft.apply(patch);
        self.touch();
        Ok(())
    }

    /// Advance to the next step.
    ///
    /// - From `Routing`: fails with `IncompleteFields` unless all seven
    ///   required fields are non-empty after trimming; the step is unchanged
    ///   on failure.
    /// - From `Shipment`: always succeeds.
    /// - From `Assignment`: fails with `NoDriverSelected` if no driver is
    ///   set; otherwise hands the draft to the gateway exactly once and
    ///   transitions to `Submitted` on success. On gateway failure the step
    ///   and draft are unchanged and the call can be retried.
    pub async fn advance<G>(&mut self, gateway: &G) -> Result<AdvanceOutcome, WizardError>
    where
        G: SubmissionGateway + ?Sized,
    {
        match self.step {
            BookingStep::Routing => {
                let missing = self.draft.missing_routing_fields();
                if !missing.is_empty() {
                    return Err(WizardError::IncompleteFields { missing });
                }
                self.step = BookingStep::Shipment;
                self.touch();
                Ok(AdvanceOutcome::MovedTo(self.step))
            }
            BookingStep::Shipment => {
                self.step = BookingStep::Assignment;
                self.touch();
                Ok(AdvanceOutcome::MovedTo(self.step))
            }
            BookingStep::Assignment => {
                if self.draft.driver_id.is_none() {
                    return Err(WizardError::NoDriverSelected);
                }
                let confirmation = gateway.submit(&self.draft).await?;
                self.step = BookingStep::Submitted;
                self.touch();
                Ok(AdvanceOutcome::Submitted(confirmation))
            }
            BookingStep::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Move back one step, with no validation gate.
    ///
    /// From step 1 this signals [`Retreat::Exited`] so the caller can close
    /// the wizard. The terminal state cannot be left.
    pub fn retreat(&mut self) -> Result<Retreat, WizardError> {
        match self.step {
            BookingStep::Submitted => Err(WizardError::AlreadySubmitted),
            BookingStep::Routing => Ok(Retreat::Exited),
            _ => {
                // previous() is Some for Shipment and Assignment
                let prev = self.step.previous().unwrap_or(BookingStep::Routing);
                self.step = prev;
                self.touch();
                Ok(Retreat::MovedTo(prev))
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

// ============================================================================
// Tests
// ============================================================================
