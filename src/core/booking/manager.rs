//! Booking Wizard Manager
//!
//! Wraps the wizard controller with SQLite persistence:
//!
//! - **Lifecycle**: start/get/list/delete wizard sessions
//! - **Persistence**: every state change is written through immediately, so
//!   in-progress drafts survive an app restart and can be resumed
//! - **Completion**: a successful submission records the booking and removes
//!   the draft atomically
//!
//! Each operation is atomic at the database level.

use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::gateway::SubmissionGateway;
use crate::core::rates::RateTables;
use crate::database::{BookingDraftRecord, BookingRecord};

use super::controller::{AdvanceOutcome, BookingWizard, Retreat};
use super::estimate::estimate;
use super::types::{BookingStep, DraftPatch, WizardError};

// ============================================================================
// Summaries
// ============================================================================

/// Lightweight view of a stored wizard, for "resume draft" listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookingWizardSummary {
    pub id: String,
    pub booking_name: String,
    pub step: BookingStep,
    pub updated_at: String,
}

impl From<&BookingWizard> for BookingWizardSummary {
    fn from(wizard: &BookingWizard) -> Self {
        Self {
            id: wizard.id.clone(),
            booking_name: wizard.draft.booking_name.clone(),
            step: wizard.step,
            updated_at: wizard.updated_at.clone(),
        }
    }
}

// ============================================================================
// Record Conversion
// ============================================================================

impl BookingWizard {
    fn to_record(&self) -> Result<BookingDraftRecord, WizardError> {
        let draft = serde_json::to_string(&self.draft)
            .map_err(|e| WizardError::Database(format!("draft serialization failed: {}", e)))?;
        Ok(BookingDraftRecord {
            id: self.id.clone(),
            current_step: self.step.as_str().to_string(),
            draft,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        })
    }

    fn from_record(record: BookingDraftRecord) -> Result<Self, WizardError> {
        let step = BookingStep::try_from(record.current_step.as_str())
            .map_err(WizardError::Database)?;
        let draft = serde_json::from_str(&record.draft)
            .map_err(|e| WizardError::Database(format!("corrupt draft {}: {}", record.id, e)))?;
        Ok(Self {
            id: record.id,
            step,
            draft,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

// ============================================================================
// BookingWizardManager
// ============================================================================

/// Persistent front for the booking wizard state machine.
pub struct BookingWizardManager {
    pool: Arc<SqlitePool>,
}

impl BookingWizardManager {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a new booking wizard at step 1 and persist it.
    pub async fn start_wizard(&self) -> Result<BookingWizard, WizardError> {
        let id = uuid::Uuid::new_v4().to_string();
        let wizard = BookingWizard::new(id.clone());

        info!(wizard_id = %id, "Starting new booking wizard");

        self.save(&wizard).await?;
        Ok(wizard)
    }

    /// Load a wizard by id.
    pub async fn get_wizard(&self, wizard_id: &str) -> Result<Option<BookingWizard>, WizardError> {
        let record = sqlx::query_as::<_, BookingDraftRecord>(
            "SELECT * FROM booking_drafts WHERE id = ?",
        )
        .bind(wizard_id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| WizardError::Database(e.to_string()))?;

        match record {
            Some(rec) => Ok(Some(BookingWizard::from_record(rec)?)),
            None => Ok(None),
        }
    }

    /// List unsubmitted wizards, most recently touched first.
    pub async fn list_incomplete(&self) -> Result<Vec<BookingWizardSummary>, WizardError> {
        let records = sqlx::query_as::<_, BookingDraftRecord>(
            r#"
            SELECT * FROM booking_drafts
            WHERE current_step != 'submitted'
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| WizardError::Database(e.to_string()))?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            match BookingWizard::from_record(record) {
                Ok(wizard) => summaries.push(BookingWizardSummary::from(&wizard)),
                Err(e) => warn!(error = %e, "Skipping unreadable draft"),
            }
        }

        Ok(summaries)
    }

    /// Permanently delete a stored wizard.
    pub async fn delete_wizard(&self, wizard_id: &str) -> Result<(), WizardError> {
        info!(wizard_id = %wizard_id, "Deleting booking wizard");

        let result = sqlx::query("DELETE FROM booking_drafts WHERE id = ?")
            .bind(wizard_id)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| WizardError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(WizardError::NotFound(wizard_id.to_string()));
        }

        Ok(())
    }

    /// Cancel the wizard, optionally keeping the draft for later resumption.
    pub async fn cancel_wizard(
        &self,
        wizard_id: &str,
        save_draft: bool,
    ) -> Result<(), WizardError> {
        info!(wizard_id = %wizard_id, save_draft, "Cancelling booking wizard");

        if save_draft {
            // Touch the timestamp so it sorts to the top of the resume list
            let mut wizard = self.get_wizard_required(wizard_id).await?;
            wizard.updated_at = chrono::Utc::now().to_rfc3339();
            self.save(&wizard).await?;
        } else {
            self.delete_wizard(wizard_id).await?;
        }

        Ok(())
    }

    // ========================================================================
    // Wizard Operations
    // ========================================================================

    /// Apply one field mutation to a stored wizard and persist the result.
    pub async fn apply_patch(
        &self,
        wizard_id: &str,
        patch: DraftPatch,
    ) -> Result<BookingWizard, WizardError> {
        let mut wizard = self.get_wizard_required(wizard_id).await?;
        wizard.apply(patch)?;
        self.save(&wizard).await?;
        Ok(wizard)
    }

    /// Advance a stored wizard one step.
    ///
    /// On the final step a successful submission records the booking and
    /// removes the draft in one transaction. Validation or gateway failures
    /// leave the stored state untouched.
    pub async fn advance<G>(
        &self,
        wizard_id: &str,
        gateway: &G,
        tables: &RateTables,
    ) -> Result<(BookingWizard, AdvanceOutcome), WizardError>
    where
        G: SubmissionGateway + ?Sized,
    {
        let mut wizard = self.get_wizard_required(wizard_id).await?;

        debug!(
            wizard_id = %wizard_id,
            step = %wizard.step,
            "Advancing booking wizard"
        );

        let outcome = wizard.advance(gateway).await?;

        match &outcome {
            AdvanceOutcome::MovedTo(_) => {
                self.save(&wizard).await?;
            }
            AdvanceOutcome::Submitted(confirmation) => {
                let breakdown = estimate(&wizard.draft, tables);
                self.record_submission(&wizard, &confirmation.booking_id, breakdown.total)
                    .await?;
            }
        }

        Ok((wizard, outcome))
    }

    /// Move a stored wizard back one step.
    ///
    /// Retreating from step 1 signals [`Retreat::Exited`]; the stored draft
    /// is kept so the caller can decide between resume and cancel.
    pub async fn retreat(
        &self,
        wizard_id: &str,
    ) -> Result<(BookingWizard, Retreat), WizardError> {
        let mut wizard = self.get_wizard_required(wizard_id).await?;

        let retreat = wizard.retreat()?;
        if let Retreat::MovedTo(step) = retreat {
            debug!(wizard_id = %wizard_id, to = %step, "Going back in booking wizard");
            self.save(&wizard).await?;
        }

        Ok((wizard, retreat))
    }

    /// Estimate the cost of a stored wizard's draft.
    pub async fn estimate_wizard(
        &self,
        wizard_id: &str,
        tables: &RateTables,
    ) -> Result<super::estimate::EstimateBreakdown, WizardError> {
        let wizard = self.get_wizard_required(wizard_id).await?;
        Ok(estimate(&wizard.draft, tables))
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn get_wizard_required(&self, wizard_id: &str) -> Result<BookingWizard, WizardError> {
        self.get_wizard(wizard_id)
            .await?
            .ok_or_else(|| WizardError::NotFound(wizard_id.to_string()))
    }

    async fn save(&self, wizard: &BookingWizard) -> Result<(), WizardError> {
        let record = wizard.to_record()?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO booking_drafts
            (id, current_step, draft, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.current_step)
        .bind(&record.draft)
        .bind(&record.created_at)
        .bind(&record.updated_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| WizardError::Database(e.to_string()))?;

        Ok(())
    }

    /// Record the completed booking and drop the draft atomically.
    async fn record_submission(
        &self,
        wizard: &BookingWizard,
        remote_id: &str,
        estimated_total: i64,
    ) -> Result<(), WizardError> {
        let draft_json = serde_json::to_string(&wizard.draft)
            .map_err(|e| WizardError::Database(format!("draft serialization failed: {}", e)))?;

        let booking = BookingRecord {
            id: uuid::Uuid::new_v4().to_string(),
            remote_id: remote_id.to_string(),
            booking_name: wizard.draft.booking_name.clone(),
            client: wizard.draft.client.clone(),
            consignee: wizard.draft.consignee.clone(),
            driver_id: wizard.draft.driver_id.clone(),
            estimated_total,
            draft: draft_json,
            submitted_at: chrono::Utc::now().to_rfc3339(),
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| WizardError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO bookings
            (id, remote_id, booking_name, client, consignee, driver_id,
             estimated_total, draft, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.remote_id)
        .bind(&booking.booking_name)
        .bind(&booking.client)
        .bind(&booking.consignee)
        .bind(&booking.driver_id)
        .bind(booking.estimated_total)
        .bind(&booking.draft)
        .bind(&booking.submitted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| WizardError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM booking_drafts WHERE id = ?")
            .bind(&wizard.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| WizardError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| WizardError::Database(e.to_string()))?;

        info!(
            booking_id = %booking.id,
            remote_id = %booking.remote_id,
            booking_name = %booking.booking_name,
            estimated_total,
            "Booking submitted and recorded"
        );

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
