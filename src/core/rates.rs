//! Rate Table Domain Types
//!
//! Read-only rate records consumed by the cost estimator and the charge
//! selection step:
//! - [`DemurrageRate`]: per-location daily storage rate
//! - [`ComplianceCharge`]: flat regulatory charge selectable by id
//! - [`HaulageTariff`]: per-area road haulage grand total
//!
//! Tables are fetched as a unit via [`RateTables::load`]. A failed fetch
//! surfaces [`RateFetchError`]; callers are expected to fall back to
//! [`RateTables::default`] so the estimator degrades to zero contributions
//! instead of blocking the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::{Database, RateOps};

/// Daily demurrage rate for a storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemurrageRate {
    pub location: String,
    pub daily_rate: f64,
}

/// Flat compliance charge, selectable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCharge {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Road haulage tariff for a pickup area.
///
/// The booking draft snapshots the selected tariff so the estimate stays
/// stable even if the tariff table changes mid-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulageTariff {
    pub area_name: String,
    pub grand_total: f64,
}

/// All rate tables the booking wizard consumes, fetched as a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTables {
    pub demurrage: Vec<DemurrageRate>,
    pub compliance: Vec<ComplianceCharge>,
    pub haulage: Vec<HaulageTariff>,
}

/// Error raised when a rate-table fetch fails.
///
/// Never fatal: the estimator treats missing tables as empty.
#[derive(Debug, Clone, Error)]
#[error("Failed to fetch rate tables: {0}")]
pub struct RateFetchError(pub String);

impl RateTables {
    /// Load all three tables from the database.
    pub async fn load(db: &Database) -> Result<Self, RateFetchError> {
        let demurrage = db
            .list_demurrage_rates()
            .await
            .map_err(|e| RateFetchError(e.to_string()))?
            .into_iter()
            .map(|r| DemurrageRate {
                location: r.location,
                daily_rate: r.daily_rate,
            })
            .collect();

        let compliance = db
            .list_compliance_charges()
            .await
            .map_err(|e| RateFetchError(e.to_string()))?
            .into_iter()
            .map(|r| ComplianceCharge {
                id: r.id,
                name: r.name,
                price: r.price,
            })
            .collect();

        let haulage = db
            .list_haulage_tariffs()
            .await
            .map_err(|e| RateFetchError(e.to_string()))?
            .into_iter()
            .map(|r| HaulageTariff {
                area_name: r.area_name,
                grand_total: r.grand_total,
            })
            .collect();

        Ok(Self {
            demurrage,
            compliance,
            haulage,
        })
    }

    /// Look up the daily demurrage rate for a location, if present.
    pub fn demurrage_rate(&self, location: &str) -> Option<f64> {
        self.demurrage
            .iter()
            .find(|r| r.location == location)
            .map(|r| r.daily_rate)
    }

    /// Look up a haulage tariff by area name, if present.
    pub fn haulage_tariff(&self, area_name: &str) -> Option<&HaulageTariff> {
        self.haulage.iter().find(|t| t.area_name == area_name)
    }
}
