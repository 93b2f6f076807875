//! Database Models
//!
//! Record types mapping one-to-one onto table rows. Domain types live in
//! `core`; these stay flat and stringly-typed the way SQLite stores them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Booking Draft Record
// ============================================================================

/// Stored wizard session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingDraftRecord {
    pub id: String,
    pub current_step: String,
    /// JSON BookingDraft
    pub draft: String,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Booking Record
// ============================================================================

/// Submitted booking, with denormalized headline fields for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingRecord {
    pub id: String,
    /// Identifier assigned by the remote booking endpoint
    pub remote_id: String,
    pub booking_name: String,
    pub client: String,
    pub consignee: String,
    pub driver_id: Option<String>,
    /// Taxed estimate at submission time, whole currency units
    pub estimated_total: i64,
    /// JSON BookingDraft as submitted
    pub draft: String,
    pub submitted_at: String,
}

// ============================================================================
// Rate Table Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DemurrageRateRecord {
    pub location: String,
    pub daily_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComplianceChargeRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HaulageTariffRecord {
    pub area_name: String,
    pub grand_total: f64,
}

// ============================================================================
// Driver Record
// ============================================================================

/// Roster entry for an assignable driver
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverRecord {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    /// SQLite bool: 0 = false, 1 = true
    pub available: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl DriverRecord {
    pub fn new(id: String, name: String, phone: Option<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name,
            phone,
            available: 1,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_driver_is_available() {
        let driver = DriverRecord::new("drv-1".to_string(), "Musa".to_string(), None);
        assert!(driver.is_available());
    }

    #[test]
    fn test_availability_flag_round_trip() {
        let mut driver = DriverRecord::new("drv-1".to_string(), "Musa".to_string(), None);
        driver.available = 0;
        assert!(!driver.is_available());
    }
}
