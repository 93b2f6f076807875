//! Booking Cost Estimator
//!
//! Pure function over the draft's shipment fields and the externally
//! supplied rate tables. Recomputed whole-cloth on every relevant field
//! change; the arithmetic is cheap enough that recomputing from scratch
//! beats caching.

use serde::{Deserialize, Serialize};

use crate::core::rates::RateTables;

use super::types::{BookingDraft, ShipmentType};

// ============================================================================
// Rate Constants
// ============================================================================

/// Base rate for a full container load.
pub const FCL_BASE_RATE: f64 = 2500.0;
/// Base rate for a less-than-container load.
pub const LCL_BASE_RATE: f64 = 4500.0;
/// Cost per unit of gross weight.
pub const WEIGHT_RATE: f64 = 3.5;
/// Cost per unit of volume.
pub const VOLUME_RATE: f64 = 85.0;
/// Handling fee per non-empty item line.
pub const ITEM_HANDLING_FEE: f64 = 150.0;
/// Flat tax applied to the subtotal.
pub const TAX_RATE: f64 = 0.06;

// ============================================================================
// Estimate Breakdown
// ============================================================================

/// Itemized cost estimate for an in-progress booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub base_rate: f64,
    pub weight_cost: f64,
    pub volume_cost: f64,
    pub item_handling_fee: f64,
    pub container_multiplier: f64,
    pub demurrage_cost: f64,
    pub compliance_cost: f64,
    pub haulage_cost: f64,
    /// Pre-tax subtotal.
    pub subtotal: f64,
    /// Taxed total, rounded to the nearest whole unit.
    pub total: i64,
}

/// Compute the estimated booking cost.
///
/// Deterministic: the same draft and tables always produce the same
/// breakdown. Unparseable numeric fields and unmatched rate references
/// contribute zero, so a draft missing data (or tables that failed to
/// fetch) yields a degraded estimate rather than an error.
pub fn estimate(draft: &BookingDraft, tables: &RateTables) -> EstimateBreakdown {
    let base_rate = match draft.shipment_type {
        Some(ShipmentType::Fcl) => FCL_BASE_RATE,
        Some(ShipmentType::Lcl) => LCL_BASE_RATE,
        None => 0.0,
    };

    let weight_cost = parse_or_zero(&draft.gross_weight) * WEIGHT_RATE;
    let volume_cost = parse_or_zero(&draft.volume) * VOLUME_RATE;
    let item_handling_fee = draft.effective_item_count() as f64 * ITEM_HANDLING_FEE;

    let container_multiplier = draft
        .container_size
        .map(|size| size.multiplier())
        .unwrap_or(1.0);

    let demurrage_cost = draft
        .demurrage_location
        .as_deref()
        .and_then(|location| tables.demurrage_rate(location))
        .map(|daily_rate| daily_rate * parse_or_zero(&draft.days_expected))
        .unwrap_or(0.0);

    let compliance_cost = draft
        .compliance_ids
        .iter()
        .filter_map(|id| tables.compliance.iter().find(|c| &c.id == id))
        .map(|c| c.price)
        .sum::<f64>();

    let haulage_cost = draft
        .haulage_rate
        .as_ref()
        .map(|t| t.grand_total)
        .unwrap_or(0.0);

    let subtotal = (base_rate + weight_cost + volume_cost + item_handling_fee)
        * container_multiplier
        + demurrage_cost
        + compliance_cost
        + haulage_cost;

    let total = (subtotal * (1.0 + TAX_RATE)).round() as i64;

    EstimateBreakdown {
        base_rate,
        weight_cost,
        volume_cost,
        item_handling_fee,
        container_multiplier,
        demurrage_cost,
        compliance_cost,
        haulage_cost,
        subtotal,
        total,
    }
}

/// Lazily parse a form field; unparseable or empty input counts as zero.
fn parse_or_zero(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================
