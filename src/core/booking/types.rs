//! Booking Wizard Domain Types
//!
//! Defines the core domain types for the booking creation wizard:
//! - [`BookingDraft`]: Accumulating draft state, single-writer via the controller
//! - [`DraftPatch`]: Field-level mutation variants applied by the controller
//! - [`BookingStep`]: Linear wizard step enum with a terminal submitted state
//! - [`WizardError`]: Error types for wizard operations
//!
//! # Architecture
//!
//! The wizard uses a state machine pattern: three ordered steps collect
//! routing, shipment/charge, and driver-assignment data into the draft, with
//! validation gating only the transitions that need it. The draft is owned by
//! the controller for the lifetime of the session; step forms report field
//! mutations as [`DraftPatch`] values rather than writing directly.
//!
//! # Serialization
//!
//! All types implement `Serialize` and `Deserialize` for persistence and for
//! handing the completed draft to the submission gateway.

use serde::{Deserialize, Serialize};

use crate::core::gateway::SubmissionError;
use crate::core::rates::HaulageTariff;

// ============================================================================
// Step Enum
// ============================================================================

/// Steps of the booking wizard. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    /// Step 1: booking identity and pickup/delivery routing
    Routing,
    /// Step 2: shipment details and charge selection
    Shipment,
    /// Step 3: driver assignment and final review
    Assignment,
    /// Terminal state after a successful submission
    Submitted,
}

impl BookingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Routing => "routing",
            BookingStep::Shipment => "shipment",
            BookingStep::Assignment => "assignment",
            BookingStep::Submitted => "submitted",
        }
    }

    /// Get the next step in the wizard flow (None at the end)
    pub fn next(&self) -> Option<Self> {
        match self {
            BookingStep::Routing => Some(BookingStep::Shipment),
            BookingStep::Shipment => Some(BookingStep::Assignment),
            BookingStep::Assignment => Some(BookingStep::Submitted),
            BookingStep::Submitted => None,
        }
    }

    /// Get the previous step in the wizard flow (None at the beginning
    /// and from the terminal state)
    pub fn previous(&self) -> Option<Self> {
        match self {
            BookingStep::Routing => None,
            BookingStep::Shipment => Some(BookingStep::Routing),
            BookingStep::Assignment => Some(BookingStep::Shipment),
            BookingStep::Submitted => None,
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for BookingStep {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "routing" => Ok(BookingStep::Routing),
            "shipment" => Ok(BookingStep::Shipment),
            "assignment" => Ok(BookingStep::Assignment),
            "submitted" => Ok(BookingStep::Submitted),
            _ => Err(format!("Unknown booking step: {}", s)),
        }
    }
}

// ============================================================================
// Shipment Enums
// ============================================================================

/// Container load mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipmentType {
    /// Full container load
    Fcl,
    /// Less than container load
    Lcl,
}

impl ShipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentType::Fcl => "FCL",
            ShipmentType::Lcl => "LCL",
        }
    }
}

/// Container size, driving the cost multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerSize {
    #[serde(rename = "20ft")]
    TwentyFt,
    #[serde(rename = "40ft")]
    FortyFt,
    #[serde(rename = "40ft HC")]
    FortyFtHc,
}

impl ContainerSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerSize::TwentyFt => "20ft",
            ContainerSize::FortyFt => "40ft",
            ContainerSize::FortyFtHc => "40ft HC",
        }
    }

    /// Cost multiplier applied to the pre-charge subtotal.
    pub fn multiplier(&self) -> f64 {
        match self {
            ContainerSize::TwentyFt => 1.0,
            ContainerSize::FortyFt => 1.5,
            ContainerSize::FortyFtHc => 1.8,
        }
    }
}

// ============================================================================
// BookingDraft - Accumulating Draft State
// ============================================================================

/// In-progress booking, owned exclusively by the wizard controller.
///
/// Weight, volume, and days-expected stay as raw text the way the forms
/// capture them; the estimator parses lazily and treats unparseable values
/// as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDraft {
    // Routing step
    pub booking_name: String,
    pub client: String,
    pub consignee: String,
    pub pickup_state: String,
    pub pickup_address: String,
    pub pickup_time: String,
    pub delivery_state: String,
    pub delivery_address: String,
    pub delivery_time: String,
    pub date: String,

    // Shipment step
    pub shipment_type: Option<ShipmentType>,
    pub container_size: Option<ContainerSize>,
    pub items: Vec<String>,
    pub gross_weight: String,
    pub volume: String,

    // Charge selection (shipment step)
    pub demurrage_location: Option<String>,
    pub days_expected: String,
    pub compliance_ids: Vec<String>,
    pub haulage_company: Option<String>,
    pub pickup_area: Option<String>,
    pub delivery_area: Option<String>,
    /// Snapshot of the tariff matching `pickup_area`; set and cleared
    /// together with it, never independently.
    pub haulage_rate: Option<HaulageTariff>,

    // Assignment step
    pub driver_id: Option<String>,
}

/// Field names required to leave the routing step.
pub const ROUTING_REQUIRED_FIELDS: [&str; 7] = [
    "booking_name",
    "client",
    "consignee",
    "pickup_state",
    "pickup_address",
    "delivery_state",
    "delivery_address",
];

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of required routing fields that are empty after trimming.
    pub fn missing_routing_fields(&self) -> Vec<&'static str> {
        let checks: [(&'static str, &str); 7] = [
            ("booking_name", &self.booking_name),
            ("client", &self.client),
            ("consignee", &self.consignee),
            ("pickup_state", &self.pickup_state),
            ("pickup_address", &self.pickup_address),
            ("delivery_state", &self.delivery_state),
            ("delivery_address", &self.delivery_address),
        ];
        checks
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Whether all required routing fields are filled in.
    pub fn has_routing(&self) -> bool {
        self.missing_routing_fields().is_empty()
    }

    /// Count of items that survive trimming, used for the handling fee.
    pub fn effective_item_count(&self) -> usize {
        self.items.iter().filter(|i| !i.trim().is_empty()).count()
    }

    /// Apply a single field-level mutation.
    ///
    /// No cross-field validation happens here; that is deferred to
    /// `advance()`. The items and haulage variants enforce the draft's
    /// structural invariants on the way in.
    pub fn apply(&mut self, patch: DraftPatch) {
        match patch {
            DraftPatch::BookingName(v) => self.booking_name = v,
            DraftPatch::Client(v) => self.client = v,
            DraftPatch::Consignee(v) => self.consignee = v,
            DraftPatch::PickupState(v) => self.pickup_state = v,
            DraftPatch::PickupAddress(v) => self.pickup_address = v,
            DraftPatch::PickupTime(v) => self.pickup_time = v,
            DraftPatch::DeliveryState(v) => self.delivery_state = v,
            DraftPatch::DeliveryAddress(v) => self.delivery_address = v,
            DraftPatch::DeliveryTime(v) => self.delivery_time = v,
            DraftPatch::Date(v) => self.date = v,
            DraftPatch::ShipmentType(v) => self.shipment_type = v,
            DraftPatch::ContainerSize(v) => self.container_size = v,
            DraftPatch::Items(list) => {
                // Blur normalization: drop entries that trim to empty
                self.items = list
                    .into_iter()
                    .filter(|i| !i.trim().is_empty())
                    .collect();
            }
            DraftPatch::GrossWeight(v) => self.gross_weight = v,
            DraftPatch::Volume(v) => self.volume = v,
            DraftPatch::DemurrageLocation(v) => self.demurrage_location = v,
            DraftPatch::DaysExpected(v) => self.days_expected = v,
            DraftPatch::ComplianceCharges(ids) => {
                // Set semantics: keep first occurrence of each id
                let mut seen = Vec::with_capacity(ids.len());
                for id in ids {
                    if !seen.contains(&id) {
                        seen.push(id);
                    }
                }
                self.compliance_ids = seen;
            }
            DraftPatch::HaulageCompany(v) => self.haulage_company = v,
            DraftPatch::HaulageArea(tariff) => {
                // Area and rate snapshot move together, so they can never
                // be inconsistent with each other.
                match tariff {
                    Some(t) => {
                        self.pickup_area = Some(t.area_name.clone());
                        self.haulage_rate = Some(t);
                    }
                    None => {
                        self.pickup_area = None;
                        self.haulage_rate = None;
                    }
                }
            }
            DraftPatch::DeliveryArea(v) => self.delivery_area = v,
            DraftPatch::Driver(v) => self.driver_id = v,
        }
    }
}

// ============================================================================
// DraftPatch - Field-Level Mutations
// ============================================================================

/// Single-field mutation reported by a step form.
///
/// A closed enum instead of a `(name, value)` pair so every field write is
/// typed and exhaustively handled by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum DraftPatch {
    BookingName(String),
    Client(String),
    Consignee(String),
    PickupState(String),
    PickupAddress(String),
    PickupTime(String),
    DeliveryState(String),
    DeliveryAddress(String),
    DeliveryTime(String),
    Date(String),
    ShipmentType(Option<ShipmentType>),
    ContainerSize(Option<ContainerSize>),
    /// Full item list as of the blur event; normalized on apply
    Items(Vec<String>),
    GrossWeight(String),
    Volume(String),
    DemurrageLocation(Option<String>),
    DaysExpected(String),
    /// Selected compliance charge ids; deduplicated on apply
    ComplianceCharges(Vec<String>),
    HaulageCompany(Option<String>),
    /// Selects (or clears) the pickup area together with its tariff snapshot
    HaulageArea(Option<HaulageTariff>),
    DeliveryArea(Option<String>),
    Driver(Option<String>),
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during wizard operations.
///
/// None of these are fatal; all are local, user-correctable conditions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WizardError {
    #[error("Required fields are incomplete: {}", missing.join(", "))]
    IncompleteFields { missing: Vec<&'static str> },

    #[error("No driver selected for this booking")]
    NoDriverSelected,

    #[error("Booking already submitted")]
    AlreadySubmitted,

    #[error("Booking draft not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

// ============================================================================
// Tests
// ============================================================================
