//! End-to-end booking flow against a real on-disk database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use freightdesk::core::booking::{
    AdvanceOutcome, BookingStep, BookingWizardManager, DraftPatch, WizardError,
};
use freightdesk::core::gateway::{BookingConfirmation, SubmissionError, SubmissionGateway};
use freightdesk::core::rates::RateTables;
use freightdesk::database::{
    BookingOps, ComplianceChargeRecord, Database, DemurrageRateRecord, DriverOps, DriverRecord,
    HaulageTariffRecord, RateOps,
};

/// Gateway stub that counts submissions and returns a fixed outcome.
struct StubGateway {
    calls: AtomicUsize,
    fail: bool,
}

impl StubGateway {
    fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionGateway for StubGateway {
    async fn submit(
        &self,
        _draft: &freightdesk::core::booking::BookingDraft,
    ) -> Result<BookingConfirmation, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(SubmissionError::Rejected {
                status: 503,
                message: "backend unavailable".to_string(),
            })
        } else {
            Ok(BookingConfirmation {
                booking_id: "bk-remote-1".to_string(),
                reference: Some("REF-2024-001".to_string()),
            })
        }
    }
}

async fn open_database() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path()).await.unwrap();
    (dir, db)
}

async fn seed_rates(db: &Database) {
    db.replace_demurrage_rates(&[DemurrageRateRecord {
        location: "Apapa Terminal".to_string(),
        daily_rate: 120.0,
    }])
    .await
    .unwrap();
    db.replace_compliance_charges(&[ComplianceChargeRecord {
        id: "customs".to_string(),
        name: "Customs Clearance".to_string(),
        price: 450.0,
    }])
    .await
    .unwrap();
    db.replace_haulage_tariffs(&[HaulageTariffRecord {
        area_name: "Ikeja".to_string(),
        grand_total: 800.0,
    }])
    .await
    .unwrap();
}

async fn fill_routing(manager: &BookingWizardManager, id: &str) {
    for patch in [
        DraftPatch::BookingName("Lagos import run".into()),
        DraftPatch::Client("client-7".into()),
        DraftPatch::Consignee("Acme Traders".into()),
        DraftPatch::PickupState("Lagos".into()),
        DraftPatch::PickupAddress("14 Wharf Rd".into()),
        DraftPatch::DeliveryState("Ogun".into()),
        DraftPatch::DeliveryAddress("2 Depot Close".into()),
    ] {
        manager.apply_patch(id, patch).await.unwrap();
    }
}

#[tokio::test]
async fn full_flow_records_booking_with_estimate() {
    let (_dir, db) = open_database().await;
    seed_rates(&db).await;
    let tables = RateTables::load(&db).await.unwrap();

    let manager = BookingWizardManager::new(Arc::new(db.pool().clone()));
    let gateway = StubGateway::succeeding();

    let wizard = manager.start_wizard().await.unwrap();
    fill_routing(&manager, &wizard.id).await;
    manager.advance(&wizard.id, &gateway, &tables).await.unwrap();

    // Shipment details matching the seeded tables
    use freightdesk::core::booking::{ContainerSize, ShipmentType};
    for patch in [
        DraftPatch::ShipmentType(Some(ShipmentType::Fcl)),
        DraftPatch::ContainerSize(Some(ContainerSize::FortyFt)),
        DraftPatch::GrossWeight("1000".into()),
        DraftPatch::Volume("20".into()),
        DraftPatch::Items(vec!["Pallet A".into(), "Pallet B".into()]),
        DraftPatch::DemurrageLocation(Some("Apapa Terminal".into())),
        DraftPatch::DaysExpected("3".into()),
        DraftPatch::ComplianceCharges(vec!["customs".into()]),
        DraftPatch::HaulageArea(tables.haulage_tariff("Ikeja").cloned()),
        DraftPatch::Driver(Some("drv-3".into())),
    ] {
        manager.apply_patch(&wizard.id, patch).await.unwrap();
    }

    manager.advance(&wizard.id, &gateway, &tables).await.unwrap();
    let (final_state, outcome) = manager.advance(&wizard.id, &gateway, &tables).await.unwrap();

    assert!(final_state.is_submitted());
    assert_eq!(gateway.call_count(), 1);
    match outcome {
        AdvanceOutcome::Submitted(confirmation) => {
            assert_eq!(confirmation.booking_id, "bk-remote-1");
            assert_eq!(confirmation.reference.as_deref(), Some("REF-2024-001"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Draft is gone, booking is recorded with the taxed estimate:
    // (2500 + 3500 + 1700 + 300) * 1.5 + 360 + 450 + 800 = 13610 -> 14427
    assert!(manager.get_wizard(&wizard.id).await.unwrap().is_none());
    let bookings = db.list_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].remote_id, "bk-remote-1");
    assert_eq!(bookings[0].estimated_total, 14427);
    assert_eq!(bookings[0].driver_id.as_deref(), Some("drv-3"));
}

#[tokio::test]
async fn rejected_submission_keeps_draft_resumable() {
    let (_dir, db) = open_database().await;
    let tables = RateTables::load(&db).await.unwrap();

    let manager = BookingWizardManager::new(Arc::new(db.pool().clone()));
    let gateway = StubGateway::failing();

    let wizard = manager.start_wizard().await.unwrap();
    fill_routing(&manager, &wizard.id).await;
    manager.advance(&wizard.id, &gateway, &tables).await.unwrap();
    manager.advance(&wizard.id, &gateway, &tables).await.unwrap();
    manager
        .apply_patch(&wizard.id, DraftPatch::Driver(Some("drv-3".into())))
        .await
        .unwrap();

    let err = manager
        .advance(&wizard.id, &gateway, &tables)
        .await
        .unwrap_err();
    match err {
        WizardError::Submission(SubmissionError::Rejected { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "backend unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Still resumable at the assignment step, nothing recorded
    let stored = manager.get_wizard(&wizard.id).await.unwrap().unwrap();
    assert_eq!(stored.step, BookingStep::Assignment);
    assert_eq!(stored.draft.driver_id.as_deref(), Some("drv-3"));
    assert!(db.list_bookings().await.unwrap().is_empty());
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn empty_rate_tables_load_cleanly() {
    let (_dir, db) = open_database().await;

    let tables = RateTables::load(&db).await.unwrap();
    assert!(tables.demurrage.is_empty());
    assert!(tables.compliance.is_empty());
    assert!(tables.haulage.is_empty());
}

#[tokio::test]
async fn driver_roster_filters_on_availability() {
    let (_dir, db) = open_database().await;

    db.upsert_driver(&DriverRecord::new(
        "drv-1".to_string(),
        "Musa".to_string(),
        Some("+234-800-000-0001".to_string()),
    ))
    .await
    .unwrap();
    db.upsert_driver(&DriverRecord::new(
        "drv-2".to_string(),
        "Chidi".to_string(),
        None,
    ))
    .await
    .unwrap();

    db.set_driver_available("drv-2", false).await.unwrap();

    let all = db.list_drivers().await.unwrap();
    assert_eq!(all.len(), 2);

    let available = db.list_available_drivers().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, "drv-1");
}

#[tokio::test]
async fn drafts_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();

    let wizard_id = {
        let db = Database::new(dir.path()).await.unwrap();
        let manager = BookingWizardManager::new(Arc::new(db.pool().clone()));
        let wizard = manager.start_wizard().await.unwrap();
        manager
            .apply_patch(&wizard.id, DraftPatch::BookingName("Survivor".into()))
            .await
            .unwrap();
        wizard.id
    };

    // Fresh pool over the same file
    let db = Database::new(dir.path()).await.unwrap();
    let manager = BookingWizardManager::new(Arc::new(db.pool().clone()));
    let resumed = manager.get_wizard(&wizard_id).await.unwrap().unwrap();
    assert_eq!(resumed.draft.booking_name, "Survivor");

    let summaries = manager.list_incomplete().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].booking_name, "Survivor");
}
