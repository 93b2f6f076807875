//! Submitted booking database operations
//!
//! Bookings are written by the wizard manager at submission time; this
//! trait covers the read side used by listings.

use super::models::BookingRecord;
use super::Database;

/// Extension trait for submitted-booking database operations
pub trait BookingOps {
    fn list_bookings(&self) -> impl std::future::Future<Output = Result<Vec<BookingRecord>, sqlx::Error>> + Send;
    fn list_bookings_for_driver(&self, driver_id: &str) -> impl std::future::Future<Output = Result<Vec<BookingRecord>, sqlx::Error>> + Send;
    fn get_booking(&self, id: &str) -> impl std::future::Future<Output = Result<Option<BookingRecord>, sqlx::Error>> + Send;
}

impl BookingOps for Database {
    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, sqlx::Error> {
        sqlx::query_as::<_, BookingRecord>(
            "SELECT * FROM bookings ORDER BY submitted_at DESC",
        )
        .fetch_all(self.pool())
        .await
    }

    async fn list_bookings_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        sqlx::query_as::<_, BookingRecord>(
            "SELECT * FROM bookings WHERE driver_id = ? ORDER BY submitted_at DESC",
        )
        .bind(driver_id)
        .fetch_all(self.pool())
        .await
    }

    async fn get_booking(&self, id: &str) -> Result<Option<BookingRecord>, sqlx::Error> {
        sqlx::query_as::<_, BookingRecord>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }
}
