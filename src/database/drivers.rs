//! Driver roster database operations

use super::models::DriverRecord;
use super::Database;

/// Extension trait for driver-roster database operations
pub trait DriverOps {
    fn list_drivers(&self) -> impl std::future::Future<Output = Result<Vec<DriverRecord>, sqlx::Error>> + Send;
    fn list_available_drivers(&self) -> impl std::future::Future<Output = Result<Vec<DriverRecord>, sqlx::Error>> + Send;
    fn get_driver(&self, id: &str) -> impl std::future::Future<Output = Result<Option<DriverRecord>, sqlx::Error>> + Send;
    fn upsert_driver(&self, driver: &DriverRecord) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn set_driver_available(&self, id: &str, available: bool) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn delete_driver(&self, id: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
}

impl DriverOps for Database {
    async fn list_drivers(&self) -> Result<Vec<DriverRecord>, sqlx::Error> {
        sqlx::query_as::<_, DriverRecord>("SELECT * FROM drivers ORDER BY name")
            .fetch_all(self.pool())
            .await
    }

    async fn list_available_drivers(&self) -> Result<Vec<DriverRecord>, sqlx::Error> {
        sqlx::query_as::<_, DriverRecord>(
            "SELECT * FROM drivers WHERE available = 1 ORDER BY name",
        )
        .fetch_all(self.pool())
        .await
    }

    async fn get_driver(&self, id: &str) -> Result<Option<DriverRecord>, sqlx::Error> {
        sqlx::query_as::<_, DriverRecord>("SELECT * FROM drivers WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    async fn upsert_driver(&self, driver: &DriverRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO drivers (id, name, phone, available, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&driver.id)
        .bind(&driver.name)
        .bind(&driver.phone)
        .bind(driver.available)
        .bind(&driver.created_at)
        .bind(&driver.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn set_driver_available(&self, id: &str, available: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE drivers SET available = ?, updated_at = ? WHERE id = ?")
            .bind(available as i32)
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn delete_driver(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
