//! Rate table database operations
//!
//! The rate tables are reference data maintained by operations staff and
//! replaced wholesale when updated, so the write path is replace-all rather
//! than row-level CRUD.

use super::models::{ComplianceChargeRecord, DemurrageRateRecord, HaulageTariffRecord};
use super::Database;

/// Extension trait for rate-table database operations
pub trait RateOps {
    fn list_demurrage_rates(&self) -> impl std::future::Future<Output = Result<Vec<DemurrageRateRecord>, sqlx::Error>> + Send;
    fn list_compliance_charges(&self) -> impl std::future::Future<Output = Result<Vec<ComplianceChargeRecord>, sqlx::Error>> + Send;
    fn list_haulage_tariffs(&self) -> impl std::future::Future<Output = Result<Vec<HaulageTariffRecord>, sqlx::Error>> + Send;

    fn replace_demurrage_rates(&self, rates: &[DemurrageRateRecord]) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn replace_compliance_charges(&self, charges: &[ComplianceChargeRecord]) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn replace_haulage_tariffs(&self, tariffs: &[HaulageTariffRecord]) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
}

impl RateOps for Database {
    async fn list_demurrage_rates(&self) -> Result<Vec<DemurrageRateRecord>, sqlx::Error> {
        sqlx::query_as::<_, DemurrageRateRecord>(
            "SELECT * FROM demurrage_rates ORDER BY location",
        )
        .fetch_all(self.pool())
        .await
    }

    async fn list_compliance_charges(&self) -> Result<Vec<ComplianceChargeRecord>, sqlx::Error> {
        sqlx::query_as::<_, ComplianceChargeRecord>(
            "SELECT * FROM compliance_charges ORDER BY name",
        )
        .fetch_all(self.pool())
        .await
    }

    async fn list_haulage_tariffs(&self) -> Result<Vec<HaulageTariffRecord>, sqlx::Error> {
        sqlx::query_as::<_, HaulageTariffRecord>(
            "SELECT * FROM haulage_tariffs ORDER BY area_name",
        )
        .fetch_all(self.pool())
        .await
    }

    async fn replace_demurrage_rates(
        &self,
        rates: &[DemurrageRateRecord],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM demurrage_rates")
            .execute(&mut *tx)
            .await?;
        for rate in rates {
            sqlx::query("INSERT INTO demurrage_rates (location, daily_rate) VALUES (?, ?)")
                .bind(&rate.location)
                .bind(rate.daily_rate)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_compliance_charges(
        &self,
        charges: &[ComplianceChargeRecord],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM compliance_charges")
            .execute(&mut *tx)
            .await?;
        for charge in charges {
            sqlx::query("INSERT INTO compliance_charges (id, name, price) VALUES (?, ?, ?)")
                .bind(&charge.id)
                .bind(&charge.name)
                .bind(charge.price)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_haulage_tariffs(
        &self,
        tariffs: &[HaulageTariffRecord],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM haulage_tariffs")
            .execute(&mut *tx)
            .await?;
        for tariff in tariffs {
            sqlx::query("INSERT INTO haulage_tariffs (area_name, grand_total) VALUES (?, ?)")
                .bind(&tariff.area_name)
                .bind(tariff.grand_total)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
