use async_trait::async_trait;
use sqlx::PgPool;
use parkit_core::repository::{SpotRepository, StoreError, StoreResult};
use parkit_shared::{ParkingSpot, VehicleCategory};
use crate::database::db_error;

pub struct PgSpotRepository {
    pool: PgPool,
}

impl PgSpotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_available(&self, spot_id: u32, available: bool) -> StoreResult<()> {
        let result = sqlx::query("UPDATE parking SET available = $1 WHERE parking_number = $2")
            .bind(available)
            .bind(spot_id as i32)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::SpotNotFound(spot_id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SpotRow {
    parking_number: i32,
    #[sqlx(rename = "type")]
    spot_type: String,
    available: bool,
}

impl TryFrom<SpotRow> for ParkingSpot {
    type Error = StoreError;

    fn try_from(row: SpotRow) -> Result<Self, Self::Error> {
        let category = row
            .spot_type
            .parse::<VehicleCategory>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(ParkingSpot::new(row.parking_number as u32, category, row.available))
    }
}

#[async_trait]
impl SpotRepository for PgSpotRepository {
    async fn next_available(&self, category: VehicleCategory) -> StoreResult<Option<u32>> {
        let id: Option<i32> = sqlx::query_scalar(
            "SELECT MIN(parking_number) FROM parking WHERE available = TRUE AND type = $1",
        )
        .bind(category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(id.map(|id| id as u32))
    }

    async fn get_spot(&self, spot_id: u32) -> StoreResult<Option<ParkingSpot>> {
        let row = sqlx::query_as::<_, SpotRow>(
            "SELECT parking_number, type, available FROM parking WHERE parking_number = $1",
        )
        .bind(spot_id as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ParkingSpot::try_from).transpose()
    }

    async fn allocate(&self, spot_id: u32) -> StoreResult<()> {
        self.set_available(spot_id, false).await
    }

    async fn release(&self, spot_id: u32) -> StoreResult<()> {
        self.set_available(spot_id, true).await
    }

    async fn list_spots(&self) -> StoreResult<Vec<ParkingSpot>> {
        let rows = sqlx::query_as::<_, SpotRow>(
            "SELECT parking_number, type, available FROM parking ORDER BY parking_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ParkingSpot::try_from).collect()
    }
}
