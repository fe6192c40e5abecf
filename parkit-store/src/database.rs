use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;
use parkit_core::StoreError;
use parkit_shared::ParkingSpot;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Insert the provisioned spot pool. Spots that already exist keep their
    /// current availability.
    pub async fn provision_spots(&self, spots: &[ParkingSpot]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for spot in spots {
            sqlx::query(
                r#"
                INSERT INTO parking (parking_number, type, available)
                VALUES ($1, $2, $3)
                ON CONFLICT (parking_number) DO NOTHING
                "#,
            )
            .bind(spot.id as i32)
            .bind(spot.category.as_str())
            .bind(spot.is_available)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Provisioned {} parking spots", spots.len());
        Ok(())
    }
}

pub(crate) fn db_error(err: sqlx::Error) -> StoreError {
    tracing::error!("Database error: {}", err);
    StoreError::Database(err.to_string())
}
