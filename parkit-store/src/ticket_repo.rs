use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use parkit_core::repository::{StoreError, StoreResult, TicketRepository};
use parkit_shared::{ParkingSpot, Ticket, VehicleCategory};
use crate::database::db_error;

const TICKET_COLUMNS: &str = r#"
    SELECT t.id, t.parking_number, t.vehicle_reg_number, t.price, t.in_time, t.out_time,
           t.discount, p.type AS spot_type
    FROM ticket t
    JOIN parking p ON p.parking_number = t.parking_number
"#;

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    parking_number: i32,
    vehicle_reg_number: String,
    price: f64,
    in_time: DateTime<Utc>,
    out_time: Option<DateTime<Utc>>,
    discount: bool,
    spot_type: String,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = StoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let category = row
            .spot_type
            .parse::<VehicleCategory>()
            .map_err(|e| StoreError::Corrupt(format!("ticket {}: {}", row.id, e)))?;

        Ok(Ticket {
            id: row.id,
            vehicle_registration_id: row.vehicle_reg_number,
            // The spot as it was recorded at entry: allocated to this visit
            spot: ParkingSpot::new(row.parking_number as u32, category, false),
            in_time: row.in_time,
            out_time: row.out_time,
            price: row.price,
            discount_applied: row.discount,
        })
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn save_ticket(&self, ticket: &Ticket) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ticket (id, parking_number, vehicle_reg_number, price, in_time, out_time, discount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.spot.id as i32)
        .bind(&ticket.vehicle_registration_id)
        .bind(ticket.price)
        .bind(ticket.in_time)
        .bind(ticket.out_time)
        .bind(ticket.discount_applied)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_open_ticket(&self, vehicle_id: &str) -> StoreResult<Option<Ticket>> {
        let query = format!(
            "{} WHERE t.vehicle_reg_number = $1 AND t.out_time IS NULL ORDER BY t.in_time DESC LIMIT 1",
            TICKET_COLUMNS
        );
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(Ticket::try_from).transpose()
    }

    async fn update_ticket(&self, ticket: &Ticket) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE ticket SET price = $1, out_time = $2, discount = $3
            WHERE id = $4 AND out_time IS NULL
            "#,
        )
        .bind(ticket.price)
        .bind(ticket.out_time)
        .bind(ticket.discount_applied)
        .bind(ticket.id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_prior_tickets(&self, vehicle_id: &str) -> StoreResult<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ticket WHERE vehicle_reg_number = $1 AND out_time IS NOT NULL",
        )
        .bind(vehicle_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(count as u32)
    }

    async fn list_tickets(&self, vehicle_id: &str) -> StoreResult<Vec<Ticket>> {
        let query = format!(
            "{} WHERE t.vehicle_reg_number = $1 ORDER BY t.in_time ASC",
            TICKET_COLUMNS
        );
        let rows = sqlx::query_as::<_, TicketRow>(&query)
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(Ticket::try_from).collect()
    }
}
