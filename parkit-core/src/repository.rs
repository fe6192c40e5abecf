use async_trait::async_trait;
use parkit_shared::{ParkingSpot, Ticket, VehicleCategory};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Parking spot not found: {0}")]
    SpotNotFound(u32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for the facility's spot pool
#[async_trait]
pub trait SpotRepository: Send + Sync {
    /// Lowest-numbered available spot of the category, or `None` when the
    /// category is full. Does not change availability.
    async fn next_available(&self, category: VehicleCategory) -> StoreResult<Option<u32>>;

    /// Look up a single spot by id
    async fn get_spot(&self, spot_id: u32) -> StoreResult<Option<ParkingSpot>>;

    /// Mark a spot unavailable
    async fn allocate(&self, spot_id: u32) -> StoreResult<()>;

    /// Mark a spot available again
    async fn release(&self, spot_id: u32) -> StoreResult<()>;

    async fn list_spots(&self) -> StoreResult<Vec<ParkingSpot>>;
}

/// Repository trait for ticket history, keyed by vehicle registration
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn save_ticket(&self, ticket: &Ticket) -> StoreResult<()>;

    /// The ticket of the vehicle's current visit, if it is parked
    async fn get_open_ticket(&self, vehicle_id: &str) -> StoreResult<Option<Ticket>>;

    /// Persist exit time, price and discount of an open ticket.
    /// Returns `false` when no open ticket matched.
    async fn update_ticket(&self, ticket: &Ticket) -> StoreResult<bool>;

    /// Number of completed visits recorded for the vehicle
    async fn count_prior_tickets(&self, vehicle_id: &str) -> StoreResult<u32>;

    /// Full history for the vehicle, oldest first
    async fn list_tickets(&self, vehicle_id: &str) -> StoreResult<Vec<Ticket>>;
}
