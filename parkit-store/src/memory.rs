use async_trait::async_trait;
use parkit_core::repository::{SpotRepository, StoreError, StoreResult, TicketRepository};
use parkit_shared::{ParkingSpot, Ticket, VehicleCategory};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory spot pool, ordered by spot id
pub struct InMemorySpotRepository {
    spots: RwLock<BTreeMap<u32, ParkingSpot>>,
}

impl InMemorySpotRepository {
    pub fn new(spots: impl IntoIterator<Item = ParkingSpot>) -> Self {
        Self {
            spots: RwLock::new(spots.into_iter().map(|spot| (spot.id, spot)).collect()),
        }
    }

    async fn set_available(&self, spot_id: u32, available: bool) -> StoreResult<()> {
        let mut spots = self.spots.write().await;
        let spot = spots.get_mut(&spot_id).ok_or(StoreError::SpotNotFound(spot_id))?;
        spot.is_available = available;
        debug!("Spot {} availability set to {}", spot_id, available);
        Ok(())
    }
}

#[async_trait]
impl SpotRepository for InMemorySpotRepository {
    async fn next_available(&self, category: VehicleCategory) -> StoreResult<Option<u32>> {
        let spots = self.spots.read().await;
        Ok(spots
            .values()
            .find(|spot| spot.category == category && spot.is_available)
            .map(|spot| spot.id))
    }

    async fn get_spot(&self, spot_id: u32) -> StoreResult<Option<ParkingSpot>> {
        Ok(self.spots.read().await.get(&spot_id).cloned())
    }

    async fn allocate(&self, spot_id: u32) -> StoreResult<()> {
        self.set_available(spot_id, false).await
    }

    async fn release(&self, spot_id: u32) -> StoreResult<()> {
        self.set_available(spot_id, true).await
    }

    async fn list_spots(&self) -> StoreResult<Vec<ParkingSpot>> {
        Ok(self.spots.read().await.values().cloned().collect())
    }
}

/// In-memory ticket history, in insertion order
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: RwLock<Vec<Ticket>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn save_ticket(&self, ticket: &Ticket) -> StoreResult<()> {
        self.tickets.write().await.push(ticket.clone());
        Ok(())
    }

    async fn get_open_ticket(&self, vehicle_id: &str) -> StoreResult<Option<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .iter()
            .rev()
            .find(|t| t.vehicle_registration_id == vehicle_id && t.is_open())
            .cloned())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> StoreResult<bool> {
        let mut tickets = self.tickets.write().await;
        match tickets.iter_mut().find(|t| t.id == ticket.id && t.is_open()) {
            Some(stored) => {
                stored.out_time = ticket.out_time;
                stored.price = ticket.price;
                stored.discount_applied = ticket.discount_applied;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_prior_tickets(&self, vehicle_id: &str) -> StoreResult<u32> {
        let tickets = self.tickets.read().await;
        let count = tickets
            .iter()
            .filter(|t| t.vehicle_registration_id == vehicle_id && !t.is_open())
            .count();
        Ok(count as u32)
    }

    async fn list_tickets(&self, vehicle_id: &str) -> StoreResult<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .iter()
            .filter(|t| t.vehicle_registration_id == vehicle_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn pool() -> InMemorySpotRepository {
        InMemorySpotRepository::new(vec![
            ParkingSpot::new(2, VehicleCategory::Car, true),
            ParkingSpot::new(1, VehicleCategory::Car, true),
            ParkingSpot::new(3, VehicleCategory::Bike, true),
        ])
    }

    #[tokio::test]
    async fn test_next_available_is_lowest_id() {
        let repo = pool();
        assert_eq!(repo.next_available(VehicleCategory::Car).await.unwrap(), Some(1));

        repo.allocate(1).await.unwrap();
        assert_eq!(repo.next_available(VehicleCategory::Car).await.unwrap(), Some(2));

        repo.allocate(2).await.unwrap();
        assert_eq!(repo.next_available(VehicleCategory::Car).await.unwrap(), None);
        assert_eq!(repo.next_available(VehicleCategory::Bike).await.unwrap(), Some(3));

        repo.release(1).await.unwrap();
        assert_eq!(repo.next_available(VehicleCategory::Car).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_spot() {
        let repo = pool();
        assert!(matches!(repo.allocate(42).await, Err(StoreError::SpotNotFound(42))));
        assert!(matches!(repo.release(42).await, Err(StoreError::SpotNotFound(42))));
        assert!(repo.get_spot(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ticket_history() {
        let repo = InMemoryTicketRepository::new();
        let spot = ParkingSpot::new(1, VehicleCategory::Car, false);
        let in_time = Utc::now() - Duration::hours(2);

        let mut first = Ticket::new("ABCDEF".to_string(), spot.clone(), in_time);
        repo.save_ticket(&first).await.unwrap();
        assert_eq!(repo.count_prior_tickets("ABCDEF").await.unwrap(), 0);
        assert_eq!(repo.get_open_ticket("ABCDEF").await.unwrap(), Some(first.clone()));

        first.out_time = Some(in_time + Duration::hours(1));
        first.price = 1.5;
        assert!(repo.update_ticket(&first).await.unwrap());
        assert!(repo.get_open_ticket("ABCDEF").await.unwrap().is_none());
        assert_eq!(repo.count_prior_tickets("ABCDEF").await.unwrap(), 1);

        // A closed ticket is never updated again
        assert!(!repo.update_ticket(&first).await.unwrap());

        let second = Ticket::new("ABCDEF".to_string(), spot, Utc::now());
        repo.save_ticket(&second).await.unwrap();
        assert_eq!(repo.count_prior_tickets("ABCDEF").await.unwrap(), 1);
        assert_eq!(repo.get_open_ticket("ABCDEF").await.unwrap().map(|t| t.id), Some(second.id));

        let history = repo.list_tickets("ABCDEF").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id);
        // Closing a ticket does not rewrite the spot it recorded at entry
        assert!(!history[0].spot.is_available);
        assert!(repo.list_tickets("OTHER").await.unwrap().is_empty());
    }
}
