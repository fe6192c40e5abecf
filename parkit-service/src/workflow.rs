use chrono::{DateTime, Utc};
use parkit_core::{CoreError, InputReader, SpotRepository, StoreError, TicketRepository};
use parkit_fare::{FareCalculator, FareError};
use parkit_shared::{ParkingSpot, Ticket, VehicleCategory, MAX_REGISTRATION_LEN};
use std::sync::Arc;
use tracing::{info, warn};

/// Vehicle entry and exit for one facility.
///
/// Collaborators are injected at construction; the service keeps no state of
/// its own between operations.
pub struct ParkingService {
    input: Arc<dyn InputReader>,
    spots: Arc<dyn SpotRepository>,
    tickets: Arc<dyn TicketRepository>,
    fares: Arc<FareCalculator>,
}

impl ParkingService {
    pub fn new(
        input: Arc<dyn InputReader>,
        spots: Arc<dyn SpotRepository>,
        tickets: Arc<dyn TicketRepository>,
        fares: Arc<FareCalculator>,
    ) -> Self {
        Self {
            input,
            spots,
            tickets,
            fares,
        }
    }

    /// Resolve the spot a vehicle of the selected category would get, without
    /// allocating it. `None` when the category is full.
    pub async fn next_parking_spot_if_available(&self) -> Result<Option<ParkingSpot>, ParkingError> {
        let category = self.read_category()?;
        self.find_spot(category).await
    }

    pub async fn process_incoming_vehicle(&self) -> Result<Option<Ticket>, ParkingError> {
        self.process_incoming_vehicle_at(Utc::now()).await
    }

    /// Park a vehicle: allocate the next free spot of its category and open a
    /// ticket at `now`. Returns `Ok(None)` when the facility is full for that
    /// category.
    ///
    /// If the ticket cannot be saved the spot stays allocated.
    pub async fn process_incoming_vehicle_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<Ticket>, ParkingError> {
        // Both inputs are validated before the pool is touched
        let category = self.read_category()?;
        let registration = self.read_registration()?;
        let Some(mut spot) = self.find_spot(category).await? else {
            return Ok(None);
        };

        self.spots.allocate(spot.id).await?;
        spot.is_available = false;

        let ticket = Ticket::new(registration, spot, now);
        self.tickets.save_ticket(&ticket).await?;

        info!(
            "Generated ticket {} for vehicle {}: spot {} ({}) at {}",
            ticket.id, ticket.vehicle_registration_id, ticket.spot.id, category, ticket.in_time
        );
        Ok(Some(ticket))
    }

    pub async fn process_exiting_vehicle(&self) -> Result<Ticket, ParkingError> {
        self.process_exiting_vehicle_at(Utc::now()).await
    }

    /// Close the vehicle's open ticket at `now`, price it and free its spot.
    /// The spot is only released once the ticket update has been accepted.
    pub async fn process_exiting_vehicle_at(&self, now: DateTime<Utc>) -> Result<Ticket, ParkingError> {
        let registration = self.read_registration()?;

        let mut ticket = match self.tickets.get_open_ticket(&registration).await? {
            Some(ticket) => ticket,
            None => {
                warn!("No open ticket for vehicle {}", registration);
                return Err(ParkingError::TicketNotFound(registration));
            }
        };

        self.apply_recurring_discount(&mut ticket).await?;
        ticket.out_time = Some(now);
        ticket.price = self.fares.price_ticket(&ticket)?;

        if !self.tickets.update_ticket(&ticket).await? {
            warn!("Unable to update ticket information for vehicle {}", registration);
            return Err(ParkingError::TicketNotUpdated(registration));
        }

        self.spots.release(ticket.spot.id).await?;
        ticket.spot.is_available = true;

        info!(
            "Vehicle {} left spot {}: fare {:.2} (discount: {})",
            registration, ticket.spot.id, ticket.price, ticket.discount_applied
        );
        Ok(ticket)
    }

    /// Flag the ticket for the recurring-user discount when the vehicle has at
    /// least one completed visit. The open visit itself is not counted.
    pub async fn apply_recurring_discount(&self, ticket: &mut Ticket) -> Result<bool, ParkingError> {
        let prior = self
            .tickets
            .count_prior_tickets(&ticket.vehicle_registration_id)
            .await?;
        ticket.discount_applied = prior > 0;
        Ok(ticket.discount_applied)
    }

    fn read_category(&self) -> Result<VehicleCategory, ParkingError> {
        let selection = self.input.read_selection()?;
        VehicleCategory::from_selection(selection).ok_or_else(|| {
            warn!("Incorrect vehicle type selection: {}", selection);
            ParkingError::InvalidSelection(selection)
        })
    }

    fn read_registration(&self) -> Result<String, ParkingError> {
        let registration = self.input.read_vehicle_registration()?;
        let registration = registration.trim();
        if registration.is_empty() || registration.chars().count() > MAX_REGISTRATION_LEN {
            warn!("Rejected vehicle registration of {} characters", registration.chars().count());
            return Err(ParkingError::InvalidRegistration);
        }
        Ok(registration.to_string())
    }

    async fn find_spot(&self, category: VehicleCategory) -> Result<Option<ParkingSpot>, ParkingError> {
        match self.spots.next_available(category).await? {
            Some(id) => Ok(Some(ParkingSpot::new(id, category, true))),
            None => {
                info!("No {} spot available, parking slots might be full", category);
                Ok(None)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParkingError {
    #[error("Incorrect vehicle type selection: {0}")]
    InvalidSelection(i32),

    #[error("Invalid vehicle registration number")]
    InvalidRegistration,

    #[error("No open ticket for vehicle {0}")]
    TicketNotFound(String),

    #[error("Unable to update ticket information for vehicle {0}")]
    TicketNotUpdated(String),

    #[error(transparent)]
    Fare(#[from] FareError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Input(#[from] CoreError),
}
