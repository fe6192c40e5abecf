use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use parkit_core::{InputReader, SpotRepository, TicketRepository};
use parkit_fare::FareCalculator;
use parkit_service::ParkingService;
use parkit_store::app_config::Config;
use parkit_store::{DbClient, InMemorySpotRepository, InMemoryTicketRepository, PgSpotRepository, PgTicketRepository};

#[derive(Clone)]
pub struct AppState {
    pub spots: Arc<dyn SpotRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub fares: Arc<FareCalculator>,
    /// Held for the whole of an entry or exit so two requests for the same
    /// vehicle can never both close its ticket or release its spot.
    pub workflow_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        spots: Arc<dyn SpotRepository>,
        tickets: Arc<dyn TicketRepository>,
        fares: FareCalculator,
    ) -> Self {
        Self {
            spots,
            tickets,
            fares: Arc::new(fares),
            workflow_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State backed by the in-memory store, with the configured spot pool
    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            Arc::new(InMemorySpotRepository::new(config.facility.provision())),
            Arc::new(InMemoryTicketRepository::new()),
            FareCalculator::new(&config.fare),
        )
    }

    /// PostgreSQL when `database.url` is set, in-memory otherwise
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let Some(url) = config.database.url.as_deref() else {
            info!("No database configured, using in-memory store");
            return Ok(Self::in_memory(config));
        };

        let db = DbClient::new(url).await?;
        db.migrate().await?;
        db.provision_spots(&config.facility.provision()).await?;

        Ok(Self::new(
            Arc::new(PgSpotRepository::new(db.pool.clone())),
            Arc::new(PgTicketRepository::new(db.pool)),
            FareCalculator::new(&config.fare),
        ))
    }

    /// A workflow answering its input questions from `input`
    pub fn parking_service(&self, input: Arc<dyn InputReader>) -> ParkingService {
        ParkingService::new(
            input,
            self.spots.clone(),
            self.tickets.clone(),
            self.fares.clone(),
        )
    }
}
