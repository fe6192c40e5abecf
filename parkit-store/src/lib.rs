pub mod app_config;
pub mod database;
pub mod memory;
pub mod spot_repo;
pub mod ticket_repo;

pub use database::DbClient;
pub use memory::{InMemorySpotRepository, InMemoryTicketRepository};
pub use spot_repo::PgSpotRepository;
pub use ticket_repo::PgTicketRepository;
