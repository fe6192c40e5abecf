pub mod input;
pub mod repository;

pub use input::{FixedInput, InputReader};
pub use repository::{SpotRepository, StoreError, TicketRepository};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Input unavailable: {0}")]
    InputError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
