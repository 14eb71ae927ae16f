//! Ladle application layer: use cases coordinating the session
//! controller, the authorized executor, and the API transport.

pub mod catalog_usecase;
pub mod state;

pub use catalog_usecase::{CatalogUseCase, RECOMMENDED_COUNT};
pub use state::PersonalizationState;
