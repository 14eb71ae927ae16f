//! Ladle infrastructure: persistence implementations for the trait
//! seams defined in `ladle-core`.

pub mod paths;
pub mod token_store;

pub use paths::LadlePaths;
pub use token_store::FileTokenStore;
