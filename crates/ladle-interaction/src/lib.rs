//! Ladle interaction: HTTP implementations of the `ladle-core`
//! transport traits.

pub mod http_api;

pub use http_api::HttpRecipeApi;
