//! Session domain module.
//!
//! Owns the in-memory identity (logged-in user or anonymous) and the
//! token lifecycle around it.
//!
//! # Module Structure
//!
//! - `model`: the session model (`Session`)
//! - `store`: persistence seam for tokens (`TokenStore`)
//! - `navigator`: navigation seam surfaced to the view layer
//! - `controller`: the session state machine (`SessionController`)

mod controller;
mod model;
mod navigator;
mod store;

pub use controller::{LogoutHook, SessionController};
pub use model::Session;
pub use navigator::{Navigator, NoopNavigator};
pub use store::TokenStore;
