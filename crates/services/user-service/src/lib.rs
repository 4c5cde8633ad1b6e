//! User Service Library
//!
//! The core of the user directory: an in-memory repository that owns
//! every user record, and the service layer that enforces input rules in
//! front of it. No wire format lives here; the gateway crate maps HTTP
//! requests onto these traits.

pub mod repository;
pub mod service;

pub use repository::{UserRepository, UserStore};
pub use service::{UserManager, UserService};
