//! Network layer - REST exchanges with the friends backend
//!
//! The Network actor receives store commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::FriendsClient;
