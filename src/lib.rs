//! # Splitmon
//!
//! A terminal client for splitting bills with friends. It mirrors a
//! friends collection held by a REST backend, and records bill splits as
//! balance updates.
//!
//! ## Features
//! - Friends roster with who-owes-whom balances
//! - Add and delete friends
//! - Split a bill with the selected friend
//! - Failures reported in the status bar, roster left untouched
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (roster, selection and forms)
//! - Network Layer (Tokio runtime, reqwest)

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{BillSplit, Friend, NewFriend, Payer};
pub use error::StoreError;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, Operation, RenderState};
pub use app::{AppState, AppActor};
pub use network::{FriendsClient, NetworkActor};
