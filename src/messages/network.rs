//! Network messages - communication between App and Network layers

use crate::models::{Friend, NewFriend};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the whole friends collection
    LoadFriends { id: u64 },
    /// Create a friend from a candidate record
    CreateFriend { id: u64, friend: NewFriend },
    /// Replace a friend's balance
    UpdateBalance {
        id: u64,
        friend_id: String,
        balance: f64,
    },
    /// Delete a friend
    DeleteFriend { id: u64, friend_id: String },

    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    /// Request id, `None` for [`NetworkCommand::Shutdown`]
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::LoadFriends { id } => Some(*id),
            NetworkCommand::CreateFriend { id, .. } => Some(*id),
            NetworkCommand::UpdateBalance { id, .. } => Some(*id),
            NetworkCommand::DeleteFriend { id, .. } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            NetworkCommand::LoadFriends { .. } => Some(Operation::Load),
            NetworkCommand::CreateFriend { .. } => Some(Operation::Add),
            NetworkCommand::UpdateBalance { .. } => Some(Operation::Split),
            NetworkCommand::DeleteFriend { .. } => Some(Operation::Delete),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// The four store exchanges
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Load,
    Add,
    Split,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Load => "load friends",
            Operation::Add => "add friend",
            Operation::Split => "split bill",
            Operation::Delete => "delete friend",
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Full collection fetched
    FriendsLoaded { id: u64, friends: Vec<Friend> },
    /// Record created by the store
    FriendCreated { id: u64, friend: Friend },
    /// Record after a balance update
    FriendUpdated { id: u64, friend: Friend },
    /// Record deleted
    FriendDeleted { id: u64, friend_id: String },
    /// Exchange failed
    Error {
        id: u64,
        operation: Operation,
        reason: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::FriendsLoaded { id, .. } => *id,
            NetworkResponse::FriendCreated { id, .. } => *id,
            NetworkResponse::FriendUpdated { id, .. } => *id,
            NetworkResponse::FriendDeleted { id, .. } => *id,
            NetworkResponse::Error { id, .. } => *id,
        }
    }
}
