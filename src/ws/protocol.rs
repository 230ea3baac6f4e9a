//! WebSocket protocol message definitions
//! These are the wire types between the duel server and its UI client

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{DuelEvent, DuelSnapshot};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Seat a new duel (resets any running one)
    StartDuel {
        /// Display names in seating order
        names: Vec<String>,
    },

    /// Clear the current duel
    Reset,

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        connection_id: Uuid,
        server_time: u64,
        /// Current duel, if one exists
        snapshot: Option<DuelSnapshot>,
    },

    /// Render state (sent at the snapshot rate)
    Snapshot { snapshot: DuelSnapshot },

    /// Duel lifecycle event
    Event { event: DuelEvent },

    /// Error message
    Error { code: String, message: String },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}
