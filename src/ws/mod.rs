//! WebSocket relay for the external UI and audio collaborators

pub mod handler;
pub mod protocol;
