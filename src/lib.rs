//! Circle Duel Server - authoritative elimination duel
//!
//! The library holds the duel core and the thin HTTP/WebSocket relay:
//! - `game`: participants, round engine, animation clock, orchestrator
//! - `http` / `ws`: control and spectator surface for the UI client
//! - `config`: environment configuration

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;
