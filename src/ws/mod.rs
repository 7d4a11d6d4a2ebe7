//! The multiplayer socket: wire protocol, per-connection session and the
//! axum upgrade handler.

pub mod connection;
pub mod protocol;
pub mod session;
