//! Library surface for the arena server binary, mirroring the teacher's
//! split between a thin `main.rs` and a `lib.rs` that exposes everything
//! testable.

pub mod ai;
pub mod broadcast;
pub mod combat;
pub mod config;
pub mod entities;
pub mod error;
pub mod lobby;
pub mod network;
pub mod room;
pub mod server;
pub mod users;
