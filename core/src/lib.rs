//! Shared wire protocol, constants and static game data for the arena server.
//!
//! This crate mirrors the role of the teacher's `core` crate: it holds
//! everything that both the simulation and any future client need to agree
//! on byte-for-byte, so it carries no simulation behavior of its own.

pub mod constants;
pub mod hero;
pub mod item;
pub mod map;
pub mod protocol;

pub use constants::*;
