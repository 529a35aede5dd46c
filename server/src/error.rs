//! Error kinds the core distinguishes (spec §7). Protocol errors terminate a
//! connection; everything else is either silently ignored by the caller or
//! surfaced only through absence of the broadcast a client expected.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("command requires being the room owner")]
    NotOwner,
    #[error("command invalid for room phase")]
    WrongPhase,
    #[error("room is full")]
    RoomFull,
}
