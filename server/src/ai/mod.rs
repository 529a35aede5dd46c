//! Non-player state machines (spec §4.4-§4.6), split into one file per
//! entity family the way `game_room.h` splits `update_towers` /
//! `update_minions` / `update_jungle` into distinct private methods.

pub mod jungle;
pub mod minion;
pub mod tower;
