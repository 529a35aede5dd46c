//! Room registry and matchmaking queue (spec §4.8), grounded on
//! `room_manager.h`'s `RoomManager`: a room-id -> room map, an fd/username
//! -> room_id map, and a FIFO match queue drained once per tick by
//! `process_matching`.

use std::collections::HashMap;

use arena_core::constants::MATCH_QUEUE_SIZE;
use arena_core::constants::MATCH_QUEUE_TIMEOUT_SECONDS;

use crate::room::Room;

struct MatchEntry {
    username: String,
    join_time: f64,
}

/// Owns every room and the matchmaking queue feeding them. A connection's
/// room membership is looked up by username rather than by socket fd,
/// since reconnect (spec §4.10) must be able to re-seat a player whose old
/// fd is already gone.
pub struct Lobby {
    rooms: HashMap<u32, Room>,
    next_room_id: u32,
    player_room: HashMap<String, u32>,
    match_queue: Vec<MatchEntry>,
    rng_seed: u64,
}

impl Lobby {
    pub fn new(rng_seed: u64) -> Self {
        Lobby {
            rooms: HashMap::new(),
            next_room_id: 1,
            player_room: HashMap::new(),
            match_queue: Vec::new(),
            rng_seed,
        }
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: u32) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn room_of(&self, username: &str) -> Option<u32> {
        self.player_room.get(username).copied()
    }

    pub fn list_rooms(&self) -> Vec<(u32, usize)> {
        self.rooms.iter().map(|(id, r)| (*id, r.seated_count())).collect()
    }

    pub fn create_room(&mut self, username: &str) -> u32 {
        let id = self.next_room_id;
        self.next_room_id += 1;
        self.rng_seed = self.rng_seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mut room = Room::new(id, self.rng_seed);
        room.add_player(username).expect("fresh room always has a free slot");
        self.rooms.insert(id, room);
        self.player_room.insert(username.to_string(), id);
        id
    }

    pub fn join_room(&mut self, username: &str, room_id: u32) -> bool {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return false;
        };
        if room.add_player(username).is_err() {
            return false;
        }
        self.player_room.insert(username.to_string(), room_id);
        true
    }

    /// Drops `username` from the match queue and from whichever room seats
    /// them, if any — the full cancellation sequence a dropped connection
    /// must run before its fd is forgotten (spec §5 "Cancellation and
    /// timeouts", scenario S7).
    pub fn leave_room(&mut self, username: &str) {
        self.match_queue.retain(|e| e.username != username);

        let Some(room_id) = self.player_room.remove(username) else {
            return;
        };
        if let Some(room) = self.rooms.get_mut(&room_id) {
            if let Some(slot) = room.slots.iter().position(|s| s.owner_name.as_deref() == Some(username)) {
                room.remove_slot(slot);
            }
            if room.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
    }

    pub fn enqueue_for_match(&mut self, username: &str, now: f64) {
        if self.match_queue.iter().any(|e| e.username == username) {
            return;
        }
        self.match_queue.push(MatchEntry {
            username: username.to_string(),
            join_time: now,
        });
    }

    /// Pops players off the front of the queue into a fresh room once ten
    /// are waiting, or once the oldest entry has waited past the timeout
    /// (spec §4.8's "best-effort fill" rule, matching `process_matching`).
    pub fn process_matching(&mut self, now: f64) {
        if self.match_queue.is_empty() {
            return;
        }
        let oldest_wait = now - self.match_queue[0].join_time;
        let ready = self.match_queue.len() >= MATCH_QUEUE_SIZE || oldest_wait >= MATCH_QUEUE_TIMEOUT_SECONDS;
        if !ready {
            return;
        }

        let take = self.match_queue.len().min(MATCH_QUEUE_SIZE);
        let batch: Vec<MatchEntry> = self.match_queue.drain(..take).collect();
        if batch.is_empty() {
            return;
        }

        let mut names = batch.into_iter();
        let first = names.next().unwrap();
        let room_id = self.create_room(&first.username);
        for entry in names {
            self.join_room(&entry.username, room_id);
        }

        // Matchmade rooms skip the owner-starts-manually flow and go
        // straight to picking (spec §4.8 "pushed directly into picking").
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.start_picking(0).expect("freshly matched room is always Waiting");
        }
    }

    pub fn tick_all(&mut self, now: f64, dt: f64) -> Vec<(u32, crate::broadcast::Frame)> {
        self.process_matching(now);
        let mut frames = Vec::new();
        for (id, room) in self.rooms.iter_mut() {
            if let Some(frame) = room.tick(now, dt) {
                frames.push((*id, frame));
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_queue_fires_at_ten_players() {
        let mut lobby = Lobby::new(1);
        for i in 0..9 {
            lobby.enqueue_for_match(&format!("p{i}"), 0.0);
        }
        lobby.process_matching(0.0);
        assert!(lobby.rooms.is_empty());
        lobby.enqueue_for_match("p9", 0.0);
        lobby.process_matching(0.0);
        assert_eq!(lobby.rooms.len(), 1);
    }

    #[test]
    fn match_queue_fires_on_timeout_with_partial_group() {
        let mut lobby = Lobby::new(1);
        lobby.enqueue_for_match("solo", 0.0);
        lobby.process_matching(1.0);
        assert!(lobby.rooms.is_empty());
        lobby.process_matching(MATCH_QUEUE_TIMEOUT_SECONDS + 0.1);
        assert_eq!(lobby.rooms.len(), 1);
    }

    #[test]
    fn leaving_empties_and_drops_room() {
        let mut lobby = Lobby::new(1);
        let id = lobby.create_room("solo");
        lobby.leave_room("solo");
        assert!(lobby.room(id).is_none());
    }

    #[test]
    fn leaving_purges_a_queued_connection() {
        let mut lobby = Lobby::new(1);
        lobby.enqueue_for_match("queued", 0.0);
        lobby.leave_room("queued");
        for i in 0..9 {
            lobby.enqueue_for_match(&format!("p{i}"), 0.0);
        }
        lobby.process_matching(0.0);
        // "queued" was purged before the other nine arrived, so ten more
        // are needed to fire the match, not nine.
        assert!(lobby.rooms.is_empty());
    }
}
