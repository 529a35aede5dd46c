//! Per-tick snapshot assembly (spec §4.9), grounded on `game_room.h`'s
//! `broadcast_world` and the teacher's pattern of batching per-tick output
//! into one buffer per consumer rather than writing socket-by-socket as
//! state changes.
//!
//! The room keeps one `Vec<GamePacket>` alive across ticks and clears it
//! rather than allocating fresh every 40ms; `build_frame` hands callers an
//! owned copy to send so the staging buffer can be reused immediately.

use arena_core::protocol::{GamePacket, Tag};

use arena_core::hero::HeroKind;

use crate::entities::EffectKind;
use crate::room::Room;

fn hero_wire_id(hero: Option<HeroKind>) -> i32 {
    match hero {
        None => 0,
        Some(HeroKind::Warrior) => 1,
        Some(HeroKind::Mage) => 2,
        Some(HeroKind::Tank) => 3,
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub packets: Vec<GamePacket>,
}

impl Frame {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.packets.len() * arena_core::protocol::GAME_PACKET_BYTES);
        for p in &self.packets {
            out.extend_from_slice(&p.encode());
        }
        out
    }
}

fn effect_code(effect: Option<EffectKind>) -> i32 {
    match effect {
        None => 0,
        Some(EffectKind::Warn) => 1,
        Some(EffectKind::Burst) => 2,
        Some(EffectKind::Wave) => 3,
    }
}

pub fn build_frame(room: &mut Room, now: f64) -> Frame {
    room.broadcast_buffer.clear();

    for p in &room.players {
        room.broadcast_buffer.push(GamePacket {
            tag: Tag::PlayerSnapshot as u32,
            id: p.id,
            x: p.x,
            y: p.y,
            input: p.team as i32,
            extra: hero_wire_id(p.hero),
            color: (now <= p.visual_end_time) as i32,
            hp: p.hp,
            max_hp: p.max_hp,
            attack_range: 0,
            effect: effect_code(p.current_effect),
            attack_target_id: p.current_target_id.unwrap_or(0),
            gold: p.gold,
        });
    }

    for t in &room.towers {
        if !t.alive() {
            continue;
        }
        room.broadcast_buffer.push(GamePacket {
            tag: Tag::TowerSnapshot as u32,
            id: t.id,
            x: t.x,
            y: t.y,
            input: t.team as i32,
            extra: t.tier as i32,
            color: (now <= t.visual_end_time) as i32,
            hp: t.hp,
            max_hp: t.max_hp,
            attack_range: 0,
            effect: 0,
            attack_target_id: t.target_id.unwrap_or(0),
            gold: 0,
        });
    }

    for m in &room.minions {
        room.broadcast_buffer.push(GamePacket {
            tag: Tag::MinionSnapshot as u32,
            id: m.id,
            x: m.x.round() as i32,
            y: m.y.round() as i32,
            input: m.team as i32,
            extra: m.kind as i32,
            color: (now <= m.visual_end_time) as i32,
            hp: m.hp,
            max_hp: m.max_hp,
            attack_range: 0,
            effect: 0,
            attack_target_id: m.target_id.unwrap_or(0),
            gold: 0,
        });
    }

    for j in &room.jungle {
        room.broadcast_buffer.push(GamePacket {
            tag: Tag::JungleSnapshot as u32,
            id: j.id,
            x: j.x,
            y: j.y,
            input: 0,
            extra: j.kind as i32,
            color: (now <= j.visual_end_time) as i32,
            hp: j.hp,
            max_hp: j.max_hp,
            attack_range: j.boss_state as i32,
            effect: 0,
            attack_target_id: j.target_id.unwrap_or(0),
            gold: 0,
        });
    }

    for e in &room.effects {
        room.broadcast_buffer.push(GamePacket {
            tag: Tag::EffectSnapshot as u32,
            id: e.originator_id,
            x: e.center.0,
            y: e.center.1,
            input: effect_code(Some(e.kind)),
            extra: 0,
            color: 0,
            hp: 0,
            max_hp: 0,
            attack_range: (e.radius * 100.0) as i32,
            effect: 0,
            attack_target_id: 0,
            gold: 0,
        });
    }

    room.broadcast_buffer.push(GamePacket {
        tag: Tag::FrameMarker as u32,
        id: room.room_id as i32,
        x: 0,
        y: 0,
        input: 0,
        extra: now as i32,
        color: 0,
        hp: 0,
        max_hp: 0,
        attack_range: 0,
        effect: 0,
        attack_target_id: 0,
        gold: 0,
    });

    Frame {
        packets: room.broadcast_buffer.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::protocol::Tag;

    #[test]
    fn frame_always_ends_with_marker() {
        let mut room = Room::new(1, 9);
        room.add_player("a").unwrap();
        room.add_player("b").unwrap();
        room.start_picking(0).unwrap();
        room.select_hero(0, 1).unwrap();
        room.select_hero(1, 1).unwrap();

        let frame = build_frame(&mut room, 0.0);
        let last = frame.packets.last().unwrap();
        assert_eq!(last.tag, Tag::FrameMarker as u32);
    }

    #[test]
    fn frame_marker_carries_elapsed_game_seconds() {
        let mut room = Room::new(1, 9);
        room.add_player("a").unwrap();
        room.start_picking(0).unwrap();
        room.select_hero(0, 1).unwrap();

        let frame = build_frame(&mut room, 42.0);
        let last = frame.packets.last().unwrap();
        assert_eq!(last.tag, Tag::FrameMarker as u32);
        assert_eq!(last.extra, 42);
    }
}
