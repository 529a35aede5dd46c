//! Tower targeting and damage (spec §4.4), grounded on `game_room.h`'s
//! `update_towers` and the aggression window it layers on top of plain
//! range checks.

use arena_core::constants::*;

use crate::room::Room;

fn dist_sq(ax: i32, ay: i32, bx: i32, by: i32) -> f32 {
    let dx = (ax - bx) as f32;
    let dy = (ay - by) as f32;
    dx * dx + dy * dy
}

impl Room {
    pub fn update_towers(&mut self, now: f64) {
        let range_sq = TOWER_ATTACK_RANGE * TOWER_ATTACK_RANGE;

        for ti in 0..self.towers.len() {
            if !self.towers[ti].alive() {
                continue;
            }
            let (tx, ty, team) = (self.towers[ti].x, self.towers[ti].y, self.towers[ti].team);

            // Priority 1: threat override — any enemy player that has
            // attacked recently, in range.
            let threat_player = self
                .players
                .iter()
                .filter(|p| p.is_playing && p.hp > 0 && p.team != team && p.is_aggressive(now))
                .filter(|p| dist_sq(p.x, p.y, tx, ty) <= range_sq)
                .min_by(|a, b| {
                    dist_sq(a.x, a.y, tx, ty)
                        .partial_cmp(&dist_sq(b.x, b.y, tx, ty))
                        .unwrap()
                })
                .map(|p| p.id);

            // Priority 2: sticky — keep the current target while it is
            // still alive and in range.
            let sticky = self.towers[ti].target_id.filter(|&id| self.target_still_valid(id, team, tx, ty, range_sq));

            // Priority 3: nearest enemy minion in range.
            let nearest_minion = self
                .minions
                .iter()
                .filter(|m| m.alive() && m.team != team)
                .filter(|m| dist_sq(m.x as i32, m.y as i32, tx, ty) <= range_sq)
                .min_by(|a, b| {
                    dist_sq(a.x as i32, a.y as i32, tx, ty)
                        .partial_cmp(&dist_sq(b.x as i32, b.y as i32, tx, ty))
                        .unwrap()
                })
                .map(|m| m.id);

            // Priority 4: nearest enemy player in range, aggressive or not.
            let nearest_player = self
                .players
                .iter()
                .filter(|p| p.is_playing && p.hp > 0 && p.team != team)
                .filter(|p| dist_sq(p.x, p.y, tx, ty) <= range_sq)
                .min_by(|a, b| {
                    dist_sq(a.x, a.y, tx, ty)
                        .partial_cmp(&dist_sq(b.x, b.y, tx, ty))
                        .unwrap()
                })
                .map(|p| p.id);

            let chosen = threat_player.or(sticky).or(nearest_minion).or(nearest_player);
            let target_is_player = chosen.map(|id| self.players.iter().any(|p| p.id == id)).unwrap_or(false);

            let tower = &mut self.towers[ti];
            if chosen != tower.target_id {
                tower.consecutive_hits = 0;
            }
            tower.target_id = chosen;

            let Some(target_id) = chosen else { continue };
            if now - tower.last_attack_time < TOWER_COOLDOWN_TICKS_SECONDS {
                continue;
            }

            let raw_damage = if target_is_player {
                let ramp = tower.consecutive_hits.min(TOWER_DAMAGE_RAMP_MAX_HITS);
                TOWER_BASE_DAMAGE * 2i32.pow(ramp)
            } else {
                TOWER_BASE_DAMAGE + TOWER_MINION_DAMAGE_PER_WAVE * self.wave_count as i32
            };

            tower.last_attack_time = now;
            tower.visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            tower.consecutive_hits += 1;

            let damage = if target_is_player {
                let def = self
                    .players
                    .iter()
                    .find(|p| p.id == target_id)
                    .map(|p| crate::combat::derived_stats(p).def)
                    .unwrap_or(0);
                (raw_damage - def).max(1)
            } else {
                raw_damage
            };

            self.resolve_tower_hit(target_id, damage, now);
        }
    }

    fn target_still_valid(&self, id: i32, attacker_team: u8, tx: i32, ty: i32, range_sq: f32) -> bool {
        if let Some(p) = self.players.iter().find(|p| p.id == id) {
            return p.is_playing && p.hp > 0 && p.team != attacker_team && dist_sq(p.x, p.y, tx, ty) <= range_sq;
        }
        if let Some(m) = self.minions.iter().find(|m| m.id == id) {
            return m.alive() && m.team != attacker_team && dist_sq(m.x as i32, m.y as i32, tx, ty) <= range_sq;
        }
        false
    }

    fn resolve_tower_hit(&mut self, target_id: i32, damage: i32, now: f64) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == target_id) {
            p.hp -= damage;
            p.visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            if p.hp <= 0 {
                crate::combat::respawn(p);
            }
            return;
        }
        if let Some(idx) = self.minions.iter().position(|m| m.id == target_id) {
            self.minions[idx].hp -= damage;
            self.minions[idx].visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            if !self.minions[idx].alive() {
                self.minions.remove(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::room::Room;

    fn playing_room() -> Room {
        let mut room = Room::new(1, 7);
        room.add_player("a").unwrap();
        room.add_player("b").unwrap();
        room.start_picking(0).unwrap();
        room.select_hero(0, 1).unwrap();
        room.select_hero(1, 1).unwrap();
        room
    }

    #[test]
    fn tower_damage_ramps_on_consecutive_hits() {
        let mut room = playing_room();
        let tower_id = room.towers[0].id;
        let (tx, ty) = (room.towers[0].x, room.towers[0].y);
        let pid = room.slots[1].player_id.unwrap();
        let team = if room.towers[0].team == 1 { 2 } else { 1 };
        {
            let p = room.player_mut(pid).unwrap();
            p.team = team;
            p.x = tx;
            p.y = ty;
            p.hp = 1_000_000;
            p.max_hp = 1_000_000;
        }
        room.update_towers(0.0);
        let after_first = room.towers.iter().find(|t| t.id == tower_id).unwrap().consecutive_hits;
        room.update_towers(10.0);
        let after_second = room.towers.iter().find(|t| t.id == tower_id).unwrap().consecutive_hits;
        assert_eq!(after_first, 1);
        assert_eq!(after_second, 2);
    }

    #[test]
    fn tower_damage_doubles_each_consecutive_hit_on_a_player() {
        let mut room = playing_room();
        let (tx, ty) = (room.towers[0].x, room.towers[0].y);
        let pid = room.slots[1].player_id.unwrap();
        let team = if room.towers[0].team == 1 { 2 } else { 1 };
        {
            let p = room.player_mut(pid).unwrap();
            p.team = team;
            p.x = tx;
            p.y = ty;
            p.hp = 1_000_000;
            p.max_hp = 1_000_000;
        }
        room.update_towers(0.0);
        assert_eq!(room.player(pid).unwrap().hp, 1_000_000 - 300);
        room.update_towers(10.0);
        assert_eq!(room.player(pid).unwrap().hp, 1_000_000 - 300 - 600);
    }

    #[test]
    fn tower_damage_against_minions_scales_with_wave_count() {
        let mut room = playing_room();
        let (tx, ty) = (room.towers[0].x, room.towers[0].y);
        let enemy_team = if room.towers[0].team == 1 { 2 } else { 1 };
        room.wave_count = 3;
        room.minions.push(crate::entities::Minion {
            id: 20_000,
            team: enemy_team,
            kind: crate::entities::MinionKind::Melee,
            x: tx as f32,
            y: ty as f32,
            hp: 100_000,
            max_hp: 100_000,
            dmg: 0,
            range: 1.0,
            lane: 0,
            waypoint_idx: 0,
            state: crate::entities::MinionState::Marching,
            target_id: None,
            anchor: (tx as f32, ty as f32),
            last_attack_time: f64::NEG_INFINITY,
            visual_end_time: 0.0,
        });
        room.update_towers(0.0);
        assert_eq!(room.minions[0].hp, 100_000 - (300 + 100 * 3));
    }
}
