//! Minion march/chase/return state machine (spec §4.5), grounded on
//! `game_room.h`'s `update_minions` and the lane waypoint polylines the
//! wave spawner lays out.

use arena_core::constants::*;
use arena_core::map::TileGrid;

use crate::entities::MinionState;
use crate::room::Room;

fn dist_sq_f(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

fn step_toward(x: f32, y: f32, tx: f32, ty: f32, speed: f32, dt: f64) -> (f32, f32) {
    let dx = tx - x;
    let dy = ty - y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 1e-4 {
        return (x, y);
    }
    let travel = (speed * dt as f32).min(dist);
    (x + dx / dist * travel, y + dy / dist * travel)
}

impl Room {
    pub fn update_minions(&mut self, now: f64, dt: f64) {
        for i in 0..self.minions.len() {
            if !self.minions[i].alive() {
                continue;
            }
            self.acquire_minion_target(i, now);

            match self.minions[i].state {
                MinionState::Marching => self.minion_march(i, dt),
                MinionState::Chasing => self.minion_chase(i, now, dt),
                MinionState::Returning => self.minion_return(i, dt),
            }
        }
        self.minions.retain(|m| m.alive());
    }

    fn acquire_minion_target(&mut self, i: usize, now: f64) {
        let _ = now;
        let (team, x, y, state) = {
            let m = &self.minions[i];
            (m.team, m.x, m.y, m.state)
        };
        if state == MinionState::Returning {
            return;
        }
        if let Some(target_id) = self.minions[i].target_id {
            if self.minion_target_alive(target_id, team) {
                return;
            }
            self.minions[i].target_id = None;
            if state == MinionState::Chasing {
                self.minions[i].state = MinionState::Returning;
            }
        }

        let nearest_enemy_minion = self
            .minions
            .iter()
            .filter(|o| o.alive() && o.team != team)
            .filter(|o| dist_sq_f(o.x, o.y, x, y) <= MINION_VISION_SQ)
            .min_by(|a, b| dist_sq_f(a.x, a.y, x, y).partial_cmp(&dist_sq_f(b.x, b.y, x, y)).unwrap())
            .map(|o| o.id);

        let nearest_enemy_player = self
            .players
            .iter()
            .filter(|p| p.is_playing && p.hp > 0 && p.team != team)
            .filter(|p| dist_sq_f(p.x as f32, p.y as f32, x, y) <= MINION_VISION_SQ)
            .min_by(|a, b| {
                dist_sq_f(a.x as f32, a.y as f32, x, y)
                    .partial_cmp(&dist_sq_f(b.x as f32, b.y as f32, x, y))
                    .unwrap()
            })
            .map(|p| p.id);

        let nearest_enemy_tower = self
            .towers
            .iter()
            .filter(|t| t.alive() && t.team != team)
            .filter(|t| dist_sq_f(t.x as f32, t.y as f32, x, y) <= MINION_TOWER_VISION_SQ)
            .min_by(|a, b| {
                dist_sq_f(a.x as f32, a.y as f32, x, y)
                    .partial_cmp(&dist_sq_f(b.x as f32, b.y as f32, x, y))
                    .unwrap()
            })
            .map(|t| t.id);

        if let Some(id) = nearest_enemy_player.or(nearest_enemy_minion).or(nearest_enemy_tower) {
            self.minions[i].target_id = Some(id);
            self.minions[i].state = MinionState::Chasing;
        }
    }

    fn minion_target_alive(&self, id: i32, attacker_team: u8) -> bool {
        if let Some(m) = self.minions.iter().find(|m| m.id == id) {
            return m.alive() && m.team != attacker_team;
        }
        if let Some(p) = self.players.iter().find(|p| p.id == id) {
            return p.is_playing && p.hp > 0 && p.team != attacker_team;
        }
        if let Some(t) = self.towers.iter().find(|t| t.id == id) {
            return t.alive() && t.team != attacker_team;
        }
        false
    }

    fn target_position(&self, id: i32) -> Option<(f32, f32)> {
        if let Some(m) = self.minions.iter().find(|m| m.id == id) {
            return Some((m.x, m.y));
        }
        if let Some(p) = self.players.iter().find(|p| p.id == id) {
            return Some((p.x as f32, p.y as f32));
        }
        if let Some(t) = self.towers.iter().find(|t| t.id == id) {
            return Some((t.x as f32, t.y as f32));
        }
        None
    }

    fn minion_march(&mut self, i: usize, dt: f64) {
        let lane = self.minions[i].lane;
        let waypoints = TileGrid::lane_waypoints(lane);
        let wp_idx = self.minions[i].waypoint_idx.min(waypoints.len() - 1);
        let (wx, wy) = waypoints[wp_idx];
        let (x, y) = (self.minions[i].x, self.minions[i].y);
        let (nx, ny) = step_toward(x, y, wx as f32, wy as f32, MINION_BASE_SPEED_CELLS_PER_SEC, dt);
        self.minions[i].x = nx;
        self.minions[i].y = ny;
        self.minions[i].anchor = (nx, ny);

        if dist_sq_f(nx, ny, wx as f32, wy as f32) <= MINION_WAYPOINT_ADVANCE_DIST * MINION_WAYPOINT_ADVANCE_DIST {
            let team = self.minions[i].team;
            let last = waypoints.len() - 1;
            let next = if team == 1 {
                (wp_idx + 1).min(last)
            } else {
                wp_idx.saturating_sub(1)
            };
            self.minions[i].waypoint_idx = next;
        }
    }

    fn minion_chase(&mut self, i: usize, now: f64, dt: f64) {
        let Some(target_id) = self.minions[i].target_id else {
            self.minions[i].state = MinionState::Returning;
            return;
        };
        let Some((tx, ty)) = self.target_position(target_id) else {
            self.minions[i].state = MinionState::Returning;
            self.minions[i].target_id = None;
            return;
        };
        let (x, y, anchor, range) = {
            let m = &self.minions[i];
            (m.x, m.y, m.anchor, m.range)
        };

        if dist_sq_f(x, y, anchor.0, anchor.1) > MINION_LEASH_SQ {
            self.minions[i].state = MinionState::Returning;
            self.minions[i].target_id = None;
            return;
        }

        let is_tower_target = self.towers.iter().any(|t| t.id == target_id);
        let effective_range = if is_tower_target { range + MINION_TOWER_RANGE_BONUS } else { range };
        let range_sq = effective_range * effective_range;
        if dist_sq_f(x, y, tx, ty) <= range_sq {
            if now - self.minions[i].last_attack_time >= MINION_ATTACK_COOLDOWN_SECONDS {
                self.minions[i].last_attack_time = now;
                self.minions[i].visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
                let damage = self.minions[i].dmg;
                self.apply_minion_hit(target_id, damage, now);
            }
        } else {
            let (nx, ny) = step_toward(x, y, tx, ty, MINION_BASE_SPEED_CELLS_PER_SEC, dt);
            self.minions[i].x = nx;
            self.minions[i].y = ny;
        }
    }

    fn minion_return(&mut self, i: usize, dt: f64) {
        let (x, y, anchor) = {
            let m = &self.minions[i];
            (m.x, m.y, m.anchor)
        };
        // Returning minions retreat at double the marching/chasing speed.
        let (nx, ny) = step_toward(x, y, anchor.0, anchor.1, MINION_BASE_SPEED_CELLS_PER_SEC * 2.0, dt);
        self.minions[i].x = nx;
        self.minions[i].y = ny;
        if dist_sq_f(nx, ny, anchor.0, anchor.1) <= 0.01 {
            self.minions[i].state = MinionState::Marching;
        }
    }

    /// `damage` is the minion's flat dmg stat; defense is subtracted here
    /// only when the target is a player (spec §4.5).
    fn apply_minion_hit(&mut self, target_id: i32, damage: i32, now: f64) {
        if let Some(idx) = self.minions.iter().position(|m| m.id == target_id) {
            self.minions[idx].hp -= damage;
            self.minions[idx].visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            return;
        }
        if let Some(p) = self.players.iter_mut().find(|p| p.id == target_id) {
            let def = crate::combat::derived_stats(p).def;
            p.hp -= (damage - def).max(1);
            p.visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            if p.hp <= 0 {
                crate::combat::respawn(p);
            }
            return;
        }
        if let Some(idx) = self.towers.iter().position(|t| t.id == target_id) {
            self.towers[idx].hp -= damage;
            self.towers[idx].visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Room;

    #[test]
    fn marching_minion_advances_waypoint_index_toward_enemy_base() {
        let mut room = Room::new(1, 3);
        room.minions.push(crate::entities::Minion {
            id: 10_000,
            team: 1,
            kind: crate::entities::MinionKind::Melee,
            x: 22.0,
            y: 128.0,
            hp: 1000,
            max_hp: 1000,
            dmg: 100,
            range: 1.0,
            lane: 1,
            waypoint_idx: 0,
            state: MinionState::Marching,
            target_id: None,
            anchor: (22.0, 128.0),
            last_attack_time: f64::NEG_INFINITY,
            visual_end_time: 0.0,
        });
        for _ in 0..2000 {
            room.update_minions(0.0, 0.05);
        }
        assert_eq!(room.minions[0].waypoint_idx, 1);
    }

    fn idle_minion(id: i32, x: f32, y: f32, anchor: (f32, f32), state: MinionState) -> crate::entities::Minion {
        crate::entities::Minion {
            id,
            team: 1,
            kind: crate::entities::MinionKind::Melee,
            x,
            y,
            hp: 1000,
            max_hp: 1000,
            dmg: 100,
            range: 1.0,
            lane: 0,
            waypoint_idx: 0,
            state,
            target_id: None,
            anchor,
            last_attack_time: f64::NEG_INFINITY,
            visual_end_time: 0.0,
        }
    }

    #[test]
    fn returning_minion_moves_at_double_base_speed() {
        let mut room = Room::new(1, 3);
        room.minions.push(idle_minion(1, 0.0, 0.0, (100.0, 0.0), MinionState::Returning));
        room.update_minions(0.0, 1.0);
        assert!((room.minions[0].x - 2.0 * MINION_BASE_SPEED_CELLS_PER_SEC).abs() < 1e-3);
    }

    #[test]
    fn minion_hit_on_a_player_subtracts_defense_floored_at_one() {
        let mut room = Room::new(1, 3);
        room.add_player("a").unwrap();
        room.add_player("b").unwrap();
        room.start_picking(0).unwrap();
        room.select_hero(0, 1).unwrap();
        room.select_hero(1, 1).unwrap();
        let pid = room.slots[1].player_id.unwrap();
        room.player_mut(pid).unwrap().hp = 100_000;
        room.player_mut(pid).unwrap().max_hp = 100_000;

        room.apply_minion_hit(pid, 100, 0.0);

        let def = crate::combat::derived_stats(room.player(pid).unwrap()).def;
        assert_eq!(room.player(pid).unwrap().hp, 100_000 - (100 - def).max(1));
    }
}
