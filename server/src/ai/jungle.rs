//! Jungle camp aggro/regen and boss skill choreography (spec §4.6),
//! grounded on `game_room.h`'s `update_jungle` and the boss-only fields it
//! carries (`attack_counter`, `boss_state`, `skill_start_time`,
//! `next_tick_time`, `skill_targets`).

use arena_core::constants::*;

use crate::entities::{BossState, JungleKind};
use crate::room::Room;

fn dist_sq(ax: i32, ay: i32, bx: i32, by: i32) -> f32 {
    let dx = (ax - bx) as f32;
    let dy = (ay - by) as f32;
    dx * dx + dy * dy
}

impl Room {
    pub fn update_jungle(&mut self, now: f64) {
        for i in 0..self.jungle.len() {
            if !self.jungle[i].alive() {
                continue;
            }
            if self.jungle[i].kind.is_boss() {
                self.update_boss(i, now);
            } else {
                self.update_standard_camp(i, now);
            }
        }
        self.jungle.retain(|j| j.alive());
    }

    fn update_standard_camp(&mut self, i: usize, now: f64) {
        let lost_aggro = self.jungle[i].target_id.is_some()
            && now - self.jungle[i].last_hit_by_time > JUNGLE_AGGRO_TIMEOUT_SECONDS;
        if lost_aggro {
            self.jungle[i].target_id = None;
        }

        if let Some(target_id) = self.jungle[i].target_id {
            let (jx, jy, range) = (self.jungle[i].x, self.jungle[i].y, self.jungle[i].range);
            let in_range = self
                .players
                .iter()
                .find(|p| p.id == target_id)
                .map(|p| p.hp > 0 && dist_sq(p.x, p.y, jx, jy) <= range * range)
                .unwrap_or(false);
            if in_range && now - self.jungle[i].last_attack_time >= JUNGLE_ATTACK_COOLDOWN_SECONDS {
                self.jungle[i].last_attack_time = now;
                self.jungle[i].visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
                let dmg = self.jungle[i].dmg;
                if let Some(p) = self.players.iter_mut().find(|p| p.id == target_id) {
                    let def = crate::combat::derived_stats(p).def;
                    p.hp -= (dmg - def).max(1);
                    p.visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
                    if p.hp <= 0 {
                        crate::combat::respawn(p);
                    }
                }
            }
            return;
        }

        let mob = &mut self.jungle[i];
        if mob.hp < mob.max_hp && now - mob.last_regen_time >= JUNGLE_REGEN_PERIOD_SECONDS {
            mob.last_regen_time = now;
            mob.hp = (mob.hp + JUNGLE_REGEN_AMOUNT).min(mob.max_hp);
        }
    }

    fn update_boss(&mut self, i: usize, now: f64) {
        match self.jungle[i].boss_state {
            BossState::Idle => self.boss_idle_tick(i, now),
            BossState::Prepare => self.boss_prepare_tick(i, now),
            BossState::Active => self.boss_active_tick(i, now),
        }
    }

    fn boss_idle_tick(&mut self, i: usize, now: f64) {
        self.update_standard_camp(i, now);

        let kind = self.jungle[i].kind;
        let threshold = match kind {
            JungleKind::Overlord => OVERLORD_ATTACKS_TO_SKILL,
            JungleKind::Tyrant => TYRANT_ATTACKS_TO_SKILL,
            _ => return,
        };

        // Count a completed auto-attack toward the skill cast by watching
        // `last_attack_time` tick forward since we last checked.
        if self.jungle[i].last_attack_time == now {
            self.jungle[i].attack_counter += 1;
        }

        if self.jungle[i].attack_counter >= threshold {
            self.jungle[i].attack_counter = 0;
            self.enter_prepare(i, now);
        }
    }

    fn enter_prepare(&mut self, i: usize, now: f64) {
        let (jx, jy, range, kind) = (self.jungle[i].x, self.jungle[i].y, self.jungle[i].range, self.jungle[i].kind);
        // Snapshot targets at the moment the skill begins windup; the boss
        // does not retarget while preparing or casting, and the burst hits
        // exactly these players regardless of where they move by cast time
        // (spec §8 scenario S6). The snapshot itself is taken at the mob's
        // attack range, not the (smaller) burst footprint radius — the
        // overlord can enter prepare against a target up to `range` cells
        // away, not just within the warn-effect radius.
        let in_range: Vec<&crate::entities::Player> = self
            .players
            .iter()
            .filter(|p| p.hp > 0 && dist_sq(p.x, p.y, jx, jy) <= range * range)
            .collect();
        let targets: Vec<(i32, i32)> = in_range.iter().map(|p| (p.x, p.y)).collect();
        let target_ids: Vec<i32> = in_range.iter().map(|p| p.id).collect();

        if kind == JungleKind::Overlord {
            let delay_secs = OVERLORD_SKILL_DELAY_MS as f64 / 1000.0;
            for &cell in &targets {
                self.effects.push(crate::entities::SkillEffect {
                    center: cell,
                    kind: crate::entities::EffectKind::Warn,
                    start_time: now,
                    end_time: now + delay_secs,
                    radius: OVERLORD_SKILL_RADIUS,
                    originator_id: self.jungle[i].id,
                });
            }
        }

        self.jungle[i].skill_targets = targets;
        self.jungle[i].skill_target_ids = target_ids;
        self.jungle[i].boss_state = BossState::Prepare;
        self.jungle[i].skill_start_time = now;
    }

    fn boss_prepare_tick(&mut self, i: usize, now: f64) {
        let kind = self.jungle[i].kind;
        let delay_secs = match kind {
            JungleKind::Overlord => OVERLORD_SKILL_DELAY_MS as f64 / 1000.0,
            _ => 0.0,
        };
        if now - self.jungle[i].skill_start_time < delay_secs {
            return;
        }

        match kind {
            JungleKind::Overlord => {
                self.fire_snapshot_burst(i, now);
                self.jungle[i].boss_state = BossState::Idle;
            }
            JungleKind::Tyrant => {
                self.jungle[i].boss_state = BossState::Active;
                self.jungle[i].skill_start_time = now;
                self.jungle[i].next_tick_time = now;
            }
            _ => {}
        }
    }

    fn fire_snapshot_burst(&mut self, i: usize, now: f64) {
        let (jx, jy, dmg) = (self.jungle[i].x, self.jungle[i].y, self.jungle[i].dmg * 3);
        // Damage targets the exact players snapshotted at `prepare` entry,
        // regardless of where they've moved by the time the burst fires
        // (spec §8 scenario S6 and boundary list).
        let target_ids = self.jungle[i].skill_target_ids.clone();
        for p in self.players.iter_mut().filter(|p| p.hp > 0 && target_ids.contains(&p.id)) {
            let def = crate::combat::derived_stats(p).def;
            p.hp -= (dmg - def).max(1);
            p.visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            if p.hp <= 0 {
                crate::combat::respawn(p);
            }
        }
        self.effects.push(crate::entities::SkillEffect {
            center: (jx, jy),
            kind: crate::entities::EffectKind::Burst,
            start_time: now,
            end_time: now + 0.5,
            radius: OVERLORD_SKILL_RADIUS,
            originator_id: self.jungle[i].id,
        });
    }

    fn boss_active_tick(&mut self, i: usize, now: f64) {
        let duration_secs = TYRANT_SKILL_DUR_MS as f64 / 1000.0;
        let tick_secs = TYRANT_SKILL_TICK_MS as f64 / 1000.0;

        if now - self.jungle[i].skill_start_time >= duration_secs {
            self.jungle[i].boss_state = BossState::Idle;
            return;
        }
        if now < self.jungle[i].next_tick_time {
            return;
        }
        self.jungle[i].next_tick_time = now + tick_secs;

        let (jx, jy, range, dmg) = (self.jungle[i].x, self.jungle[i].y, self.jungle[i].range, self.jungle[i].dmg * 2);
        let range_sq = range * range;
        let map_size = self.map.size();
        let mut pushes = Vec::new();
        for p in self.players.iter_mut().filter(|p| p.hp > 0 && dist_sq(p.x, p.y, jx, jy) <= range_sq) {
            let def = crate::combat::derived_stats(p).def;
            p.hp -= (dmg - def).max(1);
            p.visual_end_time = now + TOWER_VISUAL_WINDOW_MS as f64 / 1000.0;
            if p.hp <= 0 {
                crate::combat::respawn(p);
            } else {
                let push_x = p.x + (p.x - jx).signum();
                let push_y = p.y + (p.y - jy).signum();
                pushes.push((p.id, push_x, push_y));
            }
        }
        for (pid, px, py) in pushes {
            if px < 0 || py < 0 || px >= map_size || py >= map_size {
                continue;
            }
            if self.towers.iter().any(|t| t.alive() && t.x == px && t.y == py) {
                continue;
            }
            if let Some(p) = self.players.iter_mut().find(|p| p.id == pid) {
                p.x = px;
                p.y = py;
            }
        }
        self.effects.push(crate::entities::SkillEffect {
            center: (jx, jy),
            kind: crate::entities::EffectKind::Wave,
            start_time: now,
            end_time: now + tick_secs,
            radius: range,
            originator_id: self.jungle[i].id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::JungleMob;

    fn standard_mob(id: i32) -> JungleMob {
        JungleMob {
            id,
            kind: JungleKind::Standard,
            x: 45,
            y: 45,
            hp: 1000,
            max_hp: 8000,
            dmg: 150,
            range: 3.0,
            target_id: None,
            last_hit_by_time: f64::NEG_INFINITY,
            last_attack_time: f64::NEG_INFINITY,
            last_regen_time: 0.0,
            visual_end_time: 0.0,
            attack_counter: 0,
            boss_state: BossState::Idle,
            skill_start_time: 0.0,
            next_tick_time: 0.0,
            skill_targets: Vec::new(),
            skill_target_ids: Vec::new(),
        }
    }

    #[test]
    fn idle_camp_regenerates_toward_max() {
        let mut room = Room::new(1, 5);
        room.jungle.push(standard_mob(50_000));
        room.update_jungle(JUNGLE_REGEN_PERIOD_SECONDS + 0.01);
        assert_eq!(room.jungle[0].hp, 1000 + JUNGLE_REGEN_AMOUNT);
    }

    #[test]
    fn camp_drops_aggro_after_timeout() {
        let mut room = Room::new(1, 5);
        let mut mob = standard_mob(50_001);
        mob.target_id = Some(1);
        mob.last_hit_by_time = 0.0;
        room.jungle.push(mob);
        room.update_jungle(JUNGLE_AGGRO_TIMEOUT_SECONDS + 1.0);
        assert!(room.jungle[0].target_id.is_none());
    }

    #[test]
    fn overlord_burst_hits_snapshotted_player_despite_moving_away() {
        use crate::entities::Player;

        let mut room = Room::new(1, 7);
        room.jungle.push(JungleMob {
            id: 90_000,
            kind: JungleKind::Overlord,
            x: 75,
            y: 40,
            hp: OVERLORD_HP,
            max_hp: OVERLORD_HP,
            dmg: OVERLORD_DMG,
            range: OVERLORD_RANGE,
            target_id: None,
            last_hit_by_time: f64::NEG_INFINITY,
            last_attack_time: f64::NEG_INFINITY,
            last_regen_time: f64::NEG_INFINITY,
            visual_end_time: 0.0,
            attack_counter: 0,
            boss_state: BossState::Prepare,
            skill_start_time: 0.0,
            next_tick_time: 0.0,
            skill_targets: vec![(75, 40)],
            skill_target_ids: vec![1],
        });
        let mut player = Player::new(1, 1);
        player.hp = 100_000;
        player.max_hp = 100_000;
        // Far outside radius 4 of the snapshotted cell by the time the
        // burst fires, but still hit: the burst targets the ids captured
        // at `prepare` entry, not a position recheck (spec §8 S6).
        player.x = 999;
        player.y = 999;
        room.players.push(player);

        room.update_jungle(OVERLORD_SKILL_DELAY_MS as f64 / 1000.0 + 0.01);

        assert!(room.player(1).unwrap().hp < 100_000);
    }

    #[test]
    fn overlord_entering_prepare_emits_a_warn_effect_per_snapshotted_player() {
        let mut room = Room::new(1, 7);
        room.jungle.push(JungleMob {
            id: 90_001,
            kind: JungleKind::Overlord,
            x: 75,
            y: 40,
            hp: OVERLORD_HP,
            max_hp: OVERLORD_HP,
            dmg: OVERLORD_DMG,
            range: OVERLORD_RANGE,
            target_id: None,
            last_hit_by_time: f64::NEG_INFINITY,
            last_attack_time: f64::NEG_INFINITY,
            last_regen_time: f64::NEG_INFINITY,
            visual_end_time: 0.0,
            attack_counter: 0,
            boss_state: BossState::Idle,
            skill_start_time: 0.0,
            next_tick_time: 0.0,
            skill_targets: Vec::new(),
            skill_target_ids: Vec::new(),
        });
        room.players.push(crate::entities::Player::new(1, 1));
        {
            let p = room.players.last_mut().unwrap();
            p.hp = 1000;
            p.x = 75;
            p.y = 40;
        }

        room.enter_prepare(0, 0.0);

        assert_eq!(room.jungle[0].boss_state, BossState::Prepare);
        assert_eq!(room.effects.len(), 1);
        assert_eq!(room.effects[0].kind, crate::entities::EffectKind::Warn);
        assert_eq!(room.effects[0].center, (75, 40));
    }
}
