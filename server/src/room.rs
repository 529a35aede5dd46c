//! Room lifecycle and the per-tick simulation loop (spec §4.2, §4.8, §4.9).
//!
//! A `Room` exclusively owns all of its entities; nothing outside holds a
//! reference into it. Inter-entity relationships are expressed only by id
//! and resolved by lookup, per spec.md §9's "Cross-entity references by id,
//! never by pointer".

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use arena_core::constants::*;
use arena_core::hero::HeroKind;
use arena_core::item::ItemKind;
use arena_core::map::{self, TileGrid, TileKind};

use crate::broadcast::Frame;
use crate::entities::*;
use crate::error::RoomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    Picking,
    Playing,
}

#[derive(Debug, Clone)]
pub enum Command {
    Move { player_id: EntityId, dx: i32, dy: i32 },
    Attack { player_id: EntityId },
    Skill { player_id: EntityId },
    Purchase { player_id: EntityId, item_idx: i32 },
    HeroSelect { slot: usize, hero_id: i32 },
    SetReady { slot: usize, ready: bool },
    StartGame { slot: usize },
}

#[derive(Debug, Clone, Copy)]
enum AttackTarget {
    Player(EntityId),
    Minion(EntityId),
    Tower(EntityId),
    Jungle(EntityId),
}

pub struct Room {
    pub room_id: u32,
    pub status: RoomStatus,
    pub slots: [Slot; ROOM_SLOTS],

    pub map: TileGrid,
    pub players: Vec<Player>,
    pub towers: Vec<Tower>,
    pub minions: Vec<Minion>,
    pub jungle: Vec<JungleMob>,
    pub effects: Vec<SkillEffect>,

    ids: IdAllocator,
    pub game_start_time: Option<f64>,
    pub wave_count: u32,
    last_spawn_second: Option<i64>,

    pub input_queue: VecDeque<Command>,
    rng: StdRng,

    /// Reused across ticks so broadcasting a frame doesn't reallocate the
    /// packet list every 40ms (spec §9 "Broadcast as a builder").
    pub(crate) broadcast_buffer: Vec<arena_core::protocol::GamePacket>,
}

impl Room {
    pub fn new(room_id: u32, seed: u64) -> Self {
        Room {
            room_id,
            status: RoomStatus::Waiting,
            slots: Default::default(),
            map: map::generate(),
            players: Vec::new(),
            towers: Vec::new(),
            minions: Vec::new(),
            jungle: Vec::new(),
            effects: Vec::new(),
            ids: IdAllocator::new(),
            game_start_time: None,
            wave_count: 0,
            last_spawn_second: None,
            input_queue: VecDeque::new(),
            rng: StdRng::seed_from_u64(seed),
            broadcast_buffer: Vec::new(),
        }
    }

    // Deterministic jungle/minion placement jitter (spec §6: "Random
    // source: seeded once at process start; used only by wave spawn and
    // jungle placement") — `StdRng` seeded once per room reproduces the
    // same sequence for the same seed.
    fn rand_range(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    // ---- lobby / lifecycle -------------------------------------------------

    pub fn seated_count(&self) -> usize {
        self.slots.iter().filter(|s| s.owner_name.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.seated_count() >= ROOM_SLOTS
    }

    pub fn is_empty(&self) -> bool {
        self.seated_count() == 0
    }

    pub fn add_player(&mut self, name: &str) -> Result<usize, RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::WrongPhase);
        }
        let free = self
            .slots
            .iter()
            .position(|s| s.owner_name.is_none())
            .ok_or(RoomError::RoomFull)?;
        let team = if free < ROOM_SLOTS / 2 { 1 } else { 2 };
        self.slots[free] = Slot {
            owner_name: Some(name.to_string()),
            ready: false,
            team,
            hero_id: 0,
            player_id: None,
        };
        Ok(free)
    }

    pub fn remove_slot(&mut self, slot: usize) {
        if let Some(id) = self.slots[slot].player_id {
            self.players.retain(|p| p.id != id);
        }
        self.slots[slot] = Slot::default();
    }

    pub fn set_ready(&mut self, slot: usize, ready: bool) -> Result<(), RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::WrongPhase);
        }
        self.slots[slot].ready = ready;
        Ok(())
    }

    pub fn start_picking(&mut self, requester_slot: usize) -> Result<(), RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::WrongPhase);
        }
        if requester_slot != 0 {
            return Err(RoomError::NotOwner);
        }
        self.status = RoomStatus::Picking;
        for s in self.slots.iter_mut() {
            s.hero_id = 0;
        }
        Ok(())
    }

    /// Returns `true` exactly once, the tick the pick phase completes.
    pub fn select_hero(&mut self, slot: usize, hero_id: i32) -> Result<bool, RoomError> {
        if self.status != RoomStatus::Picking {
            return Err(RoomError::WrongPhase);
        }
        self.slots[slot].hero_id = hero_id;
        let all_picked = self
            .slots
            .iter()
            .filter(|s| s.owner_name.is_some())
            .all(|s| s.hero_id != 0);
        if all_picked {
            self.begin_battle();
            return Ok(true);
        }
        Ok(false)
    }

    fn begin_battle(&mut self) {
        self.status = RoomStatus::Playing;
        self.game_start_time = Some(0.0);
        self.spawn_towers();
        self.spawn_jungle();

        for i in 0..ROOM_SLOTS {
            if self.slots[i].owner_name.is_none() {
                continue;
            }
            let team = self.slots[i].team;
            let player_id = PLAYER_ID_START as i32 + i as i32;
            let hero = HeroKind::from_hero_id(self.slots[i].hero_id);
            let mut player = Player::new(player_id, team);
            player.hero = hero;
            let template = hero.unwrap_or(HeroKind::Warrior).template();
            player.base_def = template.base_def;
            player.max_hp = template.max_hp;
            player.hp = template.max_hp;
            let (bx, by) = TileGrid::base_position(team);
            player.x = bx;
            player.y = by;
            player.is_playing = true;
            self.slots[i].player_id = Some(player_id);
            self.players.push(player);
        }
    }

    fn spawn_towers(&mut self) {
        let size = self.map.size();
        for y in 0..size {
            for x in 0..size {
                if let TileKind::Tower { team, tier } = self.map.kind(x, y) {
                    let id = self.ids.next_tower();
                    let max_hp = TOWER_HP_TIERS[tier as usize % 3];
                    self.towers.push(Tower {
                        id,
                        x,
                        y,
                        team,
                        tier,
                        hp: max_hp,
                        max_hp,
                        target_id: None,
                        consecutive_hits: 0,
                        last_attack_time: f64::NEG_INFINITY,
                        visual_end_time: 0.0,
                    });
                }
            }
        }

        // The base crystal is its own Tower entity, in the same id
        // partition as the lane towers (spec §3), at tier 0's hp.
        for team in [1u8, 2u8] {
            let (bx, by) = TileGrid::base_position(team);
            let id = self.ids.next_tower();
            let max_hp = TOWER_HP_TIERS[0];
            self.towers.push(Tower {
                id,
                x: bx,
                y: by,
                team,
                tier: 0,
                hp: max_hp,
                max_hp,
                target_id: None,
                consecutive_hits: 0,
                last_attack_time: f64::NEG_INFINITY,
                visual_end_time: 0.0,
            });
        }
    }

    fn spawn_jungle(&mut self) {
        let spots = [
            (JungleKind::Standard, 45, 45),
            (JungleKind::Standard, 105, 105),
            (JungleKind::RedBuff, 45, 105),
            (JungleKind::BlueBuff, 105, 45),
        ];
        for (kind, x, y) in spots {
            let id = self.ids.next_jungle();
            self.jungle.push(new_jungle_mob(id, kind, x, y));
        }
        let overlord_id = self.ids.next_boss();
        self.jungle.push(new_jungle_mob(overlord_id, JungleKind::Overlord, 75, 40));
        let tyrant_id = self.ids.next_boss();
        self.jungle.push(new_jungle_mob(tyrant_id, JungleKind::Tyrant, 75, 110));
    }

    pub fn walkable_for_player(&self, x: i32, y: i32) -> bool {
        if !self.map.terrain_walkable(x, y) {
            return false;
        }
        !self.towers.iter().any(|t| t.alive() && t.x == x && t.y == y)
    }

    // ---- command application (spec §4.2 step 1, §7) ----------------------

    pub fn push_command(&mut self, cmd: Command) {
        self.input_queue.push_back(cmd);
    }

    fn drain_commands(&mut self, now: f64) {
        let commands: Vec<Command> = self.input_queue.drain(..).collect();
        for cmd in commands {
            self.apply_command(cmd, now);
        }
    }

    fn apply_command(&mut self, cmd: Command, now: f64) {
        match cmd {
            Command::SetReady { slot, ready } => {
                let _ = self.set_ready(slot, ready);
            }
            Command::StartGame { slot } => {
                let _ = self.start_picking(slot);
            }
            Command::HeroSelect { slot, hero_id } => {
                let _ = self.select_hero(slot, hero_id);
            }
            Command::Move { player_id, dx, dy } => {
                if self.status != RoomStatus::Playing {
                    return;
                }
                self.apply_move(player_id, dx, dy);
            }
            Command::Attack { player_id } => {
                if self.status != RoomStatus::Playing {
                    return;
                }
                self.apply_attack(player_id, now);
            }
            Command::Skill { player_id } => {
                if self.status != RoomStatus::Playing {
                    return;
                }
                self.apply_skill(player_id, now);
            }
            Command::Purchase { player_id, item_idx } => {
                if self.status != RoomStatus::Playing {
                    return;
                }
                self.apply_purchase(player_id, item_idx);
            }
        }
    }

    fn apply_attack(&mut self, player_id: EntityId, now: f64) {
        let Some(attacker) = self.players.iter().find(|p| p.id == player_id) else {
            return;
        };
        if !attacker.is_playing || attacker.hp <= 0 {
            return;
        }
        if now - attacker.last_attack_time < PLAYER_ATTACK_COOLDOWN_SECONDS {
            return;
        }
        let (ax, ay, team) = (attacker.x, attacker.y, attacker.team);
        let atk_range = attacker.hero.unwrap_or(HeroKind::Warrior).template().range;
        let range_sq = atk_range * atk_range;

        let target = self.nearest_hostile_in_range(ax, ay, team, range_sq);
        let Some(target) = target else { return };

        self.player_mut(player_id).unwrap().last_attack_time = now;
        self.player_mut(player_id).unwrap().visual_end_time = now + 0.2;
        self.player_mut(player_id).unwrap().last_aggressive_time = now;

        // Life-steal heals off raw `atk`, computed once, independent of the
        // per-target damage actually applied (spec §4.7).
        let atk = crate::combat::flat_attack_damage(self.player(player_id).unwrap());

        match target {
            AttackTarget::Player(id) => {
                let damage = {
                    let attacker = self.player(player_id).unwrap();
                    let defender = self.player(id).unwrap();
                    crate::combat::player_vs_player_damage(attacker, defender)
                };
                let defender = self.player_mut(id).unwrap();
                defender.hp -= damage;
                defender.visual_end_time = now + 0.2;
                let died = defender.hp <= 0;
                if died {
                    crate::combat::respawn(self.player_mut(id).unwrap());
                    self.player_mut(player_id).unwrap().gold += GOLD_KILL_PLAYER;
                }
            }
            AttackTarget::Minion(id) => {
                if let Some(idx) = self.minions.iter().position(|m| m.id == id) {
                    self.minions[idx].hp -= atk;
                    self.minions[idx].visual_end_time = now + 0.2;
                    let died = !self.minions[idx].alive();
                    if died {
                        self.minions.remove(idx);
                        self.player_mut(player_id).unwrap().gold += GOLD_KILL_MINION;
                    }
                }
            }
            AttackTarget::Tower(id) => {
                if let Some(idx) = self.towers.iter().position(|t| t.id == id) {
                    self.towers[idx].hp -= atk;
                    self.towers[idx].visual_end_time = now + 0.2;
                }
            }
            AttackTarget::Jungle(id) => {
                if let Some(idx) = self.jungle.iter().position(|j| j.id == id) {
                    self.jungle[idx].hp -= atk;
                    self.jungle[idx].visual_end_time = now + 0.2;
                    self.jungle[idx].last_hit_by_time = now;
                    self.jungle[idx].target_id = Some(player_id);
                    let died = !self.jungle[idx].alive();
                    if died {
                        let bounty = self.jungle[idx].kind.bounty();
                        self.jungle.remove(idx);
                        self.player_mut(player_id).unwrap().gold += bounty;
                    }
                }
            }
        }

        let attacker = self.player_mut(player_id).unwrap();
        crate::combat::apply_life_steal(attacker, atk);
    }

    /// Hero active ability: longer reach and cooldown than a basic attack,
    /// double damage on the same target-priority search. Life-steal still
    /// heals off raw `atk`, matching the basic-attack rule.
    fn apply_skill(&mut self, player_id: EntityId, now: f64) {
        let Some(attacker) = self.players.iter().find(|p| p.id == player_id) else {
            return;
        };
        if !attacker.is_playing || attacker.hp <= 0 {
            return;
        }
        if now - attacker.last_skill_time < HERO_SKILL_COOLDOWN_SECONDS {
            return;
        }
        let (ax, ay, team) = (attacker.x, attacker.y, attacker.team);
        let base_range = attacker.hero.unwrap_or(HeroKind::Warrior).template().range + HERO_SKILL_RANGE_BONUS;
        let range_sq = base_range * base_range;

        let target = self.nearest_hostile_in_range(ax, ay, team, range_sq);
        let Some(target) = target else { return };

        self.player_mut(player_id).unwrap().last_skill_time = now;
        self.player_mut(player_id).unwrap().visual_end_time = now + HERO_SKILL_VISUAL_MS as f64 / 1000.0;
        self.player_mut(player_id).unwrap().last_aggressive_time = now;

        let atk = crate::combat::flat_attack_damage(self.player(player_id).unwrap());
        let skill_atk = atk * HERO_SKILL_DAMAGE_MULTIPLIER;

        let center = match target {
            AttackTarget::Player(id) => {
                let (damage, center) = {
                    let attacker = self.player(player_id).unwrap();
                    let defender = self.player(id).unwrap();
                    let def = crate::combat::derived_stats(defender).def;
                    ((skill_atk - def).max(1), (defender.x, defender.y))
                };
                let defender = self.player_mut(id).unwrap();
                defender.hp -= damage;
                defender.visual_end_time = now + HERO_SKILL_VISUAL_MS as f64 / 1000.0;
                let died = defender.hp <= 0;
                if died {
                    crate::combat::respawn(self.player_mut(id).unwrap());
                    self.player_mut(player_id).unwrap().gold += GOLD_KILL_PLAYER;
                }
                center
            }
            AttackTarget::Minion(id) => {
                let center = self.minions.iter().find(|m| m.id == id).map(|m| (m.x as i32, m.y as i32));
                if let Some(idx) = self.minions.iter().position(|m| m.id == id) {
                    self.minions[idx].hp -= skill_atk;
                    self.minions[idx].visual_end_time = now + HERO_SKILL_VISUAL_MS as f64 / 1000.0;
                    let died = !self.minions[idx].alive();
                    if died {
                        self.minions.remove(idx);
                        self.player_mut(player_id).unwrap().gold += GOLD_KILL_MINION;
                    }
                }
                center.unwrap_or((ax, ay))
            }
            AttackTarget::Tower(id) => {
                let center = self.towers.iter().find(|t| t.id == id).map(|t| (t.x, t.y));
                if let Some(idx) = self.towers.iter().position(|t| t.id == id) {
                    self.towers[idx].hp -= skill_atk;
                    self.towers[idx].visual_end_time = now + HERO_SKILL_VISUAL_MS as f64 / 1000.0;
                }
                center.unwrap_or((ax, ay))
            }
            AttackTarget::Jungle(id) => {
                let center = self.jungle.iter().find(|j| j.id == id).map(|j| (j.x, j.y));
                if let Some(idx) = self.jungle.iter().position(|j| j.id == id) {
                    self.jungle[idx].hp -= skill_atk;
                    self.jungle[idx].visual_end_time = now + HERO_SKILL_VISUAL_MS as f64 / 1000.0;
                    self.jungle[idx].last_hit_by_time = now;
                    self.jungle[idx].target_id = Some(player_id);
                    let died = !self.jungle[idx].alive();
                    if died {
                        let bounty = self.jungle[idx].kind.bounty();
                        self.jungle.remove(idx);
                        self.player_mut(player_id).unwrap().gold += bounty;
                    }
                }
                center.unwrap_or((ax, ay))
            }
        };

        let attacker = self.player_mut(player_id).unwrap();
        crate::combat::apply_life_steal(attacker, atk);

        self.effects.push(SkillEffect {
            center,
            kind: EffectKind::Burst,
            start_time: now,
            end_time: now + HERO_SKILL_VISUAL_MS as f64 / 1000.0,
            radius: HERO_SKILL_EFFECT_RADIUS,
            originator_id: player_id,
        });
    }

    fn nearest_hostile_in_range(&self, x: i32, y: i32, team: u8, range_sq: f32) -> Option<AttackTarget> {
        let d2 = |bx: i32, by: i32| -> f32 {
            let dx = (x - bx) as f32;
            let dy = (y - by) as f32;
            dx * dx + dy * dy
        };

        let mut best: Option<(f32, AttackTarget)> = None;
        let mut consider = |dist: f32, target: AttackTarget| {
            if dist <= range_sq && best.map(|(d, _)| dist < d).unwrap_or(true) {
                best = Some((dist, target));
            }
        };

        for p in self.players.iter().filter(|p| p.is_playing && p.hp > 0 && p.team != team) {
            consider(d2(p.x, p.y), AttackTarget::Player(p.id));
        }
        for m in self.minions.iter().filter(|m| m.alive() && m.team != team) {
            consider(d2(m.x as i32, m.y as i32), AttackTarget::Minion(m.id));
        }
        for t in self.towers.iter().filter(|t| t.alive() && t.team != team) {
            consider(d2(t.x, t.y), AttackTarget::Tower(t.id));
        }
        for j in self.jungle.iter().filter(|j| j.alive()) {
            consider(d2(j.x, j.y), AttackTarget::Jungle(j.id));
        }

        best.map(|(_, t)| t)
    }

    fn apply_move(&mut self, player_id: EntityId, dx: i32, dy: i32) {
        let dx = dx.clamp(-1, 1);
        let dy = dy.clamp(-1, 1);
        let Some(player) = self.players.iter().find(|p| p.id == player_id) else {
            return;
        };
        if !player.is_playing {
            return;
        }
        let (px, py) = (player.x, player.y);
        let (mut nx, mut ny) = (px, py);
        let candidate_x = px + dx;
        if self.walkable_for_player(candidate_x, py) {
            nx = candidate_x;
        }
        let candidate_y = py + dy;
        if self.walkable_for_player(nx, candidate_y) {
            ny = candidate_y;
        }
        let player = self.players.iter_mut().find(|p| p.id == player_id).unwrap();
        player.x = nx;
        player.y = ny;
    }

    fn apply_purchase(&mut self, player_id: EntityId, item_idx: i32) {
        let Some(kind) = ItemKind::from_shop_index(item_idx) else {
            return;
        };
        let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) else {
            return;
        };
        let cost = kind.cost();
        if player.gold < cost {
            return; // economic error: no state change, no reply (spec §7)
        }
        player.gold -= cost;
        let old_max = crate::combat::derived_stats(player).max_hp;
        player.inventory.push(kind);
        let new_max = crate::combat::derived_stats(player).max_hp;
        player.hp += new_max - old_max;
        player.max_hp = new_max;
    }

    // ---- tick (spec §4.2) --------------------------------------------------

    /// Advance the simulation by exactly one tick. `now` is elapsed
    /// wall-clock seconds since the scheduler's anchor was created;
    /// `dt` is this tick's length in seconds.
    pub fn tick(&mut self, now: f64, dt: f64) -> Option<Frame> {
        if self.status != RoomStatus::Playing {
            self.drain_commands(now);
            return None;
        }

        self.drain_commands(now);
        self.apply_regen(now);
        self.maybe_spawn_wave(now);

        self.update_towers(now);
        self.update_minions(now, dt);
        self.update_jungle(now);
        self.expire_effects(now);

        let frame = crate::broadcast::build_frame(self, now);

        for p in self.players.iter_mut() {
            p.current_effect = None;
        }

        Some(frame)
    }

    fn apply_regen(&mut self, now: f64) {
        for p in self.players.iter_mut() {
            let stats = crate::combat::derived_stats(p);
            if !stats.passive_regen {
                continue;
            }
            if now - p.last_regen_time >= REGEN_ARMOR_INTERVAL_SECONDS {
                p.last_regen_time = now;
                p.hp = (p.hp + REGEN_ARMOR_AMOUNT).min(stats.max_hp);
            }
        }
    }

    fn maybe_spawn_wave(&mut self, now: f64) {
        let seconds = now as i64;
        if seconds < WAVE_START_SECOND {
            return;
        }
        if (seconds - WAVE_START_SECOND) % WAVE_INTERVAL_SECOND != 0 {
            return;
        }
        if self.last_spawn_second == Some(seconds) {
            return;
        }
        self.last_spawn_second = Some(seconds);
        self.spawn_wave();
    }

    fn spawn_wave(&mut self) {
        self.wave_count += 1;
        let n = self.wave_count as i32;
        let melee_hp = 1000 + 200 * n;
        let melee_dmg = 100 + 150 * n;
        let ranged_hp = 600 + 150 * n;
        let ranged_dmg = 100 + 200 * n;

        for lane in 0..LANE_COUNT {
            for team in 1..=TEAM_COUNT as u8 {
                let (bx, by) = TileGrid::base_position(team);
                let waypoint_idx = if team == 1 { 0 } else { map::TileGrid::lane_waypoints(lane).len() - 1 };
                for _ in 0..2 {
                    let id = self.ids.next_minion();
                    // Small spawn jitter so a wave's melee pair doesn't stack
                    // on the exact same tile.
                    let (jx, jy) = (self.jitter(3) - 1, self.jitter(3) - 1);
                    self.minions.push(Minion {
                        id,
                        team,
                        kind: MinionKind::Melee,
                        x: (bx + jx) as f32,
                        y: (by + jy) as f32,
                        hp: melee_hp,
                        max_hp: melee_hp,
                        dmg: melee_dmg,
                        range: 1.0,
                        lane,
                        waypoint_idx,
                        state: MinionState::Marching,
                        target_id: None,
                        anchor: ((bx + jx) as f32, (by + jy) as f32),
                        last_attack_time: f64::NEG_INFINITY,
                        visual_end_time: 0.0,
                    });
                }
                let id = self.ids.next_minion();
                self.minions.push(Minion {
                    id,
                    team,
                    kind: MinionKind::Ranged,
                    x: bx as f32,
                    y: by as f32,
                    hp: ranged_hp,
                    max_hp: ranged_hp,
                    dmg: ranged_dmg,
                    range: 5.0,
                    lane,
                    waypoint_idx,
                    state: MinionState::Marching,
                    target_id: None,
                    anchor: (bx as f32, by as f32),
                    last_attack_time: f64::NEG_INFINITY,
                    visual_end_time: 0.0,
                });
            }
        }
        log::info!("room {}: spawned wave {} (18 minions)", self.room_id, self.wave_count);
    }

    fn expire_effects(&mut self, now: f64) {
        self.effects.retain(|e| !e.expired(now));
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn jitter(&mut self, span: i32) -> i32 {
        self.rand_range(span)
    }
}

fn new_jungle_mob(id: EntityId, kind: JungleKind, x: i32, y: i32) -> JungleMob {
    let (hp, dmg, range) = match kind {
        JungleKind::Standard => (8000, 150, 3.0),
        JungleKind::RedBuff => (12000, 200, 3.0),
        JungleKind::BlueBuff => (12000, 200, 3.0),
        JungleKind::Overlord => (OVERLORD_HP, OVERLORD_DMG, OVERLORD_RANGE),
        JungleKind::Tyrant => (TYRANT_HP, TYRANT_DMG, TYRANT_RANGE),
    };
    JungleMob {
        id,
        kind,
        x,
        y,
        hp,
        max_hp: hp,
        dmg,
        range,
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_players() -> Room {
        let mut room = Room::new(1, 42);
        for i in 0..4 {
            room.add_player(&format!("p{i}")).unwrap();
        }
        room.start_picking(0).unwrap();
        for i in 0..4 {
            room.select_hero(i, 1).unwrap();
        }
        room
    }

    #[test]
    fn pick_completes_exactly_once() {
        let mut room = Room::new(1, 1);
        room.add_player("a").unwrap();
        room.add_player("b").unwrap();
        room.start_picking(0).unwrap();
        assert_eq!(room.select_hero(0, 1).unwrap(), false);
        assert_eq!(room.select_hero(1, 2).unwrap(), true);
        assert_eq!(room.status, RoomStatus::Playing);
    }

    #[test]
    fn movement_clamps_to_unit_step() {
        let mut room = room_with_players();
        let pid = room.slots[0].player_id.unwrap();
        let (sx, sy) = {
            let p = room.player(pid).unwrap();
            (p.x, p.y)
        };
        room.apply_move(pid, 5, -3);
        let p = room.player(pid).unwrap();
        assert!((p.x - sx).abs() <= 1);
        assert!((p.y - sy).abs() <= 1);
    }

    #[test]
    fn purchase_at_exact_cost_succeeds_once() {
        let mut room = room_with_players();
        let pid = room.slots[0].player_id.unwrap();
        room.player_mut(pid).unwrap().gold = 500;
        room.apply_purchase(pid, 0); // cloth armor, cost 500
        let p = room.player(pid).unwrap();
        assert_eq!(p.gold, 0);
        assert_eq!(p.inventory.len(), 1);
    }

    #[test]
    fn purchase_with_insufficient_gold_is_noop() {
        let mut room = room_with_players();
        let pid = room.slots[0].player_id.unwrap();
        room.player_mut(pid).unwrap().gold = 100;
        room.apply_purchase(pid, 0);
        let p = room.player(pid).unwrap();
        assert_eq!(p.gold, 100);
        assert!(p.inventory.is_empty());
    }

    #[test]
    fn skill_hits_beyond_basic_attack_range_for_double_damage_then_cools_down() {
        let mut room = room_with_players();
        let pid = room.slots[0].player_id.unwrap();
        let (px, py) = {
            let p = room.player(pid).unwrap();
            (p.x, p.y)
        };
        let team = room.player(pid).unwrap().team;
        let enemy_team = if team == 1 { 2 } else { 1 };
        room.minions.push(Minion {
            id: 10_000,
            team: enemy_team,
            kind: MinionKind::Melee,
            x: (px + 3) as f32,
            y: py as f32,
            hp: 10_000,
            max_hp: 10_000,
            dmg: 100,
            range: 1.0,
            lane: 0,
            waypoint_idx: 0,
            state: MinionState::Marching,
            target_id: None,
            anchor: ((px + 3) as f32, py as f32),
            last_attack_time: f64::NEG_INFINITY,
            visual_end_time: 0.0,
        });

        // Out of basic attack range (warrior range 2) but inside skill
        // range (2 + HERO_SKILL_RANGE_BONUS).
        room.apply_attack(pid, 0.0);
        assert_eq!(room.minions[0].hp, 10_000);

        room.apply_skill(pid, 0.0);
        assert_eq!(room.minions[0].hp, 10_000 - 1000); // 2 * 500 atk

        room.apply_skill(pid, 1.0); // still inside HERO_SKILL_COOLDOWN_SECONDS
        assert_eq!(room.minions[0].hp, 10_000 - 1000);
    }

    #[test]
    fn wave_cadence_spawns_only_at_30_and_90() {
        let mut room = room_with_players();
        for s in 0..=91 {
            room.maybe_spawn_wave(s as f64);
        }
        assert_eq!(room.wave_count, 2);
        assert_eq!(room.minions.len(), 36);
    }
}
