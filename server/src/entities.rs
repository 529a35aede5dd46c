//! Typed per-kind entity storage (spec §3, §9 "Heterogeneous entity
//! collections keyed by integer id"). Each kind gets its own `Vec` rather
//! than a polymorphic container — the id partitioning already makes kind
//! dispatch trivial, so per-kind typed storage removes runtime dispatch, the
//! same tradeoff spec.md §9 calls out explicitly.

use arena_core::constants::*;
use arena_core::hero::HeroKind;
use arena_core::item::ItemKind;

pub type EntityId = i32;

/// Monotonic id allocator partitioned by entity kind (spec §3).
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_tower: u32,
    next_minion: u32,
    next_jungle: u32,
    next_boss: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_tower: TOWER_ID_START,
            next_minion: MINION_ID_START,
            next_jungle: JUNGLE_ID_START,
            next_boss: BOSS_ID_START,
        }
    }

    pub fn next_tower(&mut self) -> EntityId {
        let id = self.next_tower;
        self.next_tower += 1;
        debug_assert!(id < TOWER_ID_END);
        id as EntityId
    }

    pub fn next_minion(&mut self) -> EntityId {
        let id = self.next_minion;
        self.next_minion = if self.next_minion + 1 >= MINION_ID_END {
            MINION_ID_START
        } else {
            self.next_minion + 1
        };
        id as EntityId
    }

    pub fn next_jungle(&mut self) -> EntityId {
        let id = self.next_jungle;
        self.next_jungle += 1;
        debug_assert!(id < JUNGLE_ID_END);
        id as EntityId
    }

    pub fn next_boss(&mut self) -> EntityId {
        let id = self.next_boss;
        self.next_boss += 1;
        id as EntityId
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinionKind {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinionState {
    Marching,
    Chasing,
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JungleKind {
    Standard,
    RedBuff,
    BlueBuff,
    Overlord,
    Tyrant,
}

impl JungleKind {
    pub fn is_boss(self) -> bool {
        matches!(self, JungleKind::Overlord | JungleKind::Tyrant)
    }

    pub fn bounty(self) -> i32 {
        match self {
            JungleKind::Standard => GOLD_KILL_JUNGLE_STANDARD,
            JungleKind::RedBuff | JungleKind::BlueBuff => GOLD_KILL_JUNGLE_BUFF,
            JungleKind::Overlord | JungleKind::Tyrant => GOLD_KILL_BOSS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Idle,
    Prepare,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Warn,
    Burst,
    Wave,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub team: u8,
    pub hero: Option<HeroKind>,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub base_def: i32,
    pub inventory: Vec<ItemKind>,
    pub gold: i32,
    pub is_playing: bool,
    pub last_aggressive_time: f64,
    pub current_target_id: Option<EntityId>,
    pub visual_end_time: f64,
    pub current_effect: Option<EffectKind>,
    pub last_regen_time: f64,
    pub last_attack_time: f64,
    pub last_skill_time: f64,
}

impl Player {
    pub fn new(id: EntityId, team: u8) -> Self {
        Player {
            id,
            team,
            hero: None,
            x: 0,
            y: 0,
            hp: 0,
            max_hp: 0,
            base_def: 0,
            inventory: Vec::new(),
            gold: 0,
            is_playing: false,
            last_aggressive_time: f64::NEG_INFINITY,
            current_target_id: None,
            visual_end_time: 0.0,
            current_effect: None,
            last_regen_time: f64::NEG_INFINITY,
            last_attack_time: f64::NEG_INFINITY,
            last_skill_time: f64::NEG_INFINITY,
        }
    }

    pub fn is_aggressive(&self, now: f64) -> bool {
        now - self.last_aggressive_time <= TOWER_AGGRESSION_WINDOW_SECONDS
    }
}

#[derive(Debug, Clone)]
pub struct Tower {
    pub id: EntityId,
    pub x: i32,
    pub y: i32,
    pub team: u8,
    pub tier: u8,
    pub hp: i32,
    pub max_hp: i32,
    pub target_id: Option<EntityId>,
    pub consecutive_hits: u32,
    pub last_attack_time: f64,
    pub visual_end_time: f64,
}

impl Tower {
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
}

#[derive(Debug, Clone)]
pub struct Minion {
    pub id: EntityId,
    pub team: u8,
    pub kind: MinionKind,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub dmg: i32,
    pub range: f32,
    pub lane: usize,
    pub waypoint_idx: usize,
    pub state: MinionState,
    pub target_id: Option<EntityId>,
    pub anchor: (f32, f32),
    pub last_attack_time: f64,
    pub visual_end_time: f64,
}

impl Minion {
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
}

#[derive(Debug, Clone)]
pub struct JungleMob {
    pub id: EntityId,
    pub kind: JungleKind,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub dmg: i32,
    pub range: f32,
    pub target_id: Option<EntityId>,
    pub last_hit_by_time: f64,
    pub last_attack_time: f64,
    pub last_regen_time: f64,
    pub visual_end_time: f64,
    // Boss-only fields; unused (stay at default) for standard/buff mobs.
    pub attack_counter: i32,
    pub boss_state: BossState,
    pub skill_start_time: f64,
    pub next_tick_time: f64,
    /// Snapshotted cells (for the warn/burst visual effect), captured once
    /// at `prepare` entry.
    pub skill_targets: Vec<(i32, i32)>,
    /// Ids of the players captured within range at `prepare` entry; the
    /// burst damages exactly these players regardless of where they've
    /// moved by the time it fires (spec §8 scenario S6).
    pub skill_target_ids: Vec<EntityId>,
}

impl JungleMob {
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
}

#[derive(Debug, Clone)]
pub struct SkillEffect {
    pub center: (i32, i32),
    pub kind: EffectKind,
    pub start_time: f64,
    pub end_time: f64,
    pub radius: f32,
    pub originator_id: EntityId,
}

impl SkillEffect {
    pub fn expired(&self, now: f64) -> bool {
        now > self.end_time
    }
}

/// One of ten seats in a room's lobby.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    pub owner_name: Option<String>,
    pub ready: bool,
    pub team: u8,
    pub hero_id: i32,
    pub player_id: Option<EntityId>,
}
