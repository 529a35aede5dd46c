//! Constants ported from the `MOBA` reference server (`protocol.h`, `map.h`,
//! `game_room.h`). Values that the spec pins exactly (tick cadence, entity id
//! partitions, tower hp tiers) are kept literal rather than derived so the
//! invariants in SPEC_FULL.md §8 stay easy to audit against this file.

/// Side length of the square tile grid.
pub const MAP_SIZE: i32 = 150;

/// Simulation tick length in milliseconds. 40ms gives the ~25Hz the teacher's
/// own `Server::tick` targets, inside the 5-50ms band SPEC_FULL.md allows.
pub const DEFAULT_TICK_MS: u64 = 40;

/// Game-seconds after which the first minion wave spawns.
pub const WAVE_START_SECOND: i64 = 30;
/// Cadence, in game-seconds, between subsequent minion waves.
pub const WAVE_INTERVAL_SECOND: i64 = 60;
/// Minions spawned per team per lane, per wave (2 melee + 1 ranged).
pub const MINIONS_PER_TEAM_PER_LANE: usize = 3;
pub const LANE_COUNT: usize = 3;
pub const TEAM_COUNT: usize = 2;

/// Id-partition boundaries (§3): kind is inferable from id range alone.
pub const PLAYER_ID_START: u32 = 1;
pub const PLAYER_ID_END: u32 = 100;
pub const TOWER_ID_START: u32 = 101;
pub const TOWER_ID_END: u32 = 1000;
pub const MINION_ID_START: u32 = 10_000;
pub const MINION_ID_END: u32 = 50_000;
pub const JUNGLE_ID_START: u32 = 50_000;
pub const JUNGLE_ID_END: u32 = 90_000;
pub const BOSS_ID_START: u32 = 90_000;

/// Room has exactly ten lobby slots (5v5).
pub const ROOM_SLOTS: usize = 10;

/// Tower hp tiers, indexed by tier (0 = outer, 2 = innermost); base crystal
/// uses tier 0's value per spec.md §3.
pub const TOWER_HP_TIERS: [i32; 3] = [10_000, 12_000, 15_000];
pub const TOWER_ATTACK_RANGE: f32 = 8.0;
pub const TOWER_COOLDOWN_TICKS_SECONDS: f64 = 2.0;
pub const TOWER_AGGRESSION_WINDOW_SECONDS: f64 = 2.0;
pub const TOWER_VISUAL_WINDOW_MS: u64 = 200;
/// Base tower hit: `300 + 100 * wave_count` against minions, `300 *
/// 2^consecutive_hits` against the same player target.
pub const TOWER_BASE_DAMAGE: i32 = 300;
pub const TOWER_MINION_DAMAGE_PER_WAVE: i32 = 100;
/// Ceiling on the consecutive-hit exponent so a long sticky-target streak
/// can't overflow `i32`; far beyond any real engagement length.
pub const TOWER_DAMAGE_RAMP_MAX_HITS: u32 = 20;

/// Minion leash: maximum squared distance from anchor while chasing.
pub const MINION_LEASH_SQ: f32 = 100.0;
pub const MINION_VISION_SQ: f32 = 16.0; // 4 cells
pub const MINION_TOWER_VISION_SQ: f32 = 36.0; // 6 cells
pub const MINION_WAYPOINT_ADVANCE_DIST: f32 = 2.0;
pub const MINION_BASE_SPEED_CELLS_PER_SEC: f32 = 2.0;
pub const MINION_ATTACK_COOLDOWN_SECONDS: f64 = 2.0;
pub const MINION_TOWER_RANGE_BONUS: f32 = 2.0;

pub const JUNGLE_AGGRO_TIMEOUT_SECONDS: f64 = 5.0;
pub const JUNGLE_REGEN_PERIOD_SECONDS: f64 = 1.0;
pub const JUNGLE_REGEN_AMOUNT: i32 = 5000;
pub const JUNGLE_ATTACK_COOLDOWN_SECONDS: f64 = 2.0;

pub const OVERLORD_HP: i32 = 60_000;
pub const OVERLORD_DMG: i32 = 200;
pub const OVERLORD_CADENCE_SECONDS: f64 = 2.5;
pub const OVERLORD_RANGE: f32 = 8.0;
pub const OVERLORD_SKILL_DELAY_MS: u64 = 1500;
pub const OVERLORD_SKILL_RADIUS: f32 = 4.0;
pub const OVERLORD_ATTACKS_TO_SKILL: i32 = 3;

pub const TYRANT_HP: i32 = 40_000;
pub const TYRANT_DMG: i32 = 300;
pub const TYRANT_CADENCE_SECONDS: f64 = 2.0;
pub const TYRANT_RANGE: f32 = 7.0;
pub const TYRANT_SKILL_DUR_MS: u64 = 2000;
pub const TYRANT_SKILL_TICK_MS: u64 = 500;
pub const TYRANT_ATTACKS_TO_SKILL: i32 = 3;

pub const REGEN_ARMOR_INTERVAL_SECONDS: f64 = 5.0;
pub const REGEN_ARMOR_AMOUNT: i32 = 300;

pub const GOLD_KILL_PLAYER: i32 = 300;
pub const GOLD_KILL_MINION: i32 = 80;
pub const GOLD_KILL_JUNGLE_STANDARD: i32 = 100;
pub const GOLD_KILL_JUNGLE_BUFF: i32 = 300;
pub const GOLD_KILL_BOSS: i32 = 1000;

pub const LIFE_STEAL_FRACTION: f32 = 0.2;
pub const PLAYER_ATTACK_COOLDOWN_SECONDS: f64 = 1.0;

/// Hero active ability (`Tag::Skill`): longer cooldown and reach than a
/// basic attack, double damage, same life-steal/gold/respawn rules.
pub const HERO_SKILL_COOLDOWN_SECONDS: f64 = 6.0;
pub const HERO_SKILL_RANGE_BONUS: f32 = 2.0;
pub const HERO_SKILL_DAMAGE_MULTIPLIER: i32 = 2;
pub const HERO_SKILL_EFFECT_RADIUS: f32 = 2.0;
pub const HERO_SKILL_VISUAL_MS: u64 = 300;

pub const PLAYER_TOWER_RANGE_TOLERANCE_SQ: f32 = 10.0;
pub const PLAYER_JUNGLE_RANGE_TOLERANCE_SQ: f32 = 5.0;

/// Matchmaking queue thresholds (`room_manager.h::MatchPlayer`).
pub const MATCH_QUEUE_SIZE: usize = 10;
pub const MATCH_QUEUE_TIMEOUT_SECONDS: f64 = 10.0;

/// Per-connection byte ring capacity (§5 "Resource policy").
pub const CONNECTION_RING_CAPACITY: usize = 10 * 1024;
