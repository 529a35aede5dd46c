//! Derived stats and damage resolution (spec §4.7).

use crate::entities::Player;
use arena_core::constants::LIFE_STEAL_FRACTION;
use arena_core::hero::HeroKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedStats {
    pub atk: i32,
    pub def: i32,
    pub max_hp: i32,
    pub life_steal: bool,
    pub passive_regen: bool,
}

/// Recomputed on every access rather than cached, matching spec.md §4.7
/// ("Derived stats are recomputed each access").
pub fn derived_stats(player: &Player) -> DerivedStats {
    let template = player.hero.unwrap_or(HeroKind::Warrior).template();
    let mut stats = DerivedStats {
        atk: template.base_atk,
        def: player.base_def,
        max_hp: template.max_hp,
        life_steal: false,
        passive_regen: false,
    };
    for item in &player.inventory {
        let bonus = item.bonus();
        stats.atk += bonus.atk;
        stats.def += bonus.def;
        stats.max_hp += bonus.max_hp;
        stats.life_steal |= bonus.life_steal;
        stats.passive_regen |= bonus.passive_regen;
    }
    stats
}

/// Flat damage against a non-player target (minion, tower, jungle mob):
/// no defense subtraction, per spec §4.7.
pub fn flat_attack_damage(player: &Player) -> i32 {
    derived_stats(player).atk
}

/// Damage against a player target: `max(1, atk - def_total)`.
pub fn player_vs_player_damage(attacker: &Player, defender: &Player) -> i32 {
    let atk = derived_stats(attacker).atk;
    let def = derived_stats(defender).def;
    (atk - def).max(1)
}

/// Self-heal on a landed attack when the attacker holds the life-steal item,
/// clamped by max hp (spec invariant 7).
pub fn apply_life_steal(attacker: &mut Player, atk: i32) {
    let stats = derived_stats(attacker);
    if !stats.life_steal {
        return;
    }
    let healed = (LIFE_STEAL_FRACTION * atk as f32) as i32;
    attacker.hp = (attacker.hp + healed).min(stats.max_hp);
}

/// Respawns a dead player at their team base with full hp (spec §3
/// "Player" lifecycle).
pub fn respawn(player: &mut Player) {
    let (bx, by) = arena_core::map::TileGrid::base_position(player.team);
    player.x = bx;
    player.y = by;
    player.hp = derived_stats(player).max_hp;
    player.current_target_id = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::item::ItemKind;

    #[test]
    fn life_steal_heals_twenty_percent() {
        let mut attacker = Player::new(1, 1);
        attacker.hero = Some(HeroKind::Warrior);
        attacker.inventory.push(ItemKind::LifeStealBlade);
        attacker.max_hp = derived_stats(&attacker).max_hp;
        attacker.hp = 1000;
        let atk = derived_stats(&attacker).atk; // 500 + 300 = 800
        assert_eq!(atk, 800);
        apply_life_steal(&mut attacker, atk);
        assert_eq!(attacker.hp, 1000 + 160);
    }

    #[test]
    fn player_damage_floors_at_one() {
        let mut attacker = Player::new(1, 1);
        attacker.hero = Some(HeroKind::Warrior);
        let mut defender = Player::new(2, 2);
        defender.hero = Some(HeroKind::Tank);
        defender.base_def = 10_000;
        assert_eq!(player_vs_player_damage(&attacker, &defender), 1);
    }
}
