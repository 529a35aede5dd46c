//! The five purchasable items (spec §4.7). The shop is a fixed catalog, not
//! a data-driven table, so each item's effect is expressed directly rather
//! than through the teacher's generic `Item` flag bitset — there is no
//! inventory-template system in this spec.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    ClothArmor,
    IronSword,
    LifeStealBlade,
    RegenArmor,
    ArmyBreaker,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ItemBonus {
    pub atk: i32,
    pub def: i32,
    pub max_hp: i32,
    pub life_steal: bool,
    pub passive_regen: bool,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::ClothArmor,
        ItemKind::IronSword,
        ItemKind::LifeStealBlade,
        ItemKind::RegenArmor,
        ItemKind::ArmyBreaker,
    ];

    pub fn from_shop_index(idx: i32) -> Option<ItemKind> {
        match idx {
            0 => Some(ItemKind::ClothArmor),
            1 => Some(ItemKind::IronSword),
            2 => Some(ItemKind::LifeStealBlade),
            3 => Some(ItemKind::RegenArmor),
            4 => Some(ItemKind::ArmyBreaker),
            _ => None,
        }
    }

    pub fn cost(self) -> i32 {
        match self {
            ItemKind::ClothArmor | ItemKind::IronSword => 500,
            ItemKind::LifeStealBlade | ItemKind::RegenArmor | ItemKind::ArmyBreaker => 2000,
        }
    }

    pub fn bonus(self) -> ItemBonus {
        match self {
            ItemKind::ClothArmor => ItemBonus {
                def: 50,
                max_hp: 500,
                ..Default::default()
            },
            ItemKind::IronSword => ItemBonus {
                atk: 100,
                ..Default::default()
            },
            ItemKind::LifeStealBlade => ItemBonus {
                atk: 300,
                life_steal: true,
                ..Default::default()
            },
            ItemKind::RegenArmor => ItemBonus {
                max_hp: 2000,
                def: 200,
                passive_regen: true,
                ..Default::default()
            },
            ItemKind::ArmyBreaker => ItemBonus {
                atk: 500,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs_match_spec() {
        assert_eq!(ItemKind::ClothArmor.cost(), 500);
        assert_eq!(ItemKind::LifeStealBlade.cost(), 2000);
    }
}
