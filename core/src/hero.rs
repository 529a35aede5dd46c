//! Hero templates chosen during the pick phase (spec §4.7).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroKind {
    Warrior,
    Mage,
    Tank,
}

impl HeroKind {
    pub fn from_hero_id(id: i32) -> Option<HeroKind> {
        match id {
            1 => Some(HeroKind::Warrior),
            2 => Some(HeroKind::Mage),
            3 => Some(HeroKind::Tank),
            _ => None,
        }
    }

    pub fn template(self) -> HeroTemplate {
        match self {
            HeroKind::Warrior => HeroTemplate {
                max_hp: 2000,
                range: 2.0,
                base_atk: 500,
                base_def: 80,
            },
            HeroKind::Mage => HeroTemplate {
                max_hp: 1500,
                range: 6.0,
                base_atk: 600,
                base_def: 50,
            },
            HeroKind::Tank => HeroTemplate {
                max_hp: 3000,
                range: 2.0,
                base_atk: 300,
                base_def: 120,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeroTemplate {
    pub max_hp: i32,
    pub range: f32,
    pub base_atk: i32,
    pub base_def: i32,
}
