//! Core types shared by the damage model and the optimizers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every stat tracked by a [`StatVector`](crate::stat_vector::StatVector)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Attack,
    CritRate,
    CritDamage,
    StatDamage,
    Damage,
    BossDamage,
    NormalDamage,
    DamageAmp,
    MinDamage,
    MaxDamage,
    AttackSpeed,
    DefPen,
    FinalDamage,
    SkillCoefficient,
    SkillMastery,
    SkillMasteryBoss,
    Defense,
    MainStat,
    MainStatPct,
}

/// How a delta of a stat combines with the value already present
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatAlgebra {
    /// `new = old + delta`
    Additive,
    /// `new = ((1 + old/100)(1 + delta/100) - 1) * 100`
    Multiplicative,
    /// `new = (1 - (1 - old/F)(1 - delta/F)) * F`
    Diminishing { factor: f64 },
    /// Flat main stat, converted into stat damage and attack
    MainStat,
    /// Main stat percent, a ratio of multipliers against the current percent
    MainStatPercent,
    /// Defense, which feeds main stat for classes that convert it
    Defense,
}

impl StatKind {
    pub const ALL: [StatKind; 19] = [
        StatKind::Attack,
        StatKind::CritRate,
        StatKind::CritDamage,
        StatKind::StatDamage,
        StatKind::Damage,
        StatKind::BossDamage,
        StatKind::NormalDamage,
        StatKind::DamageAmp,
        StatKind::MinDamage,
        StatKind::MaxDamage,
        StatKind::AttackSpeed,
        StatKind::DefPen,
        StatKind::FinalDamage,
        StatKind::SkillCoefficient,
        StatKind::SkillMastery,
        StatKind::SkillMasteryBoss,
        StatKind::Defense,
        StatKind::MainStat,
        StatKind::MainStatPct,
    ];

    /// Input key used by external collaborators and TOML tables
    pub fn key(self) -> &'static str {
        match self {
            StatKind::Attack => "attack",
            StatKind::CritRate => "crit_rate",
            StatKind::CritDamage => "crit_damage",
            StatKind::StatDamage => "stat_damage",
            StatKind::Damage => "damage",
            StatKind::BossDamage => "boss_damage",
            StatKind::NormalDamage => "normal_damage",
            StatKind::DamageAmp => "damage_amp",
            StatKind::MinDamage => "min_damage",
            StatKind::MaxDamage => "max_damage",
            StatKind::AttackSpeed => "attack_speed",
            StatKind::DefPen => "def_pen",
            StatKind::FinalDamage => "final_damage",
            StatKind::SkillCoefficient => "skill_coefficient",
            StatKind::SkillMastery => "skill_mastery",
            StatKind::SkillMasteryBoss => "skill_mastery_boss",
            StatKind::Defense => "defense",
            StatKind::MainStat => "main_stat",
            StatKind::MainStatPct => "main_stat_pct",
        }
    }

    /// Look up a stat by its input key
    pub fn from_key(key: &str) -> Option<StatKind> {
        StatKind::ALL.iter().copied().find(|kind| kind.key() == key)
    }

    /// Display label used in ranked descriptions
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Attack => "Attack",
            StatKind::CritRate => "Critical Rate",
            StatKind::CritDamage => "Critical Damage",
            StatKind::StatDamage => "Stat Damage",
            StatKind::Damage => "Damage",
            StatKind::BossDamage => "Boss Monster Damage",
            StatKind::NormalDamage => "Normal Monster Damage",
            StatKind::DamageAmp => "Damage Amplification",
            StatKind::MinDamage => "Min Damage Multiplier",
            StatKind::MaxDamage => "Max Damage Multiplier",
            StatKind::AttackSpeed => "Attack Speed",
            StatKind::DefPen => "Defense Penetration",
            StatKind::FinalDamage => "Final Damage",
            StatKind::SkillCoefficient => "Skill Coefficient",
            StatKind::SkillMastery => "Skill Mastery",
            StatKind::SkillMasteryBoss => "Skill Mastery (Boss)",
            StatKind::Defense => "Defense",
            StatKind::MainStat => "Main Stat",
            StatKind::MainStatPct => "Main Stat %",
        }
    }

    /// Whether values of this stat are percentage points
    pub fn is_percent(self) -> bool {
        !matches!(
            self,
            StatKind::Attack | StatKind::Defense | StatKind::MainStat
        )
    }

    pub fn algebra(self) -> StatAlgebra {
        match self {
            StatKind::FinalDamage => StatAlgebra::Multiplicative,
            StatKind::AttackSpeed => StatAlgebra::Diminishing {
                factor: crate::adjust::ATTACK_SPEED_FACTOR,
            },
            StatKind::DefPen => StatAlgebra::Diminishing {
                factor: crate::adjust::DEF_PEN_FACTOR,
            },
            StatKind::MainStat => StatAlgebra::MainStat,
            StatKind::MainStatPct => StatAlgebra::MainStatPercent,
            StatKind::Defense => StatAlgebra::Defense,
            _ => StatAlgebra::Additive,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which kind of monster a hit is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterClass {
    Boss,
    Normal,
}

/// Potential / ability rarity ladder, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Normal,
    Rare,
    Epic,
    Unique,
    Legendary,
    Mystic,
}

impl Rarity {
    /// The next tier up, if any
    pub fn next(self) -> Option<Rarity> {
        match self {
            Rarity::Normal => Some(Rarity::Rare),
            Rarity::Rare => Some(Rarity::Epic),
            Rarity::Epic => Some(Rarity::Unique),
            Rarity::Unique => Some(Rarity::Legendary),
            Rarity::Legendary => Some(Rarity::Mystic),
            Rarity::Mystic => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Normal => "Normal",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Unique => "Unique",
            Rarity::Legendary => "Legendary",
            Rarity::Mystic => "Mystic",
        };
        f.write_str(name)
    }
}

/// Identifier for an equipment slot (e.g. "gloves", "ring1")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        SlotId(s.to_string())
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        SlotId(s)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single named stat change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat: StatKind,
    pub amount: f64,
}

impl StatDelta {
    pub fn new(stat: StatKind, amount: f64) -> Self {
        StatDelta { stat, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip_covers_all() {
        for kind in StatKind::ALL {
            assert_eq!(StatKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(StatKind::from_key("luck"), None);
    }

    #[test]
    fn test_rarity_ladder() {
        assert_eq!(Rarity::Epic.next(), Some(Rarity::Unique));
        assert_eq!(Rarity::Mystic.next(), None);
        assert!(Rarity::Legendary > Rarity::Unique);
    }

    #[test]
    fn test_algebra_selection() {
        assert_eq!(StatKind::BossDamage.algebra(), StatAlgebra::Additive);
        assert_eq!(StatKind::FinalDamage.algebra(), StatAlgebra::Multiplicative);
        assert_eq!(
            StatKind::AttackSpeed.algebra(),
            StatAlgebra::Diminishing { factor: 150.0 }
        );
    }
}
