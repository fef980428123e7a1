use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

// Save file counts
pub const PRIMARY_STAT_COUNT: usize = 8;
pub const SKILL_COUNT: usize = 24;
pub const STATUS_COUNT: usize = 26;
pub const SPELL_COUNT: usize = 39;
pub const SPELLS_HEAD_COUNT: usize = 35;
pub const SPELLS_TAIL_COUNT: usize = SPELL_COUNT - SPELLS_HEAD_COUNT;
pub const DIVINE_SPELL_COUNT: usize = 21;
pub const READYSLOT_COUNT: usize = 10;
pub const FXBLOCK_LEN: usize = 4;
pub const INVENTORY_ROWS: usize = 10;
pub const INVENTORY_COLS: usize = 7;
pub const EQUIP_SLOT_COUNT: usize = 14;
pub const UNKNOWN_ITEM_COUNT: usize = 8;
pub const IBLOCK1_LEN: usize = 17;
pub const IBLOCK2_LEN: usize = 21;
pub const UNKNOWN_TRIPLE_COUNT: usize = 5;

pub const PICTURE_ID_STEP: i32 = 256;

// --- Primary stats ---

pub const PRIMARY_STAT_NAMES: [&str; PRIMARY_STAT_COUNT] = [
    "Strength",
    "Dexterity",
    "Endurance",
    "Speed",
    "Intelligence",
    "Wisdom",
    "Perception",
    "Concentration",
];

// --- Skills ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDef {
    pub id: u8,
    pub name: &'static str,
}

/// Skills in the order the save stores them.
pub static SKILL_TABLE: [SkillDef; SKILL_COUNT] = [
    SkillDef { id: 1, name: "Alchemy" },
    SkillDef { id: 2, name: "Angelology" },
    SkillDef { id: 3, name: "Athletics" },
    SkillDef { id: 4, name: "Axe" },
    SkillDef { id: 5, name: "Bludgeoning Weapons" },
    SkillDef { id: 6, name: "Bow" },
    SkillDef { id: 7, name: "Dagger" },
    SkillDef { id: 8, name: "Detect Traps" },
    SkillDef { id: 9, name: "Divination" },
    SkillDef { id: 10, name: "Dual Wield" },
    SkillDef { id: 11, name: "Elemental" },
    SkillDef { id: 12, name: "Hunting" },
    SkillDef { id: 13, name: "Lockpicking" },
    SkillDef { id: 14, name: "Mercantile" },
    SkillDef { id: 15, name: "Mysticism" },
    SkillDef { id: 16, name: "Parry" },
    SkillDef { id: 17, name: "Pickpocket" },
    SkillDef { id: 18, name: "Polearm" },
    SkillDef { id: 19, name: "Shield" },
    SkillDef { id: 20, name: "Spot Hidden" },
    SkillDef { id: 21, name: "Stealth" },
    SkillDef { id: 22, name: "Survival" },
    SkillDef { id: 23, name: "Sword" },
    SkillDef { id: 24, name: "Unarmed" },
];

pub fn skill_index(id: u8) -> Option<usize> {
    SKILL_TABLE.iter().position(|skill| skill.id == id)
}

pub fn skill_by_name(name: &str) -> Option<&'static SkillDef> {
    SKILL_TABLE
        .iter()
        .find(|skill| skill.name.eq_ignore_ascii_case(name))
}

// --- Statuses ---

/// Status slot names. `None` marks slots whose effect is not known.
pub const STATUS_NAMES: [Option<&str>; STATUS_COUNT] = [
    Some("Poisoned"),
    Some("Blessed"),
    Some("Cursed"),
    Some("Protected"),
    Some("Hasted"),
    Some("Slowed"),
    Some("Invisible"),
    Some("Enraged"),
    Some("Regenerating"),
    Some("Stunned"),
    Some("Confused"),
    Some("Paralyzed"),
    Some("Feeble"),
    Some("Fire Shield"),
    Some("Frost Shield"),
    Some("Night Vision"),
    Some("Levitating"),
    Some("Drunk"),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
];

pub fn status_name(index: usize) -> Option<&'static str> {
    STATUS_NAMES.get(index).copied().flatten()
}

// --- Diseases ---

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Diseases: u32 {
        const SWAMP_FEVER = 0x0001;
        const GREY_ROT = 0x0002;
        const LEPROSY = 0x0004;
        const RED_DEATH = 0x0008;
        const LUNG_ROT = 0x0010;
        const BRAIN_WORM = 0x0020;
        const RAT_FEVER = 0x0040;
        const WEEPING_POX = 0x0080;
    }
}

pub const DISEASE_TABLE: [(Diseases, &str); 8] = [
    (Diseases::SWAMP_FEVER, "Swamp Fever"),
    (Diseases::GREY_ROT, "Grey Rot"),
    (Diseases::LEPROSY, "Leprosy"),
    (Diseases::RED_DEATH, "Red Death"),
    (Diseases::LUNG_ROT, "Lung Rot"),
    (Diseases::BRAIN_WORM, "Brain Worm"),
    (Diseases::RAT_FEVER, "Rat Fever"),
    (Diseases::WEEPING_POX, "Weeping Pox"),
];

impl Diseases {
    /// Interpret the raw save field, keeping bits without a table entry.
    pub fn from_raw(raw: i32) -> Self {
        Self::from_bits_retain(raw as u32)
    }

    pub fn raw(self) -> i32 {
        self.bits() as i32
    }

    pub fn names(self) -> Vec<&'static str> {
        DISEASE_TABLE
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|&(_, name)| name)
            .collect()
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        DISEASE_TABLE
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|&(flag, _)| flag)
    }
}

// --- Spells ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpellType {
    Divine,
    Elemental,
}

impl SpellType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Divine => "DI",
            Self::Elemental => "EL",
        }
    }
}

impl fmt::Display for SpellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn spell_type(index: usize) -> SpellType {
    if index < DIVINE_SPELL_COUNT {
        SpellType::Divine
    } else {
        SpellType::Elemental
    }
}

pub const SPELL_NAMES: [&str; SPELL_COUNT] = [
    // Divine
    "Heal Minor Wounds",
    "Bless",
    "Cure Poison",
    "Detect Traps",
    "Sanctuary",
    "Cure Disease",
    "Divine Protection",
    "Reveal Map",
    "Remove Curse",
    "Turn Undead",
    "Locate Objects",
    "Heal Major Wounds",
    "Restore Stamina",
    "Holy Light",
    "See Invisible",
    "Greater Bless",
    "Purify",
    "Divine Wrath",
    "Restoration",
    "Sacred Ground",
    "Resurrection",
    // Elemental
    "Burning Hands",
    "Frost Bolt",
    "Lightning Bolt",
    "Acid Spray",
    "Flame Arrow",
    "Ice Shield",
    "Stone Skin",
    "Levitate",
    "Fireball",
    "Chain Lightning",
    "Earthquake",
    "Blizzard",
    "Poison Cloud",
    "Summon Elemental",
    "Meteor",
    "Fire Shield",
    "Frost Shield",
    "Elemental Storm",
];

// --- Items ---

pub const ITEM_TYPE_TABLE: [(i32, &str); 25] = [
    (0, "None"),
    (1, "Axe"),
    (2, "Bludgeon"),
    (3, "Bow"),
    (4, "Dagger"),
    (5, "Polearm"),
    (6, "Sword"),
    (7, "Arrows"),
    (8, "Shield"),
    (9, "Helm"),
    (10, "Cloak"),
    (11, "Amulet"),
    (12, "Armor"),
    (13, "Belt"),
    (14, "Gauntlets"),
    (15, "Leggings"),
    (16, "Ring"),
    (17, "Boots"),
    (18, "Potion"),
    (19, "Scroll"),
    (20, "Food"),
    (21, "Key"),
    (22, "Gem"),
    (23, "Gold"),
    (24, "Miscellaneous"),
];

pub fn item_type_name(raw: i32) -> Option<&'static str> {
    ITEM_TYPE_TABLE
        .iter()
        .find(|&&(id, _)| id == raw)
        .map(|&(_, name)| name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    Quiver,
    Helm,
    Cloak,
    Amulet,
    Torso,
    PrimaryWeapon,
    Belt,
    Gauntlet,
    Legs,
    Ring1,
    Ring2,
    Shield,
    Feet,
    AltWeapon,
}

impl EquipSlot {
    /// Slots in the order the save stores them.
    pub const ALL: [EquipSlot; EQUIP_SLOT_COUNT] = [
        EquipSlot::Quiver,
        EquipSlot::Helm,
        EquipSlot::Cloak,
        EquipSlot::Amulet,
        EquipSlot::Torso,
        EquipSlot::PrimaryWeapon,
        EquipSlot::Belt,
        EquipSlot::Gauntlet,
        EquipSlot::Legs,
        EquipSlot::Ring1,
        EquipSlot::Ring2,
        EquipSlot::Shield,
        EquipSlot::Feet,
        EquipSlot::AltWeapon,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Quiver => "quiver",
            Self::Helm => "helm",
            Self::Cloak => "cloak",
            Self::Amulet => "amulet",
            Self::Torso => "torso",
            Self::PrimaryWeapon => "weap_prim",
            Self::Belt => "belt",
            Self::Gauntlet => "gauntlet",
            Self::Legs => "legs",
            Self::Ring1 => "ring1",
            Self::Ring2 => "ring2",
            Self::Shield => "shield",
            Self::Feet => "feet",
            Self::AltWeapon => "weap_alt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiver => "Quiver",
            Self::Helm => "Helm",
            Self::Cloak => "Cloak",
            Self::Amulet => "Amulet",
            Self::Torso => "Torso",
            Self::PrimaryWeapon => "Primary Weapon",
            Self::Belt => "Belt",
            Self::Gauntlet => "Gauntlet",
            Self::Legs => "Legs",
            Self::Ring1 => "Ring 1",
            Self::Ring2 => "Ring 2",
            Self::Shield => "Shield",
            Self::Feet => "Feet",
            Self::AltWeapon => "Alternate Weapon",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_table_ids_are_unique_and_ordered() {
        for (index, skill) in SKILL_TABLE.iter().enumerate() {
            assert_eq!(skill_index(skill.id), Some(index));
        }
        assert_eq!(skill_index(0), None);
        assert_eq!(skill_by_name("sword").map(|s| s.id), Some(23));
    }

    #[test]
    fn spell_type_splits_at_twenty_one() {
        for i in 0..DIVINE_SPELL_COUNT {
            assert_eq!(spell_type(i), SpellType::Divine);
            assert_eq!(spell_type(i).code(), "DI");
        }
        for i in DIVINE_SPELL_COUNT..SPELL_COUNT {
            assert_eq!(spell_type(i), SpellType::Elemental);
            assert_eq!(spell_type(i).code(), "EL");
        }
    }

    #[test]
    fn disease_bits_keep_unknown_flags() {
        let raw = Diseases::LEPROSY.raw() | 0x4000;
        let diseases = Diseases::from_raw(raw);
        assert_eq!(diseases.names(), vec!["Leprosy"]);
        assert_eq!(diseases.raw(), raw);
        assert_eq!(Diseases::from_display_name("red death"), Some(Diseases::RED_DEATH));
    }

    #[test]
    fn display_names_differ_from_flag_names() {
        assert_eq!(Diseases::from_display_name("Swamp Fever"), Some(Diseases::SWAMP_FEVER));
        assert_eq!(Diseases::from_name("SWAMP_FEVER"), Some(Diseases::SWAMP_FEVER));
        assert_eq!(Diseases::from_display_name("SWAMP_FEVER"), None);
        assert_eq!(Diseases::from_display_name("Scurvy"), None);
    }

    #[test]
    fn equipment_order_matches_slot_index() {
        for (index, slot) in EquipSlot::ALL.into_iter().enumerate() {
            assert_eq!(slot.index(), index);
            assert_eq!(EquipSlot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(EquipSlot::Quiver.index(), 0);
        assert_eq!(EquipSlot::AltWeapon.index(), 13);
    }

    #[test]
    fn status_names_are_partial() {
        assert_eq!(status_name(0), Some("Poisoned"));
        assert_eq!(status_name(25), None);
        assert_eq!(status_name(99), None);
    }
}
