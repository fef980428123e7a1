use std::fmt;

use serde::Serialize;

use crate::direction::Direction;
use crate::fields::CharField;
use crate::fx::FxPreset;
use crate::item::Item;
use crate::tables::SpellType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub name: String,
    pub origin: String,
    pub axiom: String,
    pub classname: String,
    pub level: i32,
    pub experience: i32,
    pub gold: i32,
    pub hp: Meter,
    pub mana: Meter,
    pub torches: i32,
    pub torchused: i32,
    pub orientation: Direction,
    pub xpos: i32,
    pub ypos: i32,
    pub picid: i32,
    pub picture: Option<i32>,
    pub fx: FxPreset,
    pub disease_raw: i32,
    pub diseases: Vec<String>,
    pub stats: Vec<StatEntry>,
    pub skills: Vec<SkillEntry>,
    pub statuses: Vec<StatusEntry>,
    pub spells: Vec<SpellEntry>,
    pub readyslots: Vec<ReadySlotEntry>,
    pub equipment: Vec<ItemEntry>,
    pub inventory: Vec<ItemEntry>,
    pub extradata_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meter {
    pub current: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub index: usize,
    pub name: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillEntry {
    pub id: u8,
    pub name: String,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub index: usize,
    pub name: Option<String>,
    pub turns: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellEntry {
    pub index: usize,
    pub name: String,
    pub spell_type: SpellType,
    pub known: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadySlotEntry {
    pub slot: usize,
    pub spell: String,
    pub level: i32,
}

/// A non-empty item and where it sits: an equipment key such as `helm`, or
/// `row,col` for the inventory grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemEntry {
    pub location: String,
    pub item: Item,
}

/// Part of the model that differs between the working and pristine copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Field(CharField),
    Skills,
    Statuses,
    Spells,
    ReadySlots,
    FxBlock,
    Inventory,
    Equipment,
    Unknowns,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.write_str(field.key()),
            Self::Skills => f.write_str("skills"),
            Self::Statuses => f.write_str("statuses"),
            Self::Spells => f.write_str("spells"),
            Self::ReadySlots => f.write_str("readyslots"),
            Self::FxBlock => f.write_str("fxblock"),
            Self::Inventory => f.write_str("inventory"),
            Self::Equipment => f.write_str("equipment"),
            Self::Unknowns => f.write_str("unknowns"),
        }
    }
}
