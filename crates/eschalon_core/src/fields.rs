//! Enum-keyed accessors for the editable scalar fields of characters and
//! items. Editors route by `CharField`/`ItemField` instead of by name; the
//! item codec walks `ItemField::SCHEMA` so reading and writing share one
//! field order.

use std::fmt;

use crate::character::Character;
use crate::core_api::CoreError;
use crate::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Short,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i32),
    Short(u16),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Int(_) => FieldKind::Int,
            Self::Short(_) => FieldKind::Short,
            Self::Text(_) => FieldKind::Text,
        }
    }

    /// Parse editor/command-line text into a value of `kind`. Numbers accept
    /// decimal or `0x` hex.
    pub fn parse(kind: FieldKind, text: &str) -> Result<Self, CoreError> {
        match kind {
            FieldKind::Text => Ok(Self::Text(text.to_string())),
            FieldKind::Int => {
                let wide = parse_number(text)?;
                i32::try_from(wide)
                    .or_else(|_| u32::try_from(wide).map(|v| v as i32))
                    .map(Self::Int)
                    .map_err(|_| {
                        CoreError::invalid_value(format!("{text:?} does not fit in 32 bits"))
                    })
            }
            FieldKind::Short => {
                let wide = parse_number(text)?;
                u16::try_from(wide).map(Self::Short).map_err(|_| {
                    CoreError::invalid_value(format!("{text:?} is outside 0..=65535"))
                })
            }
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Self::Int(v) => Some(v),
            Self::Short(v) => Some(v as i32),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

fn parse_number(text: &str) -> Result<i64, CoreError> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let bad = || CoreError::invalid_value(format!("{text:?} is not a number"));
    if negative && digits.starts_with(['-', '+']) {
        return Err(bad());
    }
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if hex.starts_with(['-', '+']) => return Err(bad()),
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    };
    parsed
        .map(|v| if negative { -v } else { v })
        .map_err(|_| bad())
}

pub(crate) enum Slot<'a> {
    Int(&'a i32),
    Short(&'a u16),
    Text(&'a String),
}

pub(crate) enum SlotMut<'a> {
    Int(&'a mut i32),
    Short(&'a mut u16),
    Text(&'a mut String),
}

impl Slot<'_> {
    fn value(&self) -> FieldValue {
        match *self {
            Slot::Int(v) => FieldValue::Int(*v),
            Slot::Short(v) => FieldValue::Short(*v),
            Slot::Text(v) => FieldValue::Text(v.clone()),
        }
    }
}

impl SlotMut<'_> {
    fn assign(self, value: FieldValue, key: &str) -> Result<(), CoreError> {
        match (self, value) {
            (SlotMut::Int(slot), FieldValue::Int(v)) => *slot = v,
            (SlotMut::Short(slot), FieldValue::Short(v)) => *slot = v,
            (SlotMut::Text(slot), FieldValue::Text(v)) => *slot = v,
            (_, value) => {
                return Err(CoreError::invalid_value(format!(
                    "field {key} does not accept a {:?} value",
                    value.kind()
                )));
            }
        }
        Ok(())
    }
}

// --- Character fields ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharField {
    Name,
    Origin,
    Axiom,
    Classname,
    Strength,
    Dexterity,
    Endurance,
    Speed,
    Intelligence,
    Wisdom,
    Perception,
    Concentration,
    MaxHp,
    MaxMana,
    CurHp,
    CurMana,
    Experience,
    Level,
    Gold,
    Torches,
    TorchUsed,
    Orientation,
    XPos,
    YPos,
    PicId,
    Disease,
}

impl CharField {
    pub const ALL: [CharField; 26] = [
        CharField::Name,
        CharField::Origin,
        CharField::Axiom,
        CharField::Classname,
        CharField::Strength,
        CharField::Dexterity,
        CharField::Endurance,
        CharField::Speed,
        CharField::Intelligence,
        CharField::Wisdom,
        CharField::Perception,
        CharField::Concentration,
        CharField::MaxHp,
        CharField::MaxMana,
        CharField::CurHp,
        CharField::CurMana,
        CharField::Experience,
        CharField::Level,
        CharField::Gold,
        CharField::Torches,
        CharField::TorchUsed,
        CharField::Orientation,
        CharField::XPos,
        CharField::YPos,
        CharField::PicId,
        CharField::Disease,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Origin => "origin",
            Self::Axiom => "axiom",
            Self::Classname => "classname",
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Endurance => "endurance",
            Self::Speed => "speed",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Perception => "perception",
            Self::Concentration => "concentration",
            Self::MaxHp => "maxhp",
            Self::MaxMana => "maxmana",
            Self::CurHp => "curhp",
            Self::CurMana => "curmana",
            Self::Experience => "experience",
            Self::Level => "level",
            Self::Gold => "gold",
            Self::Torches => "torches",
            Self::TorchUsed => "torchused",
            Self::Orientation => "orientation",
            Self::XPos => "xpos",
            Self::YPos => "ypos",
            Self::PicId => "picid",
            Self::Disease => "disease",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::Origin | Self::Axiom | Self::Classname => FieldKind::Text,
            _ => FieldKind::Int,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for CharField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Character {
    pub fn field(&self, field: CharField) -> FieldValue {
        self.slot(field).value()
    }

    pub fn set_field(&mut self, field: CharField, value: FieldValue) -> Result<(), CoreError> {
        self.slot_mut(field).assign(value, field.key())
    }

    fn slot(&self, field: CharField) -> Slot<'_> {
        match field {
            CharField::Name => Slot::Text(&self.name),
            CharField::Origin => Slot::Text(&self.origin),
            CharField::Axiom => Slot::Text(&self.axiom),
            CharField::Classname => Slot::Text(&self.classname),
            CharField::Strength => Slot::Int(&self.strength),
            CharField::Dexterity => Slot::Int(&self.dexterity),
            CharField::Endurance => Slot::Int(&self.endurance),
            CharField::Speed => Slot::Int(&self.speed),
            CharField::Intelligence => Slot::Int(&self.intelligence),
            CharField::Wisdom => Slot::Int(&self.wisdom),
            CharField::Perception => Slot::Int(&self.perception),
            CharField::Concentration => Slot::Int(&self.concentration),
            CharField::MaxHp => Slot::Int(&self.maxhp),
            CharField::MaxMana => Slot::Int(&self.maxmana),
            CharField::CurHp => Slot::Int(&self.curhp),
            CharField::CurMana => Slot::Int(&self.curmana),
            CharField::Experience => Slot::Int(&self.experience),
            CharField::Level => Slot::Int(&self.level),
            CharField::Gold => Slot::Int(&self.gold),
            CharField::Torches => Slot::Int(&self.torches),
            CharField::TorchUsed => Slot::Int(&self.torchused),
            CharField::Orientation => Slot::Int(&self.orientation),
            CharField::XPos => Slot::Int(&self.xpos),
            CharField::YPos => Slot::Int(&self.ypos),
            CharField::PicId => Slot::Int(&self.picid),
            CharField::Disease => Slot::Int(&self.disease),
        }
    }

    fn slot_mut(&mut self, field: CharField) -> SlotMut<'_> {
        match field {
            CharField::Name => SlotMut::Text(&mut self.name),
            CharField::Origin => SlotMut::Text(&mut self.origin),
            CharField::Axiom => SlotMut::Text(&mut self.axiom),
            CharField::Classname => SlotMut::Text(&mut self.classname),
            CharField::Strength => SlotMut::Int(&mut self.strength),
            CharField::Dexterity => SlotMut::Int(&mut self.dexterity),
            CharField::Endurance => SlotMut::Int(&mut self.endurance),
            CharField::Speed => SlotMut::Int(&mut self.speed),
            CharField::Intelligence => SlotMut::Int(&mut self.intelligence),
            CharField::Wisdom => SlotMut::Int(&mut self.wisdom),
            CharField::Perception => SlotMut::Int(&mut self.perception),
            CharField::Concentration => SlotMut::Int(&mut self.concentration),
            CharField::MaxHp => SlotMut::Int(&mut self.maxhp),
            CharField::MaxMana => SlotMut::Int(&mut self.maxmana),
            CharField::CurHp => SlotMut::Int(&mut self.curhp),
            CharField::CurMana => SlotMut::Int(&mut self.curmana),
            CharField::Experience => SlotMut::Int(&mut self.experience),
            CharField::Level => SlotMut::Int(&mut self.level),
            CharField::Gold => SlotMut::Int(&mut self.gold),
            CharField::Torches => SlotMut::Int(&mut self.torches),
            CharField::TorchUsed => SlotMut::Int(&mut self.torchused),
            CharField::Orientation => SlotMut::Int(&mut self.orientation),
            CharField::XPos => SlotMut::Int(&mut self.xpos),
            CharField::YPos => SlotMut::Int(&mut self.ypos),
            CharField::PicId => SlotMut::Int(&mut self.picid),
            CharField::Disease => SlotMut::Int(&mut self.disease),
        }
    }
}

// --- Item fields ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Name,
    Type,
    Subtype,
    PictureId,
    Value,
    Weight,
    BaseDamage,
    BaseArmor,
    Flags,
    AttrModifier,
    AttrModified,
    SkillModifier,
    SkillModified,
    Incr,
    Hitpoint,
    Mana,
    ToHit,
    Damage,
    Armor,
    Visibility,
    Duration,
    CanStack,
    Quantity,
    Script,
    Zero1,
    EmptyStr,
}

impl ItemField {
    /// On-disk order of an item record.
    pub const SCHEMA: [ItemField; 26] = [
        ItemField::Name,
        ItemField::Type,
        ItemField::Subtype,
        ItemField::PictureId,
        ItemField::Value,
        ItemField::Weight,
        ItemField::BaseDamage,
        ItemField::BaseArmor,
        ItemField::Flags,
        ItemField::AttrModifier,
        ItemField::AttrModified,
        ItemField::SkillModifier,
        ItemField::SkillModified,
        ItemField::Incr,
        ItemField::Hitpoint,
        ItemField::Mana,
        ItemField::ToHit,
        ItemField::Damage,
        ItemField::Armor,
        ItemField::Visibility,
        ItemField::Duration,
        ItemField::CanStack,
        ItemField::Quantity,
        ItemField::Script,
        ItemField::Zero1,
        ItemField::EmptyStr,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "item_name",
            Self::Type => "type",
            Self::Subtype => "subtype",
            Self::PictureId => "pictureid",
            Self::Value => "value",
            Self::Weight => "weight",
            Self::BaseDamage => "basedamage",
            Self::BaseArmor => "basearmor",
            Self::Flags => "flags",
            Self::AttrModifier => "attr_modifier",
            Self::AttrModified => "attr_modified",
            Self::SkillModifier => "skill_modifier",
            Self::SkillModified => "skill_modified",
            Self::Incr => "incr",
            Self::Hitpoint => "hitpoint",
            Self::Mana => "mana",
            Self::ToHit => "tohit",
            Self::Damage => "damage",
            Self::Armor => "armor",
            Self::Visibility => "visibility",
            Self::Duration => "duration",
            Self::CanStack => "canstack",
            Self::Quantity => "quantity",
            Self::Script => "script",
            Self::Zero1 => "zero1",
            Self::EmptyStr => "emptystr",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::Script | Self::EmptyStr => FieldKind::Text,
            Self::Flags => FieldKind::Short,
            _ => FieldKind::Int,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::SCHEMA
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Item {
    pub fn field(&self, field: ItemField) -> FieldValue {
        self.slot(field).value()
    }

    pub fn set_field(&mut self, field: ItemField, value: FieldValue) -> Result<(), CoreError> {
        self.slot_mut(field).assign(value, field.key())
    }

    pub(crate) fn slot(&self, field: ItemField) -> Slot<'_> {
        match field {
            ItemField::Name => Slot::Text(&self.item_name),
            ItemField::Type => Slot::Int(&self.item_type),
            ItemField::Subtype => Slot::Int(&self.subtype),
            ItemField::PictureId => Slot::Int(&self.pictureid),
            ItemField::Value => Slot::Int(&self.value),
            ItemField::Weight => Slot::Int(&self.weight),
            ItemField::BaseDamage => Slot::Int(&self.basedamage),
            ItemField::BaseArmor => Slot::Int(&self.basearmor),
            ItemField::Flags => Slot::Short(&self.flags),
            ItemField::AttrModifier => Slot::Int(&self.attr_modifier),
            ItemField::AttrModified => Slot::Int(&self.attr_modified),
            ItemField::SkillModifier => Slot::Int(&self.skill_modifier),
            ItemField::SkillModified => Slot::Int(&self.skill_modified),
            ItemField::Incr => Slot::Int(&self.incr),
            ItemField::Hitpoint => Slot::Int(&self.hitpoint),
            ItemField::Mana => Slot::Int(&self.mana),
            ItemField::ToHit => Slot::Int(&self.tohit),
            ItemField::Damage => Slot::Int(&self.damage),
            ItemField::Armor => Slot::Int(&self.armor),
            ItemField::Visibility => Slot::Int(&self.visibility),
            ItemField::Duration => Slot::Int(&self.duration),
            ItemField::CanStack => Slot::Int(&self.canstack),
            ItemField::Quantity => Slot::Int(&self.quantity),
            ItemField::Script => Slot::Text(&self.script),
            ItemField::Zero1 => Slot::Int(&self.zero1),
            ItemField::EmptyStr => Slot::Text(&self.emptystr),
        }
    }

    pub(crate) fn slot_mut(&mut self, field: ItemField) -> SlotMut<'_> {
        match field {
            ItemField::Name => SlotMut::Text(&mut self.item_name),
            ItemField::Type => SlotMut::Int(&mut self.item_type),
            ItemField::Subtype => SlotMut::Int(&mut self.subtype),
            ItemField::PictureId => SlotMut::Int(&mut self.pictureid),
            ItemField::Value => SlotMut::Int(&mut self.value),
            ItemField::Weight => SlotMut::Int(&mut self.weight),
            ItemField::BaseDamage => SlotMut::Int(&mut self.basedamage),
            ItemField::BaseArmor => SlotMut::Int(&mut self.basearmor),
            ItemField::Flags => SlotMut::Short(&mut self.flags),
            ItemField::AttrModifier => SlotMut::Int(&mut self.attr_modifier),
            ItemField::AttrModified => SlotMut::Int(&mut self.attr_modified),
            ItemField::SkillModifier => SlotMut::Int(&mut self.skill_modifier),
            ItemField::SkillModified => SlotMut::Int(&mut self.skill_modified),
            ItemField::Incr => SlotMut::Int(&mut self.incr),
            ItemField::Hitpoint => SlotMut::Int(&mut self.hitpoint),
            ItemField::Mana => SlotMut::Int(&mut self.mana),
            ItemField::ToHit => SlotMut::Int(&mut self.tohit),
            ItemField::Damage => SlotMut::Int(&mut self.damage),
            ItemField::Armor => SlotMut::Int(&mut self.armor),
            ItemField::Visibility => SlotMut::Int(&mut self.visibility),
            ItemField::Duration => SlotMut::Int(&mut self.duration),
            ItemField::CanStack => SlotMut::Int(&mut self.canstack),
            ItemField::Quantity => SlotMut::Int(&mut self.quantity),
            ItemField::Script => SlotMut::Text(&mut self.script),
            ItemField::Zero1 => SlotMut::Int(&mut self.zero1),
            ItemField::EmptyStr => SlotMut::Text(&mut self.emptystr),
        }
    }
}
